//! # dump
//!
//! Reader for candump-style text dumps (one frame per line).
//! Use `dump::from_file(...)` to create a [`DumpLog`]; single lines can be parsed with
//! [`line::parse`].

pub mod line;

use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::registry::{PgnCount, PgnRegistry};
use crate::types::errors::{LogReadError, RejectedRecord};
use crate::types::frame::Frame;

/// Frames read from one dump file, in file order, plus the lines that were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpLog {
    pub frames: Vec<Frame>,
    pub rejected: Vec<RejectedRecord>,
}

impl DumpLog {
    /// Unique PGNs of the log with counts and registry names, ascending.
    pub fn pgn_census(&self, registry: &PgnRegistry) -> Vec<PgnCount> {
        registry.census(&self.frames)
    }

    /// Keeps only frames timestamped strictly after `unix_seconds`.
    pub fn retain_after(&mut self, unix_seconds: f64) {
        self.frames.retain(|f| f.timestamp() > unix_seconds);
    }
}

/// Parses a text dump and builds a [`DumpLog`].
///
/// The file is read **line by line** and decoded as Windows-1252, so stray non-UTF-8 bytes
/// in comments or interface names never abort the read. Blank lines are skipped. Every other
/// line must be a frame (see [`line::parse`]); lines that are not are logged, recorded in
/// [`DumpLog::rejected`] with their 1-based line number, and skipped.
///
/// # Errors
/// - [`LogReadError::OpenFile`] if the file cannot be opened.
/// - [`LogReadError::Read`] on I/O errors while reading.
pub fn from_file(path: &str) -> Result<DumpLog, LogReadError> {
    let file: File = File::open(path).map_err(|source| LogReadError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    let mut log: DumpLog = DumpLog::default();
    // Buffer for raw bytes of a line
    let mut raw_line: Vec<u8> = Vec::with_capacity(128);
    let mut line_no: usize = 0;

    loop {
        raw_line.clear();
        let read: usize = reader
            .read_until(b'\n', &mut raw_line)
            .map_err(|source| LogReadError::Read {
                path: path.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let (text, _, _) = WINDOWS_1252.decode(&raw_line);
        let text: &str = text.trim();
        if text.is_empty() {
            continue;
        }

        match line::parse(text) {
            Ok(frame) => log.frames.push(frame),
            Err(error) => {
                log::warn!("{}:{}: rejected line: {}", path, line_no, error);
                log.rejected.push(RejectedRecord {
                    file: None,
                    line: line_no,
                    error,
                });
            }
        }
    }

    log::info!(
        "{}: {} frames, {} rejected lines",
        path,
        log.frames.len(),
        log.rejected.len()
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::FrameError;
    use crate::types::frame::Pgn;
    use std::io::Write;

    fn write_dump(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_frames_and_reports_bad_lines() {
        let file = write_dump(
            b"(1637164800.000000) can0 18FE6C00 [8] 00 00 00 00 00 00 20 50\n\
              \n\
              (1637164800.100000) can0 18FDA500 [8] 04 00 00 00 00 00 00\n\
              (1637164800.200000) can0 0CF00400 [8] 00 00 AF 80 3E 00 00 00\n",
        );
        let log = from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(log.frames.len(), 2);
        assert_eq!(log.frames[0].pgn(), Pgn(0xFE6C));
        assert_eq!(log.frames[1].pgn(), Pgn(0xF004));
        assert_eq!(
            log.rejected,
            vec![RejectedRecord {
                file: None,
                line: 3,
                error: FrameError::DataLength { found: 7 }
            }]
        );
    }

    #[test]
    fn tolerates_non_utf8_bytes() {
        let file = write_dump(b"# capture \xE4\xF6\xFC\n(1.0) can0 18FEEE00 [8] 82 00 00 00 00 00 00 00\n");
        let log = from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(log.frames.len(), 1);
        assert_eq!(log.rejected.len(), 1);
        assert_eq!(log.rejected[0].line, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = from_file("/no/such/dump.txt").unwrap_err();
        assert!(matches!(err, LogReadError::OpenFile { .. }));
    }

    #[test]
    fn census_and_time_filter() {
        let file = write_dump(
            b"(100.0) can0 18FEF100 [8] 00 00 00 00 00 00 00 00\n\
              (200.0) can0 18FEF100 [8] 00 00 00 00 00 00 00 00\n\
              (300.0) can0 18FEE500 [8] 00 00 00 00 00 00 00 00\n",
        );
        let mut log = from_file(file.path().to_str().unwrap()).unwrap();
        let census = log.pgn_census(&PgnRegistry::standard());
        assert_eq!(census.len(), 2);
        assert_eq!(census[0].pgn, Pgn(0xFEE5));
        assert_eq!(census[0].name.as_deref(), Some("Engine Hours, Revolutions: HOURS"));
        assert_eq!(census[1].count, 2);

        log.retain_after(100.0);
        assert_eq!(log.frames.len(), 2);
        assert!(log.frames.iter().all(|f| f.timestamp() > 100.0));
    }
}
