//! # csvlog
//!
//! Reader for converted batch files (`<n>.csv`), one frame per row, no header.
//! Use `csvlog::from_file(...)` to create a [`Batch`], `csvlog::from_dir(...)` to merge a whole
//! directory of batches; single rows are handled by [`row::parse`].

pub mod row;

use csv::{ReaderBuilder, StringRecord};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::registry::{PgnCount, PgnRegistry};
use crate::types::errors::{FeedError, FrameError, LogReadError, RejectedRecord};
use crate::types::frame::Frame;

/// Frames of one batch file, in row order, plus the rejected rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Path the batch was read from (empty for in-memory readers).
    pub source: String,
    pub frames: Vec<Frame>,
    pub rejected: Vec<RejectedRecord>,
}

impl Batch {
    pub fn pgn_census(&self, registry: &PgnRegistry) -> Vec<PgnCount> {
        registry.census(&self.frames)
    }

    /// Keeps only frames timestamped strictly after `unix_seconds`.
    pub fn retain_after(&mut self, unix_seconds: f64) {
        self.frames.retain(|f| f.timestamp() > unix_seconds);
    }
}

/// Reads a batch file.
///
/// # Errors
/// - [`LogReadError::InvalidExtension`] if the path does not end in `.csv`.
/// - [`LogReadError::OpenFile`] if the file cannot be opened.
/// - [`LogReadError::Read`] on I/O errors while reading.
pub fn from_file(path: &str) -> Result<Batch, LogReadError> {
    // check if provided file has .csv format
    if !path.to_ascii_lowercase().ends_with(".csv") {
        return Err(LogReadError::InvalidExtension {
            path: path.to_string(),
            expected: "csv",
        });
    }

    let file: File = File::open(path).map_err(|source| LogReadError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    read_batch(path, file)
}

/// Reads batch rows from any reader. Rows that do not form a frame are logged and recorded
/// in [`Batch::rejected`] with their 1-based row number.
pub fn from_reader<R: Read>(reader: R) -> Result<Batch, LogReadError> {
    read_batch("", reader)
}

/// Batch files of `dir` named `<n>.csv`, ascending by `n`. Other entries are ignored.
pub fn numbered_batches(dir: &Path) -> Result<Vec<(u64, PathBuf)>, FeedError> {
    let list_error = |source: io::Error| FeedError::ListDirectory {
        path: dir.display().to_string(),
        source,
    };

    let mut files: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_error)? {
        let path: PathBuf = entry.map_err(list_error)?.path();
        if !path.is_file() {
            continue;
        }
        let is_csv: bool = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let number: Option<u64> = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse().ok());
        if is_csv && let Some(number) = number {
            files.push((number, path));
        }
    }
    files.sort_by_key(|(number, _)| *number);
    Ok(files)
}

/// Reads every numbered batch of `dir` in ascending order and concatenates them into one
/// [`Batch`] (whole-log view of a capture split over many files).
///
/// Rejected rows keep their row number and name the file they came from.
///
/// # Errors
/// - [`FeedError::ListDirectory`] if `dir` cannot be listed.
/// - [`FeedError::Batch`] if one of the files cannot be read.
pub fn from_dir(dir: &Path) -> Result<Batch, FeedError> {
    let mut merged: Batch = Batch {
        source: dir.display().to_string(),
        ..Default::default()
    };

    for (_, path) in numbered_batches(dir)? {
        let path: String = path.display().to_string();
        let batch: Batch = from_file(&path)?;
        merged.frames.extend(batch.frames);
        merged
            .rejected
            .extend(batch.rejected.into_iter().map(|record| RejectedRecord {
                file: Some(path.clone()),
                ..record
            }));
    }

    log::info!(
        "{}: {} frames, {} rejected rows",
        merged.source,
        merged.frames.len(),
        merged.rejected.len()
    );
    Ok(merged)
}

fn read_batch<R: Read>(source: &str, reader: R) -> Result<Batch, LogReadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut batch: Batch = Batch {
        source: source.to_string(),
        ..Default::default()
    };
    let mut record: StringRecord = StringRecord::new();
    let mut row_no: usize = 0;

    loop {
        row_no += 1;
        let parsed: Result<Frame, FrameError> = match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => row::parse(&record),
            Err(err) if err.is_io_error() => {
                return Err(LogReadError::Read {
                    path: source.to_string(),
                    source: io::Error::other(err),
                });
            }
            Err(err) => Err(FrameError::Record {
                message: err.to_string(),
            }),
        };

        match parsed {
            Ok(frame) => batch.frames.push(frame),
            Err(error) => {
                log::warn!("{}:{}: rejected row: {}", source, row_no, error);
                batch.rejected.push(RejectedRecord {
                    file: None,
                    line: row_no,
                    error,
                });
            }
        }
    }

    Ok(batch)
}
