use csv::StringRecord;

use crate::types::{
    errors::FrameError,
    frame::{Frame, Pgn},
};

/// Priority assigned to CSV rows, which carry only the PGN of the identifier.
pub const DEFAULT_PRIORITY: u8 = 6;
/// Source address assigned to CSV rows ("null address").
pub const DEFAULT_SOURCE_ADDRESS: u8 = 0xFE;

const TIMESTAMP_COLUMN: usize = 1;
const PGN_COLUMN: usize = 2;
const DATA_COLUMN: usize = 3;

// Example:
// 17,1637164800.25,FEF1,00280001000000FF,Cruise Control/Vehicle Speed 1: CCVS1
/// Parses one row of a converted batch file into a [`Frame`].
///
/// Columns: `index, unix timestamp, PGN (hex), payload (hex word), [name]`. The payload word
/// is read most significant byte first: its first two hex digits are data byte 0. Shorter
/// words are left-padded with zero bytes. The index and the name are ignored.
pub fn parse(record: &StringRecord) -> Result<Frame, FrameError> {
    if record.len() <= DATA_COLUMN {
        return Err(FrameError::FieldCount {
            found: record.len(),
            expected: DATA_COLUMN + 1,
        });
    }

    let ts_token: &str = record[TIMESTAMP_COLUMN].trim();
    let timestamp: f64 = match ts_token.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            return Err(FrameError::Timestamp {
                token: ts_token.to_string(),
            });
        }
    };

    let pgn_token: &str = &record[PGN_COLUMN];
    let pgn: Pgn = Pgn::from_hex(pgn_token).ok_or_else(|| FrameError::Pgn {
        token: pgn_token.trim().to_string(),
    })?;

    let word: u64 = parse_word(&record[DATA_COLUMN])?;
    Frame::new(
        timestamp,
        DEFAULT_PRIORITY,
        pgn,
        DEFAULT_SOURCE_ADDRESS,
        &word.to_be_bytes(),
    )
}

fn parse_word(token: &str) -> Result<u64, FrameError> {
    let trimmed: &str = token.trim();
    let digits: &str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 16 {
        return Err(FrameError::DataByte {
            token: trimmed.to_string(),
        });
    }
    u64::from_str_radix(digits, 16).map_err(|_| FrameError::DataByte {
        token: trimmed.to_string(),
    })
}
