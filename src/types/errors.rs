use std::io;
use thiserror::Error;

/// Reasons a single log record cannot become a [`Frame`](crate::Frame).
///
/// Always per-record: readers reject the record, report it and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Expected 8 data bytes, found {found}")]
    DataLength { found: usize },
    #[error("Invalid hex data byte '{token}'")]
    DataByte { token: String },
    #[error("Identifier '{token}' cannot be split into priority, PGN and source address")]
    Identifier { token: String },
    #[error("Priority {priority} is out of range 0..=7")]
    Priority { priority: u8 },
    #[error("Invalid timestamp '{token}'")]
    Timestamp { token: String },
    #[error("Invalid PGN '{token}'")]
    Pgn { token: String },
    #[error("Record has {found} fields, expected at least {expected}")]
    FieldCount { found: usize, expected: usize },
    #[error("Malformed record: {message}")]
    Record { message: String },
}

/// A record that was rejected while reading a log, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// File the record came from when several files were merged into one log.
    pub file: Option<String>,
    /// 1-based line (dump) or row (CSV) number.
    pub line: usize,
    pub error: FrameError,
}

impl std::fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}: {}", file, self.line, self.error),
            None => write!(f, "{}: {}", self.line, self.error),
        }
    }
}

/// Errors produced while opening or reading a whole log file.
#[derive(Debug, Error)]
pub enum LogReadError {
    #[error("Not a valid {expected} file: {path}")]
    InvalidExtension { path: String, expected: &'static str },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors produced while loading configuration (session settings, PGN names).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid configuration: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
    #[error("Invalid PGN key '{key}'")]
    PgnKey { key: String },
    #[error("Retention horizon must be a finite, non-negative number of seconds (got {value})")]
    Retention { value: f64 },
}

/// Errors produced by a live batch source.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to list batch directory '{path}'. \nError: {source}")]
    ListDirectory {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Batch(#[from] LogReadError),
}
