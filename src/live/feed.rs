use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub use crate::csvlog::numbered_batches;

use crate::csvlog::{self, Batch};
use crate::types::errors::{FeedError, LogReadError};

/// Something a [`LiveSession`](super::LiveSession) can pull batches of frames from.
pub trait BatchSource {
    /// Returns the next batch, or `None` when nothing new is available yet.
    fn poll(&mut self) -> Result<Option<Batch>, FeedError>;
}

fn load(path: &Path) -> Result<Batch, FeedError> {
    let text: &str = path.to_str().ok_or_else(|| {
        FeedError::Batch(LogReadError::InvalidExtension {
            path: path.display().to_string(),
            expected: "csv",
        })
    })?;
    let batch: Batch = csvlog::from_file(text)?;
    log::info!(
        "new batch ready: {} ({} frames, {} rejected rows)",
        text,
        batch.frames.len(),
        batch.rejected.len()
    );
    Ok(batch)
}

/// Follows a directory a converter keeps writing numbered batches into.
///
/// Each poll looks at the highest-numbered file and loads it when it differs from the one
/// loaded last. Intermediate files written between two polls are skipped.
#[derive(Debug, Clone)]
pub struct DirectoryFeed {
    dir: PathBuf,
    last_loaded: Option<u64>,
}

impl DirectoryFeed {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_loaded: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of the batch loaded last.
    pub fn last_loaded(&self) -> Option<u64> {
        self.last_loaded
    }
}

impl BatchSource for DirectoryFeed {
    fn poll(&mut self) -> Result<Option<Batch>, FeedError> {
        let files: Vec<(u64, PathBuf)> = numbered_batches(&self.dir)?;
        let Some((number, path)) = files.last() else {
            return Ok(None);
        };
        if self.last_loaded == Some(*number) {
            return Ok(None);
        }
        let batch: Batch = load(path)?;
        self.last_loaded = Some(*number);
        Ok(Some(batch))
    }
}

/// Replays the numbered batches of a directory one by one, no faster than a minimum interval.
///
/// Once the last file has been played the feed waits there until a higher-numbered file
/// appears.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    dir: PathBuf,
    min_interval: Duration,
    // Index into the sorted listing of the batch played last.
    position: Option<usize>,
    last_step: Option<Instant>,
}

impl ReplayFeed {
    pub fn new(dir: impl Into<PathBuf>, min_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            min_interval,
            position: None,
            last_step: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Index of the batch played last, in the sorted listing.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Starts over from the first batch.
    pub fn rewind(&mut self) {
        self.position = None;
        self.last_step = None;
    }

    /// [`BatchSource::poll`] with an explicit clock.
    pub fn poll_at(&mut self, now: Instant) -> Result<Option<Batch>, FeedError> {
        if let Some(last) = self.last_step
            && now.saturating_duration_since(last) < self.min_interval
        {
            return Ok(None);
        }

        let files: Vec<(u64, PathBuf)> = numbered_batches(&self.dir)?;
        let next: usize = self.position.map_or(0, |p| p + 1);
        let Some((_, path)) = files.get(next) else {
            return Ok(None);
        };

        let batch: Batch = load(path)?;
        self.position = Some(next);
        self.last_step = Some(now);
        Ok(Some(batch))
    }
}

impl BatchSource for ReplayFeed {
    fn poll(&mut self) -> Result<Option<Batch>, FeedError> {
        self.poll_at(Instant::now())
    }
}
