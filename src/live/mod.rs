//! # live
//!
//! Incremental decode/aggregate loop over batches arriving from a [`BatchSource`].
//!
//! A [`LiveSession`] does nothing on its own: an external scheduler calls
//! [`LiveSession::on_tick`] every [`SessionConfig::poll_interval_ms`] and reads the series back
//! through [`LiveSession::aggregator`].

pub mod feed;

pub use feed::{BatchSource, DirectoryFeed, ReplayFeed};

use std::path::PathBuf;
use std::time::Duration;

use crate::aggregate::Aggregator;
use crate::csvlog::Batch;
use crate::decode::Decoder;
use crate::types::{
    config::SessionConfig, errors::FeedError, observation::Observation, signal::SignalId,
};

/// What one tick changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickUpdate {
    /// Source of the batch consumed by this tick, `None` when no new batch was available.
    pub batch: Option<String>,
    /// Frames kept after the start-time filter.
    pub frames: usize,
    pub observations: usize,
    pub rejected: usize,
    /// Signals that received at least one observation, in first-seen order.
    pub updated: Vec<SignalId>,
}

impl TickUpdate {
    pub fn is_empty(&self) -> bool {
        self.batch.is_none()
    }
}

/// Decoder, aggregator and batch source of one live session.
#[derive(Debug)]
pub struct LiveSession<S: BatchSource> {
    source: S,
    decoder: Decoder,
    aggregator: Aggregator,
    // Frames at or before this unix time are dropped on ingest.
    ignore_before: Option<f64>,
    poll_interval: Duration,
}

impl<S: BatchSource> LiveSession<S> {
    pub fn new(source: S, config: &SessionConfig) -> Self {
        Self {
            source,
            decoder: Decoder::new(config.sentinel),
            aggregator: Aggregator::new(config.aggregator()),
            ignore_before: config.ignore_before_unix(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Session built from explicit parts; no start-time filter.
    pub fn with_parts(source: S, decoder: Decoder, aggregator: Aggregator) -> Self {
        Self {
            source,
            decoder,
            aggregator,
            ignore_before: None,
            poll_interval: Duration::from_millis(crate::types::config::DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Polls the source once and folds a new batch into the histories.
    ///
    /// # Errors
    /// Propagates [`FeedError`] from the source; the session state is left untouched.
    pub fn on_tick(&mut self) -> Result<TickUpdate, FeedError> {
        let Some(batch) = self.source.poll()? else {
            log::debug!("tick: no new batch");
            return Ok(TickUpdate::default());
        };
        Ok(self.ingest(batch))
    }

    /// Folds a batch into the histories, as [`on_tick`](Self::on_tick) does for polled ones.
    pub fn ingest(&mut self, mut batch: Batch) -> TickUpdate {
        if let Some(start) = self.ignore_before {
            batch.retain_after(start);
        }

        let mut update: TickUpdate = TickUpdate {
            batch: Some(batch.source.clone()),
            frames: batch.frames.len(),
            rejected: batch.rejected.len(),
            ..Default::default()
        };

        for frame in &batch.frames {
            let observations: Vec<Observation> = self.decoder.decode(frame);
            for obs in observations {
                if !update.updated.contains(&obs.signal) {
                    update.updated.push(obs.signal);
                }
                self.aggregator.append(obs);
                update.observations += 1;
            }
        }
        self.aggregator.expire();

        log::debug!(
            "tick: {} frames, {} observations, {} signals updated, {} rejected",
            update.frames,
            update.observations,
            update.updated.len(),
            update.rejected
        );
        update
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Cadence the session expects `on_tick` to be called with.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Forgets every history and cumulative baseline. The source keeps its position.
    pub fn restart(&mut self) {
        log::info!("session restart");
        self.aggregator.reset();
    }
}

impl LiveSession<DirectoryFeed> {
    /// Session following the newest batch written to `dir`.
    pub fn follow(dir: impl Into<PathBuf>, config: &SessionConfig) -> Self {
        LiveSession::new(DirectoryFeed::new(dir), config)
    }
}

impl LiveSession<ReplayFeed> {
    /// Session replaying the batches of `dir` at the configured replay interval.
    pub fn replay(dir: impl Into<PathBuf>, config: &SessionConfig) -> Self {
        let interval: Duration = Duration::from_millis(config.replay_interval_ms);
        LiveSession::new(ReplayFeed::new(dir, interval), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::LogReadError;
    use crate::types::frame::{Frame, Pgn};
    use crate::types::value::SignalValue;
    use std::collections::VecDeque;

    /// Hands out prepared batches, one per poll.
    struct QueueSource(VecDeque<Result<Option<Batch>, FeedError>>);

    impl BatchSource for QueueSource {
        fn poll(&mut self) -> Result<Option<Batch>, FeedError> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    fn frame(ts: f64, pgn: u16, data: [u8; 8]) -> Frame {
        Frame::new(ts, 6, Pgn(pgn), 0xFE, &data).unwrap()
    }

    fn batch(name: &str, frames: Vec<Frame>) -> Batch {
        Batch {
            source: name.to_string(),
            frames,
            rejected: Vec::new(),
        }
    }

    fn fuel(ts: f64, half_litres: u32) -> Frame {
        let b = half_litres.to_le_bytes();
        frame(ts, 0xFEE9, [0, 0, 0, 0, b[0], b[1], b[2], b[3]])
    }

    fn session(batches: Vec<Batch>, config: &SessionConfig) -> LiveSession<QueueSource> {
        let queue = batches.into_iter().map(|b| Ok(Some(b))).collect();
        LiveSession::new(QueueSource(queue), config)
    }

    #[test]
    fn tick_decodes_and_aggregates() {
        let mut live = session(
            vec![batch(
                "1.csv",
                vec![
                    frame(10.0, 0xFE6C, [0, 0, 0, 0, 0, 0, 0x20, 0x50]),
                    frame(10.5, 0xFDA5, [0x04, 0, 0, 0, 0, 0, 0, 0]),
                    frame(11.0, 0xFEE5, [0; 8]),
                ],
            )],
            &SessionConfig::default(),
        );

        let update = live.on_tick().unwrap();
        assert_eq!(update.batch.as_deref(), Some("1.csv"));
        assert_eq!(update.frames, 3);
        assert_eq!(update.observations, 3);
        assert_eq!(
            update.updated,
            vec![SignalId::VehicleSpeed, SignalId::Door1, SignalId::Door2]
        );
        let speed = live.aggregator().current_series(SignalId::VehicleSpeed);
        assert_eq!(speed[0].value, SignalValue::Number(80.125));

        let idle = live.on_tick().unwrap();
        assert!(idle.is_empty());
        assert_eq!(live.aggregator().series_count(), 3);
    }

    #[test]
    fn frames_before_start_time_are_dropped() {
        let config = SessionConfig::from_json_str(r#"{"ignore_before": "1970-01-01T00:00:20"}"#).unwrap();
        let mut live = session(
            vec![batch("1.csv", vec![fuel(20.0, 10), fuel(21.0, 12), fuel(22.0, 13)])],
            &config,
        );
        let update = live.on_tick().unwrap();
        assert_eq!(update.frames, 2);
        let values: Vec<Option<f64>> = live
            .aggregator()
            .current_series(SignalId::FuelConsumed)
            .iter()
            .map(|s| s.value.as_f64())
            .collect();
        assert_eq!(values, vec![Some(0.0), Some(0.5)]);
    }

    #[test]
    fn window_slides_across_ticks() {
        let mut live = session(
            vec![
                batch("1.csv", vec![fuel(0.0, 0), fuel(30.0, 2)]),
                batch("2.csv", vec![fuel(70.0, 4), fuel(90.0, 6)]),
            ],
            &SessionConfig::default(),
        );
        live.on_tick().unwrap();
        live.on_tick().unwrap();
        let series = live.aggregator().current_series(SignalId::FuelConsumed);
        let ts: Vec<f64> = series.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![30.0, 70.0, 90.0]);
        assert_eq!(series.last().unwrap().value, SignalValue::Number(3.0));
    }

    #[test]
    fn quiet_signal_is_expired_after_tick() {
        let mut live = session(
            vec![
                batch(
                    "1.csv",
                    vec![
                        frame(0.0, 0xFEEE, [0x5A, 0, 0, 0, 0, 0, 0, 0]),
                        frame(5.0, 0xFEEE, [0x5B, 0, 0, 0, 0, 0, 0, 0]),
                    ],
                ),
                batch("2.csv", vec![fuel(200.0, 4)]),
            ],
            &SessionConfig::default(),
        );
        live.on_tick().unwrap();
        live.on_tick().unwrap();
        let temperature = live
            .aggregator()
            .get_series_by_signal(SignalId::EngineTemperature)
            .unwrap();
        assert_eq!(temperature.len(), 1);
        assert_eq!(temperature.newest_timestamp(), Some(5.0));
    }

    #[test]
    fn restart_forgets_baselines() {
        let mut live = session(
            vec![batch("1.csv", vec![fuel(1.0, 100)]), batch("2.csv", vec![fuel(2.0, 120)])],
            &SessionConfig::default(),
        );
        live.on_tick().unwrap();
        live.restart();
        assert_eq!(live.aggregator().series_count(), 0);
        live.on_tick().unwrap();
        assert_eq!(live.aggregator().baseline(SignalId::FuelConsumed), Some(60.0));
    }

    #[test]
    fn feed_errors_propagate() {
        let error = FeedError::Batch(LogReadError::InvalidExtension {
            path: "x".to_string(),
            expected: "csv",
        });
        let mut live = LiveSession::with_parts(
            QueueSource(VecDeque::from([Err(error)])),
            Decoder::default(),
            Aggregator::default(),
        );
        assert!(live.on_tick().is_err());
        assert!(live.on_tick().unwrap().is_empty());
    }

    #[test]
    fn follows_directory_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("1.csv"),
            "0,100.0,FEEE,5A00000000000000,Engine Temperature 1: ET1\n",
        )
        .unwrap();
        let mut live = LiveSession::follow(dir.path(), &SessionConfig::default());
        assert_eq!(live.poll_interval(), Duration::from_millis(1000));
        let update = live.on_tick().unwrap();
        assert_eq!(update.updated, vec![SignalId::EngineTemperature]);
        assert_eq!(
            live.aggregator().current_series(SignalId::EngineTemperature)[0].value,
            SignalValue::Number(50.0)
        );
    }
}
