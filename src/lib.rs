//! # j1939_tools
//!
//! Rust utilities for decoding **SAE J1939** CAN logs into vehicle signals.
//!
//! ## Highlights
//! - **Frame model**: 29-bit identifiers split into priority, PGN and source address ([`Frame`]).
//! - **Signal decoding**: fixed per-signal formulas for speed, fuel, engine, doors, cruise control ([`Decoder`]).
//! - **Rolling histories**: SlotMap-backed per-signal series with a retention horizon and
//!   baseline-subtracted running totals ([`Aggregator`]).
//! - **Log readers**: candump-style dumps (`dump`) and converted CSV batches (`csvlog`).
//! - **Live feed**: directory polling / replay sources driven by an external tick (`live`).
//! - **PGN names**: built-in reference table, extendable from JSON ([`PgnRegistry`]).
//!

pub mod aggregate;
#[cfg(feature = "csv")]
pub mod csvlog;
pub mod decode;
#[cfg(feature = "dump")]
pub mod dump;
#[cfg(feature = "live")]
pub mod live;
pub mod registry;
#[doc(hidden)]
pub mod types;

// Top-level re-exports (appear under Crate Items → Structs)
#[doc(inline)]
pub use crate::types::{
    config::{AggregatorConfig, OrderingPolicy, SentinelPolicy, SessionConfig},
    errors::{ConfigError, FeedError, FrameError, LogReadError, RejectedRecord},
    frame::{Frame, Pgn},
    observation::{Observation, Sample},
    series::SignalSeries,
    signal::{SignalId, UnknownSignal},
    value::{AlternatorStatus, CruiseControlState, DoorState, PtoState, SignalValue},
};

pub use crate::aggregate::{Aggregator, SeriesKey, decode_frames};
pub use crate::decode::{Decoder, decode_signal};
pub use crate::registry::{PgnCount, PgnRegistry};

#[cfg(feature = "csv")]
pub use crate::csvlog::Batch;
#[cfg(feature = "dump")]
pub use crate::dump::DumpLog;
#[cfg(feature = "live")]
pub use crate::live::{BatchSource, DirectoryFeed, LiveSession, ReplayFeed, TickUpdate};
