//! # types
//!
//! `types` is the module containing all the public data models of the crate:
//! frames, signal identifiers, decoded values, histories, configuration and errors.

pub mod config;
pub mod errors;
pub mod frame;
pub mod observation;
pub mod series;
pub mod signal;
pub mod value;
