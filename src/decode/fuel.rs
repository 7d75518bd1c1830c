//! Fuel related PGNs: HRLFC, LFC, LFE and the DEF tank level (AT1T1I).

use crate::decode::fields::{Payload, scaled};
use crate::types::{config::SentinelPolicy, value::SignalValue};

/// HRLFC total fuel used, l: `u32le(byte4..byte7) / 1000`. Running total.
pub fn fuel_consumed_high_res(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u32_le(4), policy, |raw| raw / 1000.0)
}

/// LFC total fuel used, l: `u32le(byte4..byte7) * 0.5`. Running total.
pub fn fuel_consumed(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u32_le(4), policy, |raw| raw * 0.5)
}

/// LFE fuel rate, l/h: `u16le(byte0, byte1) * 0.05`.
pub fn fuel_rate(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(0), policy, |raw| raw * 0.05)
}

/// LFE instantaneous fuel economy, km/l: `u16le(byte2, byte3) / 512`.
pub fn fuel_economy(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(2), policy, |raw| raw / 512.0)
}

/// AT1T1I diesel exhaust fluid tank level, %: `byte0 * 0.4`.
pub fn def_tank_level(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u8(0), policy, |raw| raw * 0.4)
}
