//! Door Control 2 (DC2), Air Suspension Control 4 (ASC4), Air Supply Pressure (AIR1)
//! and Ambient Conditions (AMB).

use crate::decode::fields::{Payload, scaled};
use crate::types::{
    config::SentinelPolicy,
    value::{DoorState, SignalValue},
};

/// DC2 door 1: bits 2..3 of byte 0.
pub fn door_1(data: &[u8; 8]) -> SignalValue {
    SignalValue::Door(DoorState::from_raw(Payload(data).bits(0, 2, 0x03)))
}

/// DC2 door 2: bits 0..1 of byte 1.
pub fn door_2(data: &[u8; 8]) -> SignalValue {
    SignalValue::Door(DoorState::from_raw(Payload(data).bits(1, 0, 0x03)))
}

/// ASC4 bellow pressure, kPa: whole payload as one little-endian `u64`, divided by 10.
pub fn air_suspension(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u64_le(), policy, |raw| raw / 10.0)
}

/// AIR1 supply pressure, kPa: `u16le(byte2, byte3) * 8`.
pub fn air_supply_pressure(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(2), policy, |raw| raw * 8.0)
}

/// AMB ambient air temperature, °C: `u16le(byte3, byte4) * 0.03125 - 273`.
pub fn ambient_air_temperature(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(3), policy, |raw| raw * 0.03125 - 273.0)
}
