//! Tachograph (TCO1), Cruise Control/Vehicle Speed 1 (CCVS1) and
//! High Resolution Vehicle Distance (VDHR).

use crate::decode::fields::{Payload, scaled};
use crate::types::{
    config::SentinelPolicy,
    value::{CruiseControlState, PtoState, SignalValue},
};

/// TCO1 vehicle speed, km/h: `byte7 + byte6 / 256`.
pub fn vehicle_speed(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(6), policy, |raw| raw / 256.0)
}

/// CCVS1 wheel-based speed, km/h: `byte1 + byte2 / 256`.
pub fn wheel_speed(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_be(1), policy, |raw| raw / 256.0)
}

/// CCVS1 clutch switch: bit 6 of byte 3.
pub fn clutch_switch(data: &[u8; 8]) -> SignalValue {
    SignalValue::Flag(Payload(data).bit(3, 6))
}

/// CCVS1 brake switch: bit 4 of byte 3.
pub fn brake_switch(data: &[u8; 8]) -> SignalValue {
    SignalValue::Flag(Payload(data).bit(3, 4))
}

/// CCVS1 cruise control active: bit 0 of byte 3.
pub fn cruise_control_active(data: &[u8; 8]) -> SignalValue {
    SignalValue::Flag(Payload(data).bit(3, 0))
}

/// CCVS1 cruise control state: top 3 bits of byte 6.
pub fn cruise_control_state(data: &[u8; 8]) -> SignalValue {
    SignalValue::Cruise(CruiseControlState::from_raw(Payload(data).bits(6, 5, 0x07)))
}

/// CCVS1 PTO state: bottom 5 bits of byte 6.
pub fn cruise_control_pto(data: &[u8; 8]) -> SignalValue {
    SignalValue::Pto(PtoState::from_raw(Payload(data).bits(6, 0, 0x1F)))
}

/// VDHR total vehicle distance, m: `u32le(byte0..byte3) * 5`. Running total.
pub fn vehicle_distance(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u32_le(0), policy, |raw| raw * 5.0)
}
