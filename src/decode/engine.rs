//! Engine controllers (EEC1, EEC2), Engine Temperature 1 (ET1) and Alternator Speed (AS).

use crate::decode::fields::{Payload, scaled};
use crate::types::{
    config::SentinelPolicy,
    value::{AlternatorStatus, SignalValue},
};

/// EEC1 actual engine torque, %: `byte2 - 125`.
pub fn engine_torque(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u8(2), policy, |raw| raw - 125.0)
}

/// EEC1 engine speed, rpm: `u16le(byte3, byte4) / 8`.
pub fn engine_speed(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(3), policy, |raw| raw / 8.0)
}

/// EEC2 accelerator pedal position, %: `byte1 * 0.4`.
pub fn accelerator_pedal(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u8(1), policy, |raw| raw * 0.4)
}

/// EEC2 engine load at current speed, %: `byte2 * 0.4`.
pub fn engine_load(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u8(2), policy, |raw| raw * 0.4)
}

/// ET1 coolant temperature, °C: `byte0 - 40`.
pub fn engine_temperature(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u8(0), policy, |raw| raw - 40.0)
}

/// AS alternator speed, rpm: `u16le(byte0, byte1) / 8`.
pub fn alternator_speed(data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    scaled(Payload(data).u16_le(0), policy, |raw| raw / 8.0)
}

/// AS status of alternator `index` (1..=4): 2-bit field of byte 2 at shift `2 * (index - 1)`.
pub fn alternator_status(data: &[u8; 8], index: u8) -> SignalValue {
    let shift: u8 = 2 * (index.clamp(1, 4) - 1);
    SignalValue::Alternator(AlternatorStatus::from_raw(Payload(data).bits(2, shift, 0x03)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABSENT: SentinelPolicy = SentinelPolicy::Absent;

    #[test]
    fn eec1_torque_and_speed() {
        // torque 175 -> 50 %, speed 0x3E80 = 16000 -> 2000 rpm
        let data = [0, 0, 175, 0x80, 0x3E, 0, 0, 0];
        assert_eq!(engine_torque(&data, ABSENT), SignalValue::Number(50.0));
        assert_eq!(engine_speed(&data, ABSENT), SignalValue::Number(2000.0));
    }

    #[test]
    fn eec1_negative_torque() {
        let data = [0, 0, 100, 0, 0, 0, 0, 0];
        assert_eq!(engine_torque(&data, ABSENT), SignalValue::Number(-25.0));
    }

    #[test]
    fn eec2_pedal_and_load() {
        let data = [0, 125, 50, 0, 0, 0, 0, 0];
        assert_eq!(accelerator_pedal(&data, ABSENT), SignalValue::Number(50.0));
        assert_eq!(engine_load(&data, ABSENT), SignalValue::Number(20.0));
    }

    #[test]
    fn engine_temperature_offset() {
        assert_eq!(engine_temperature(&[130, 0, 0, 0, 0, 0, 0, 0], ABSENT), SignalValue::Number(90.0));
        assert_eq!(
            engine_temperature(&[0xFF, 0, 0, 0, 0, 0, 0, 0], SentinelPolicy::Literal),
            SignalValue::Number(215.0)
        );
    }

    #[test]
    fn alternator_fields() {
        // byte2 = 0b11_10_01_00 -> alt1 not charging, alt2 charging, alt3 error, alt4 n/a
        let data = [0x40, 0x1F, 0b1110_0100, 0, 0, 0, 0, 0];
        assert_eq!(alternator_speed(&data, ABSENT), SignalValue::Number(1000.0));
        assert_eq!(alternator_status(&data, 1), SignalValue::Alternator(AlternatorStatus::NotCharging));
        assert_eq!(alternator_status(&data, 2), SignalValue::Alternator(AlternatorStatus::Charging));
        assert_eq!(alternator_status(&data, 3), SignalValue::Alternator(AlternatorStatus::Error));
        assert_eq!(alternator_status(&data, 4), SignalValue::Alternator(AlternatorStatus::NotAvailable));
    }
}
