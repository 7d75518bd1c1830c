//! # decode
//!
//! Turns [`Frame`]s into [`Observation`]s.
//!
//! The per-signal formulas are pure functions grouped by PGN family in the submodules;
//! [`Decoder`] routes each frame to the signals of its PGN through a table keyed by PGN.

pub mod body;
pub mod engine;
pub(crate) mod fields;
pub mod fuel;
pub mod vehicle;

use std::collections::HashMap;

use crate::types::{
    config::SentinelPolicy,
    frame::{Frame, Pgn},
    observation::Observation,
    signal::SignalId,
    value::SignalValue,
};

/// Decodes one signal from a payload.
pub fn decode_signal(signal: SignalId, data: &[u8; 8], policy: SentinelPolicy) -> SignalValue {
    match signal {
        SignalId::VehicleSpeed => vehicle::vehicle_speed(data, policy),
        SignalId::FuelConsumedHighRes => fuel::fuel_consumed_high_res(data, policy),
        SignalId::FuelConsumed => fuel::fuel_consumed(data, policy),
        SignalId::FuelRate => fuel::fuel_rate(data, policy),
        SignalId::FuelEconomy => fuel::fuel_economy(data, policy),
        SignalId::Door1 => body::door_1(data),
        SignalId::Door2 => body::door_2(data),
        SignalId::AirSuspension => body::air_suspension(data, policy),
        SignalId::EngineTemperature => engine::engine_temperature(data, policy),
        SignalId::DefTankLevel => fuel::def_tank_level(data, policy),
        SignalId::AmbientAirTemperature => body::ambient_air_temperature(data, policy),
        SignalId::AlternatorSpeed => engine::alternator_speed(data, policy),
        SignalId::Alternator1 => engine::alternator_status(data, 1),
        SignalId::Alternator2 => engine::alternator_status(data, 2),
        SignalId::Alternator3 => engine::alternator_status(data, 3),
        SignalId::Alternator4 => engine::alternator_status(data, 4),
        SignalId::VehicleDistanceHighRes => vehicle::vehicle_distance(data, policy),
        SignalId::AirSupplyPressure => body::air_supply_pressure(data, policy),
        SignalId::WheelSpeed => vehicle::wheel_speed(data, policy),
        SignalId::ClutchSwitch => vehicle::clutch_switch(data),
        SignalId::BrakeSwitch => vehicle::brake_switch(data),
        SignalId::CruiseControlActive => vehicle::cruise_control_active(data),
        SignalId::CruiseControlState => vehicle::cruise_control_state(data),
        SignalId::CruiseControlPto => vehicle::cruise_control_pto(data),
        SignalId::EngineTorque => engine::engine_torque(data, policy),
        SignalId::EngineSpeed => engine::engine_speed(data, policy),
        SignalId::AcceleratorPedal => engine::accelerator_pedal(data, policy),
        SignalId::EngineLoad => engine::engine_load(data, policy),
    }
}

/// PGN → signals dispatch table.
///
/// Frames whose PGN has no entry produce no observations; most bus traffic is of no
/// interest to the decoded signal set.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoder {
    policy: SentinelPolicy,
    signals_by_pgn: HashMap<Pgn, Vec<SignalId>>,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new(SentinelPolicy::default())
    }
}

impl Decoder {
    /// Table with every known signal.
    pub fn new(policy: SentinelPolicy) -> Self {
        Decoder::with_signals(policy, SignalId::ALL)
    }

    /// Table restricted to `signals`. Duplicates are ignored; order within a PGN follows
    /// the iteration order.
    pub fn with_signals(policy: SentinelPolicy, signals: impl IntoIterator<Item = SignalId>) -> Self {
        let mut signals_by_pgn: HashMap<Pgn, Vec<SignalId>> = HashMap::new();
        for signal in signals {
            let entry: &mut Vec<SignalId> = signals_by_pgn.entry(signal.pgn()).or_default();
            if !entry.contains(&signal) {
                entry.push(signal);
            }
        }
        Self {
            policy,
            signals_by_pgn,
        }
    }

    pub fn policy(&self) -> SentinelPolicy {
        self.policy
    }

    pub fn handles(&self, pgn: Pgn) -> bool {
        self.signals_by_pgn.contains_key(&pgn)
    }

    pub fn signals_for(&self, pgn: Pgn) -> &[SignalId] {
        self.signals_by_pgn
            .get(&pgn)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All observations carried by `frame`, in table order; empty for an unknown PGN.
    pub fn decode(&self, frame: &Frame) -> Vec<Observation> {
        self.signals_for(frame.pgn())
            .iter()
            .map(|&signal| {
                Observation::new(
                    frame.timestamp(),
                    signal,
                    decode_signal(signal, frame.data(), self.policy),
                )
            })
            .collect()
    }

    /// Decodes a run of frames, keeping frame order.
    pub fn decode_all<'a>(&self, frames: impl IntoIterator<Item = &'a Frame>) -> Vec<Observation> {
        frames
            .into_iter()
            .flat_map(|frame| self.decode(frame))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::signal::{PGN_CCVS1, PGN_TCO1};
    use crate::types::value::{CruiseControlState, DoorState, PtoState};

    fn frame(pgn: u16, data: [u8; 8]) -> Frame {
        Frame::new(1637164800.0, 6, Pgn(pgn), 0x00, &data).unwrap()
    }

    #[test]
    fn tachograph_frame_yields_speed() {
        let decoder = Decoder::default();
        let obs = decoder.decode(&frame(0xFE6C, [0, 0, 0, 0, 0, 0, 0x20, 0x50]));
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].signal, SignalId::VehicleSpeed);
        assert_eq!(obs[0].value, SignalValue::Number(80.125));
        assert_eq!(obs[0].timestamp, 1637164800.0);
    }

    #[test]
    fn door_frame_yields_both_doors() {
        let decoder = Decoder::default();
        let obs = decoder.decode(&frame(0xFDA5, [0x04, 0x00, 0, 0, 0, 0, 0, 0]));
        let pairs: Vec<(SignalId, SignalValue)> = obs.iter().map(|o| (o.signal, o.value)).collect();
        assert_eq!(
            pairs,
            vec![
                (SignalId::Door1, SignalValue::Door(DoorState::Open)),
                (SignalId::Door2, SignalValue::Door(DoorState::Closed)),
            ]
        );
    }

    #[test]
    fn cruise_control_frame_fans_out() {
        let decoder = Decoder::default();
        let obs = decoder.decode(&frame(0xFEF1, [0, 0x28, 0, 0x01, 0, 0, 0x00, 0]));
        let signals: Vec<SignalId> = obs.iter().map(|o| o.signal).collect();
        assert_eq!(
            signals,
            vec![
                SignalId::WheelSpeed,
                SignalId::ClutchSwitch,
                SignalId::BrakeSwitch,
                SignalId::CruiseControlActive,
                SignalId::CruiseControlState,
                SignalId::CruiseControlPto,
            ]
        );
        assert_eq!(obs[0].value, SignalValue::Number(40.0));
        assert_eq!(obs[3].value, SignalValue::Flag(true));
        assert_eq!(obs[4].value, SignalValue::Cruise(CruiseControlState::Off));
        assert_eq!(obs[5].value, SignalValue::Pto(PtoState::Off));
    }

    #[test]
    fn unknown_pgn_yields_nothing() {
        let decoder = Decoder::default();
        assert!(decoder.decode(&frame(0xFEE5, [0xFF; 8])).is_empty());
        assert!(!decoder.handles(Pgn(0xFEE5)));
        assert!(decoder.signals_for(Pgn(0xFEE5)).is_empty());
    }

    #[test]
    fn decoding_is_repeatable() {
        let decoder = Decoder::default();
        let f = frame(0xF004, [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]);
        assert_eq!(decoder.decode(&f), decoder.decode(&f));
    }

    #[test]
    fn restricted_table() {
        let decoder = Decoder::with_signals(
            SentinelPolicy::Absent,
            [SignalId::VehicleSpeed, SignalId::WheelSpeed, SignalId::VehicleSpeed],
        );
        assert_eq!(decoder.signals_for(PGN_TCO1), &[SignalId::VehicleSpeed]);
        assert_eq!(decoder.signals_for(PGN_CCVS1), &[SignalId::WheelSpeed]);
        assert!(!decoder.handles(Pgn(0xF004)));
    }

    #[test]
    fn every_signal_is_routed_to_its_pgn() {
        let decoder = Decoder::default();
        for signal in SignalId::ALL {
            assert!(decoder.signals_for(signal.pgn()).contains(&signal));
        }
    }

    #[test]
    fn decode_all_keeps_frame_order() {
        let decoder = Decoder::new(SentinelPolicy::Literal);
        let frames = vec![
            frame(0xFEEE, [0xFF, 0, 0, 0, 0, 0, 0, 0]),
            frame(0xFE56, [100, 0, 0, 0, 0, 0, 0, 0]),
        ];
        let obs = decoder.decode_all(&frames);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].value, SignalValue::Number(215.0));
        assert_eq!(obs[1].signal, SignalId::DefTankLevel);
    }
}
