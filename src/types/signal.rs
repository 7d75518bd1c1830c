use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::frame::Pgn;

pub const PGN_EEC2: Pgn = Pgn(0xF003);
pub const PGN_EEC1: Pgn = Pgn(0xF004);
pub const PGN_HRLFC: Pgn = Pgn(0xFD09);
pub const PGN_DC2: Pgn = Pgn(0xFDA5);
pub const PGN_AT1T1I: Pgn = Pgn(0xFE56);
pub const PGN_ASC4: Pgn = Pgn(0xFE58);
pub const PGN_TCO1: Pgn = Pgn(0xFE6C);
pub const PGN_AIR1: Pgn = Pgn(0xFEAE);
pub const PGN_VDHR: Pgn = Pgn(0xFEC1);
pub const PGN_AS: Pgn = Pgn(0xFED5);
pub const PGN_LFC: Pgn = Pgn(0xFEE9);
pub const PGN_ET1: Pgn = Pgn(0xFEEE);
pub const PGN_CCVS1: Pgn = Pgn(0xFEF1);
pub const PGN_LFE: Pgn = Pgn(0xFEF2);
pub const PGN_AMB: Pgn = Pgn(0xFEF5);

/// Every vehicle signal this crate knows how to decode.
///
/// The identifier carries the static metadata of a signal: its source PGN, unit, stable
/// snake_case name and whether it is a running total that gets baseline-subtracted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalId {
    VehicleSpeed,
    FuelConsumedHighRes,
    FuelConsumed,
    FuelRate,
    FuelEconomy,
    Door1,
    Door2,
    AirSuspension,
    EngineTemperature,
    DefTankLevel,
    AmbientAirTemperature,
    AlternatorSpeed,
    Alternator1,
    Alternator2,
    Alternator3,
    Alternator4,
    VehicleDistanceHighRes,
    AirSupplyPressure,
    WheelSpeed,
    ClutchSwitch,
    BrakeSwitch,
    CruiseControlActive,
    CruiseControlState,
    CruiseControlPto,
    EngineTorque,
    EngineSpeed,
    AcceleratorPedal,
    EngineLoad,
}

impl SignalId {
    /// All signals; signals sharing a PGN appear in the order they are emitted.
    pub const ALL: [SignalId; 28] = [
        SignalId::VehicleSpeed,
        SignalId::FuelConsumedHighRes,
        SignalId::FuelConsumed,
        SignalId::FuelRate,
        SignalId::FuelEconomy,
        SignalId::Door1,
        SignalId::Door2,
        SignalId::AirSuspension,
        SignalId::EngineTemperature,
        SignalId::DefTankLevel,
        SignalId::AmbientAirTemperature,
        SignalId::AlternatorSpeed,
        SignalId::Alternator1,
        SignalId::Alternator2,
        SignalId::Alternator3,
        SignalId::Alternator4,
        SignalId::VehicleDistanceHighRes,
        SignalId::AirSupplyPressure,
        SignalId::WheelSpeed,
        SignalId::ClutchSwitch,
        SignalId::BrakeSwitch,
        SignalId::CruiseControlActive,
        SignalId::CruiseControlState,
        SignalId::CruiseControlPto,
        SignalId::EngineTorque,
        SignalId::EngineSpeed,
        SignalId::AcceleratorPedal,
        SignalId::EngineLoad,
    ];

    pub fn pgn(&self) -> Pgn {
        match self {
            SignalId::VehicleSpeed => PGN_TCO1,
            SignalId::FuelConsumedHighRes => PGN_HRLFC,
            SignalId::FuelConsumed => PGN_LFC,
            SignalId::FuelRate | SignalId::FuelEconomy => PGN_LFE,
            SignalId::Door1 | SignalId::Door2 => PGN_DC2,
            SignalId::AirSuspension => PGN_ASC4,
            SignalId::EngineTemperature => PGN_ET1,
            SignalId::DefTankLevel => PGN_AT1T1I,
            SignalId::AmbientAirTemperature => PGN_AMB,
            SignalId::AlternatorSpeed
            | SignalId::Alternator1
            | SignalId::Alternator2
            | SignalId::Alternator3
            | SignalId::Alternator4 => PGN_AS,
            SignalId::VehicleDistanceHighRes => PGN_VDHR,
            SignalId::AirSupplyPressure => PGN_AIR1,
            SignalId::WheelSpeed
            | SignalId::ClutchSwitch
            | SignalId::BrakeSwitch
            | SignalId::CruiseControlActive
            | SignalId::CruiseControlState
            | SignalId::CruiseControlPto => PGN_CCVS1,
            SignalId::EngineTorque | SignalId::EngineSpeed => PGN_EEC1,
            SignalId::AcceleratorPedal | SignalId::EngineLoad => PGN_EEC2,
        }
    }

    /// Stable snake_case name, also accepted by [`SignalId::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            SignalId::VehicleSpeed => "vehicle_speed",
            SignalId::FuelConsumedHighRes => "fuel_consumed_high_res",
            SignalId::FuelConsumed => "fuel_consumed",
            SignalId::FuelRate => "fuel_rate",
            SignalId::FuelEconomy => "fuel_economy",
            SignalId::Door1 => "door_1",
            SignalId::Door2 => "door_2",
            SignalId::AirSuspension => "air_suspension",
            SignalId::EngineTemperature => "engine_temperature",
            SignalId::DefTankLevel => "def_tank_level",
            SignalId::AmbientAirTemperature => "ambient_air_temperature",
            SignalId::AlternatorSpeed => "alternator_speed",
            SignalId::Alternator1 => "alternator_1",
            SignalId::Alternator2 => "alternator_2",
            SignalId::Alternator3 => "alternator_3",
            SignalId::Alternator4 => "alternator_4",
            SignalId::VehicleDistanceHighRes => "vehicle_distance_high_res",
            SignalId::AirSupplyPressure => "air_supply_pressure",
            SignalId::WheelSpeed => "wheel_speed",
            SignalId::ClutchSwitch => "clutch_switch",
            SignalId::BrakeSwitch => "brake_switch",
            SignalId::CruiseControlActive => "cruise_control_active",
            SignalId::CruiseControlState => "cruise_control_state",
            SignalId::CruiseControlPto => "cruise_control_pto",
            SignalId::EngineTorque => "engine_torque",
            SignalId::EngineSpeed => "engine_speed",
            SignalId::AcceleratorPedal => "accelerator_pedal",
            SignalId::EngineLoad => "engine_load",
        }
    }

    /// Chart title, e.g. `"Vehicle Speed [km/h]"`.
    pub fn title(&self) -> String {
        let label: &str = match self {
            SignalId::VehicleSpeed => "Vehicle Speed",
            SignalId::FuelConsumedHighRes | SignalId::FuelConsumed => "Fuel Consumption",
            SignalId::FuelRate => "Fuel Rate",
            SignalId::FuelEconomy => "Fuel Economy",
            SignalId::Door1 => "Door 1 Open State",
            SignalId::Door2 => "Door 2 Open State",
            SignalId::AirSuspension => "Air Suspension Control",
            SignalId::EngineTemperature => "Engine Temperature",
            SignalId::DefTankLevel => "Diesel Exhaust Fluid Tank 1",
            SignalId::AmbientAirTemperature => "Ambient Air",
            SignalId::AlternatorSpeed => "Alternator Speed",
            SignalId::Alternator1 => "Alternator 1 Status",
            SignalId::Alternator2 => "Alternator 2 Status",
            SignalId::Alternator3 => "Alternator 3 Status",
            SignalId::Alternator4 => "Alternator 4 Status",
            SignalId::VehicleDistanceHighRes => "Vehicle Distance",
            SignalId::AirSupplyPressure => "Air Supply Pressure",
            SignalId::WheelSpeed => "Wheel Speed",
            SignalId::ClutchSwitch => "Clutch Switch",
            SignalId::BrakeSwitch => "Brake Pedal",
            SignalId::CruiseControlActive => "Cruise Control",
            SignalId::CruiseControlState => "Cruise Control State",
            SignalId::CruiseControlPto => "Cruise Control PTO",
            SignalId::EngineTorque => "Engine Torque",
            SignalId::EngineSpeed => "Engine Speed",
            SignalId::AcceleratorPedal => "Accelerator Pedal",
            SignalId::EngineLoad => "Engine Load",
        };
        match self.unit() {
            Some(unit) => format!("{} [{}]", label, unit),
            None => label.to_string(),
        }
    }

    /// Physical unit; `None` for flags and categorical signals.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            SignalId::VehicleSpeed | SignalId::WheelSpeed => Some("km/h"),
            SignalId::FuelConsumedHighRes | SignalId::FuelConsumed => Some("l"),
            SignalId::FuelRate => Some("l/h"),
            SignalId::FuelEconomy => Some("km/l"),
            SignalId::AirSuspension | SignalId::AirSupplyPressure => Some("kPa"),
            SignalId::EngineTemperature | SignalId::AmbientAirTemperature => Some("°C"),
            SignalId::DefTankLevel
            | SignalId::EngineTorque
            | SignalId::AcceleratorPedal
            | SignalId::EngineLoad => Some("%"),
            SignalId::AlternatorSpeed | SignalId::EngineSpeed => Some("rpm"),
            SignalId::VehicleDistanceHighRes => Some("m"),
            SignalId::Door1
            | SignalId::Door2
            | SignalId::Alternator1
            | SignalId::Alternator2
            | SignalId::Alternator3
            | SignalId::Alternator4
            | SignalId::ClutchSwitch
            | SignalId::BrakeSwitch
            | SignalId::CruiseControlActive
            | SignalId::CruiseControlState
            | SignalId::CruiseControlPto => None,
        }
    }

    /// Running totals (fuel used, distance) are shown relative to the first reading.
    pub fn is_cumulative(&self) -> bool {
        matches!(
            self,
            SignalId::FuelConsumedHighRes | SignalId::FuelConsumed | SignalId::VehicleDistanceHighRes
        )
    }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name does not match any [`SignalId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown signal '{0}'")]
pub struct UnknownSignal(pub String);

impl FromStr for SignalId {
    type Err = UnknownSignal;

    /// Case-insensitive match on [`SignalId::name`].
    fn from_str(s: &str) -> Result<SignalId, UnknownSignal> {
        let key: String = s.trim().to_lowercase();
        SignalId::ALL
            .iter()
            .copied()
            .find(|sig| sig.name() == key)
            .ok_or_else(|| UnknownSignal(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: HashSet<&str> = SignalId::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), SignalId::ALL.len());
        for sig in SignalId::ALL {
            assert_eq!(sig.name().parse::<SignalId>(), Ok(sig));
        }
    }

    #[test]
    fn from_str_ignores_case() {
        assert_eq!("Vehicle_Speed".parse::<SignalId>(), Ok(SignalId::VehicleSpeed));
        assert!("speed".parse::<SignalId>().is_err());
    }

    #[test]
    fn cumulative_signals() {
        let cumulative: Vec<SignalId> = SignalId::ALL
            .iter()
            .copied()
            .filter(|s| s.is_cumulative())
            .collect();
        assert_eq!(
            cumulative,
            vec![
                SignalId::FuelConsumedHighRes,
                SignalId::FuelConsumed,
                SignalId::VehicleDistanceHighRes
            ]
        );
    }

    #[test]
    fn cruise_control_frame_feeds_six_signals() {
        let count = SignalId::ALL.iter().filter(|s| s.pgn() == PGN_CCVS1).count();
        assert_eq!(count, 6);
    }

    #[test]
    fn titles_carry_units() {
        assert_eq!(SignalId::VehicleSpeed.title(), "Vehicle Speed [km/h]");
        assert_eq!(SignalId::Door1.title(), "Door 1 Open State");
    }
}
