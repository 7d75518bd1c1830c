//! Decoded signal values.
//!
//! Numeric readings are `f64`; everything that J1939 transmits as a small state field is an
//! explicit enum with a total `from_raw` mapping. Codes outside a field's defined range land
//! in an `Unrecognized(code)` variant instead of being dropped.

use serde::Serialize;

/// State of a door (DC2, 2-bit field).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DoorState {
    Closed,
    Open,
    Error,
    NotAvailable,
    Unrecognized(u8),
}

impl DoorState {
    pub fn from_raw(raw: u8) -> DoorState {
        match raw {
            0x00 => DoorState::Closed,
            0x01 => DoorState::Open,
            0x02 => DoorState::Error,
            0x03 => DoorState::NotAvailable,
            other => DoorState::Unrecognized(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DoorState::Closed => "closed",
            DoorState::Open => "open",
            DoorState::Error => "error",
            DoorState::NotAvailable => "not available",
            DoorState::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Charging state of one alternator (AS, 2-bit field).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AlternatorStatus {
    NotCharging,
    Charging,
    Error,
    NotAvailable,
    Unrecognized(u8),
}

impl AlternatorStatus {
    pub fn from_raw(raw: u8) -> AlternatorStatus {
        match raw {
            0x00 => AlternatorStatus::NotCharging,
            0x01 => AlternatorStatus::Charging,
            0x02 => AlternatorStatus::Error,
            0x03 => AlternatorStatus::NotAvailable,
            other => AlternatorStatus::Unrecognized(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlternatorStatus::NotCharging => "not charging",
            AlternatorStatus::Charging => "charging",
            AlternatorStatus::Error => "error",
            AlternatorStatus::NotAvailable => "not available",
            AlternatorStatus::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Cruise control state (CCVS1, 3-bit field).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CruiseControlState {
    Off,
    Hold,
    Accelerate,
    Decelerate,
    Resume,
    Set,
    AccelOverride,
    NotAvailable,
    Unrecognized(u8),
}

impl CruiseControlState {
    pub fn from_raw(raw: u8) -> CruiseControlState {
        match raw {
            0x00 => CruiseControlState::Off,
            0x01 => CruiseControlState::Hold,
            0x02 => CruiseControlState::Accelerate,
            0x03 => CruiseControlState::Decelerate,
            0x04 => CruiseControlState::Resume,
            0x05 => CruiseControlState::Set,
            0x06 => CruiseControlState::AccelOverride,
            0x07 => CruiseControlState::NotAvailable,
            other => CruiseControlState::Unrecognized(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CruiseControlState::Off => "off",
            CruiseControlState::Hold => "hold",
            CruiseControlState::Accelerate => "accelerate",
            CruiseControlState::Decelerate => "decelerate",
            CruiseControlState::Resume => "resume",
            CruiseControlState::Set => "set",
            CruiseControlState::AccelOverride => "accel. override",
            CruiseControlState::NotAvailable => "not available",
            CruiseControlState::Unrecognized(_) => "unrecognized",
        }
    }
}

/// PTO governor state carried in the low 5 bits of CCVS1 byte 6.
///
/// Only three codes are named; all others are `Unrecognized`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PtoState {
    Off,
    Set,
    NotAvailable,
    Unrecognized(u8),
}

impl PtoState {
    pub fn from_raw(raw: u8) -> PtoState {
        match raw {
            0x00 => PtoState::Off,
            0x05 => PtoState::Set,
            0x1F => PtoState::NotAvailable,
            other => PtoState::Unrecognized(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PtoState::Off => "off",
            PtoState::Set => "set",
            PtoState::NotAvailable => "not available",
            PtoState::Unrecognized(_) => "unknown",
        }
    }
}

/// One decoded value.
///
/// `NotAvailable` is produced for numeric fields holding the J1939 "not available"
/// pattern (all bits set) when sentinel detection is on.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SignalValue {
    Number(f64),
    Flag(bool),
    Door(DoorState),
    Alternator(AlternatorStatus),
    Cruise(CruiseControlState),
    Pto(PtoState),
    NotAvailable,
}

impl SignalValue {
    /// Numeric view used for charting: numbers as-is, flags as `0.0`/`1.0`,
    /// categories and absent values as `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Number(v) => Some(*v),
            SignalValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Category label for enumerated values.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SignalValue::Door(s) => Some(s.label()),
            SignalValue::Alternator(s) => Some(s.label()),
            SignalValue::Cruise(s) => Some(s.label()),
            SignalValue::Pto(s) => Some(s.label()),
            SignalValue::NotAvailable => Some("not available"),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, SignalValue::NotAvailable)
    }
}

impl std::fmt::Display for SignalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalValue::Number(v) => write!(f, "{}", v),
            SignalValue::Flag(b) => write!(f, "{}", b),
            other => write!(f, "{}", other.label().unwrap_or_default()),
        }
    }
}
