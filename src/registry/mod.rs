//! # registry
//!
//! PGN → display name table used to label frames in diagnostics.
//! Lookups are total: an unknown PGN simply has no name. The table never drives decoding.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;

use crate::types::{errors::ConfigError, frame::Frame, frame::Pgn};

/// Reference table of the PGNs seen on the logged vehicles.
const STANDARD_NAMES: [(u16, &str); 34] = [
    (0xFEE9, "Fuel Consumption: LFC"),
    (0xFEFC, "Dash Display 1: DD1"),
    (0xF004, "Electronic Engine Controller #1: EEC1"),
    (0xFEE5, "Engine Hours, Revolutions: HOURS"),
    (0xFEEC, "Vehicle Identification: VI"),
    (0xFDD1, "FMS-standard Interface Identity / Capabilities: FMS"),
    (0xFEC1, "High Resolution Vehicle Distance: VDHR"),
    (0xFE6C, "Tachograph : TCO1"),
    (0xFEEE, "Engine Temperature 1: ET1"),
    (0xFEF5, "Ambient Conditions: AMB"),
    (0xFE6B, "Driver's Identification: DI"),
    (0xFEF2, "Fuel Economy: LFE"),
    (0xFEAE, "Air Supply Pressure : AIR1"),
    (0xFD09, "High Resolution Fuel Consumption (Liquid): HRLFC"),
    (0xFE56, "Aftertreatment 1 Diesel Exhaust Fluid Tank 1 Information: AT1T1I"),
    (0xFD7D, "FMS Tell Tale Status: FMS1"),
    (0xF001, "Electronic Brake Controller 1: EBC1"),
    (0xFDC2, "Electronic Engine Controller 14: EEC14"),
    (0xFEAF, "Fuel Consumption (Gaseous): GFC"),
    (0xF000, "Electronic Retarder Controller 1: ERC1"),
    (0xFEF1, "Cruise Control/Vehicle Speed 1: CCVS1"),
    (0xF003, "Electronic Engine Controller #2: EEC2"),
    (0xFEEA, "Vehicle Weight: VW"),
    (0xFEC0, "Service Information: SERV"),
    (0xFDA4, "PTO Drive Engagement: PTODE"),
    (0xFE70, "Combination Vehicle Weight: CVW"),
    (0xFE4E, "Door Control 1: DC1"),
    (0xFDA5, "Door Control 2: DC2"),
    (0xFEE6, "Time / Date : TD"),
    (0xFED5, "Alternator Speed : AS"),
    (0xF005, "Electronic Transmission Controller 2 : ETC2"),
    (0xFE58, "Air Suspension Control 4 : ASC4"),
    (0xFCB7, "Vehicle Electrical Power #4 : VEP4"),
    (0xF009, "Vehicle Dynamic Stability Control 2 : VDC2"),
];

/// Read-only PGN name table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PgnRegistry {
    names: HashMap<Pgn, String>,
}

/// One line of a PGN census: how often a PGN occurs in a log and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PgnCount {
    pub pgn: Pgn,
    pub count: usize,
    pub name: Option<String>,
}

impl std::fmt::Display for PgnCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}: {}", self.pgn, name),
            None => write!(f, "{}", self.pgn),
        }
    }
}

impl PgnRegistry {
    /// The built-in reference table.
    pub fn standard() -> Self {
        let names: HashMap<Pgn, String> = STANDARD_NAMES
            .iter()
            .map(|&(pgn, name)| (Pgn(pgn), name.to_string()))
            .collect();
        Self { names }
    }

    /// Builds a table from a JSON object mapping 4-hex-digit keys to names,
    /// e.g. `{"FEF1": "Cruise Control/Vehicle Speed 1: CCVS1"}`. Keys are case-insensitive.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(text)?;
        let mut registry: PgnRegistry = PgnRegistry::default();
        for (key, name) in raw {
            let pgn: Pgn = Pgn::from_hex(&key).ok_or(ConfigError::PgnKey { key })?;
            registry.names.insert(pgn, name);
        }
        Ok(registry)
    }

    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        let text: String = fs::read_to_string(path).map_err(|source| ConfigError::OpenFile {
            path: path.to_string(),
            source,
        })?;
        PgnRegistry::from_json_str(&text)
    }

    /// Adds or replaces entries from `other`.
    pub fn extend(&mut self, other: PgnRegistry) {
        self.names.extend(other.names);
    }

    pub fn lookup_name(&self, pgn: Pgn) -> Option<&str> {
        self.names.get(&pgn).map(String::as_str)
    }

    /// Lookup by hexadecimal key (case-insensitive, optional `0x`).
    pub fn lookup_hex(&self, key: &str) -> Option<&str> {
        self.lookup_name(Pgn::from_hex(key)?)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries sorted by PGN.
    pub fn iter_sorted(&self) -> Vec<(Pgn, &str)> {
        let mut entries: Vec<(Pgn, &str)> = self
            .names
            .iter()
            .map(|(pgn, name)| (*pgn, name.as_str()))
            .collect();
        entries.sort_by_key(|(pgn, _)| *pgn);
        entries
    }

    /// Unique PGNs found in `frames`, ascending, with occurrence count and name.
    pub fn census<'a>(&self, frames: impl IntoIterator<Item = &'a Frame>) -> Vec<PgnCount> {
        let mut counts: BTreeMap<Pgn, usize> = BTreeMap::new();
        for frame in frames {
            *counts.entry(frame.pgn()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(pgn, count)| PgnCount {
                pgn,
                count,
                name: self.lookup_name(pgn).map(str::to_string),
            })
            .collect()
    }
}
