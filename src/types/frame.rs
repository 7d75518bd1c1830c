use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::errors::FrameError;

/// Parameter Group Number, the J1939 name of a message's payload category.
///
/// Compared as a plain unsigned 16-bit value. The canonical textual form is
/// 4 uppercase hex digits (e.g. `"FEF1"`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pgn(pub u16);

impl Pgn {
    /// Parses `"FEF1"`, `"fef1"`, `"0xFEF1"` and surrounding whitespace.
    pub fn from_hex(text: &str) -> Option<Pgn> {
        let t: &str = text.trim();
        let t: &str = t
            .strip_prefix("0x")
            .or_else(|| t.strip_prefix("0X"))
            .unwrap_or(t);
        if t.is_empty() || t.len() > 4 {
            return None;
        }
        u16::from_str_radix(t, 16).ok().map(Pgn)
    }

    /// Canonical key, 4 uppercase hex digits.
    pub fn to_hex(self) -> String {
        format!("{:04X}", self.0)
    }
}

impl std::fmt::Display for Pgn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// Highest identifier representable on a CAN bus (29-bit extended format).
pub const MAX_IDENTIFIER: u32 = 0x1FFF_FFFF;

/// Single-packet J1939 frame as delivered by a log reader.
///
/// A frame is built once from an already tokenized record and never mutated afterwards;
/// all fields are private and exposed through accessors.
///
/// # Invariants
/// * `data` is always exactly 8 bytes.
/// * `priority` is in `0..=7`.
///
/// # Examples
/// ```rust
/// # use j1939_tools::Frame;
/// let frame = Frame::from_identifier(1637164800.5, 0x18FE_6C00, &[0, 0, 0, 0, 0, 0, 0x20, 0x50]).unwrap();
/// assert_eq!(frame.priority(), 6);
/// assert_eq!(frame.pgn().0, 0xFE6C);
/// assert_eq!(frame.source_address(), 0x00);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    timestamp: f64,
    priority: u8,
    pgn: Pgn,
    source_address: u8,
    data: [u8; 8],
}

impl Frame {
    /// Builds a frame from already decomposed header fields.
    ///
    /// # Errors
    /// - [`FrameError::Timestamp`] if `timestamp` is NaN or infinite.
    /// - [`FrameError::DataLength`] if `data` is not exactly 8 bytes.
    /// - [`FrameError::Priority`] if `priority > 7`.
    pub fn new(
        timestamp: f64,
        priority: u8,
        pgn: Pgn,
        source_address: u8,
        data: &[u8],
    ) -> Result<Frame, FrameError> {
        if !timestamp.is_finite() {
            return Err(FrameError::Timestamp {
                token: timestamp.to_string(),
            });
        }
        if priority > 7 {
            return Err(FrameError::Priority { priority });
        }
        let data: [u8; 8] = data
            .try_into()
            .map_err(|_| FrameError::DataLength { found: data.len() })?;

        Ok(Frame {
            timestamp,
            priority,
            pgn,
            source_address,
            data,
        })
    }

    /// Builds a frame from a raw CAN identifier, split as
    /// `priority (3 bits) | reserved/data page | PGN (16 bits) | source (8 bits)`.
    ///
    /// # Errors
    /// - [`FrameError::Identifier`] if `identifier` does not fit in 29 bits.
    /// - [`FrameError::DataLength`] if `data` is not exactly 8 bytes.
    pub fn from_identifier(timestamp: f64, identifier: u32, data: &[u8]) -> Result<Frame, FrameError> {
        if identifier > MAX_IDENTIFIER {
            return Err(FrameError::Identifier {
                token: format!("{:X}", identifier),
            });
        }
        let priority: u8 = ((identifier >> 26) & 0x07) as u8;
        let pgn: Pgn = Pgn(((identifier >> 8) & 0xFFFF) as u16);
        let source_address: u8 = (identifier & 0xFF) as u8;
        Frame::new(timestamp, priority, pgn, source_address, data)
    }

    /// Unix timestamp in seconds (fractional).
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn pgn(&self) -> Pgn {
        self.pgn
    }

    pub fn source_address(&self) -> u8 {
        self.source_address
    }

    pub fn data(&self) -> &[u8; 8] {
        &self.data
    }

    /// Rebuilds the 29-bit identifier (data page bits are not tracked and read as zero).
    pub fn identifier(&self) -> u32 {
        ((self.priority as u32) << 26) | ((self.pgn.0 as u32) << 8) | self.source_address as u32
    }

    /// Timestamp as UTC date-time; `None` when out of chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        datetime_from_unix(self.timestamp)
    }

    /// Payload as hex pairs separated by spaces (e.g. `"3E 42 03 00 39 00 03 01"`).
    pub fn data_hex(&self) -> String {
        self.data
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6} {:08X} pgn:{} sa:{:02X} {}",
            self.timestamp,
            self.identifier(),
            self.pgn,
            self.source_address,
            self.data_hex()
        )
    }
}

/// Converts fractional unix seconds into a UTC date-time (millisecond resolution).
pub(crate) fn datetime_from_unix(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: [u8; 8] = [0x3E, 0x42, 0x03, 0x00, 0x39, 0x00, 0x03, 0x01];

    #[test]
    fn splits_extended_identifier() {
        let frame = Frame::from_identifier(10.0, 0x18FE_F100, &PAYLOAD).unwrap();
        assert_eq!(frame.priority(), 6);
        assert_eq!(frame.pgn(), Pgn(0xFEF1));
        assert_eq!(frame.source_address(), 0x00);
        assert_eq!(frame.identifier(), 0x18FE_F100);
        assert_eq!(frame.data(), &PAYLOAD);
    }

    #[test]
    fn splits_identifier_with_source_address() {
        let frame = Frame::from_identifier(0.0, 0x0CF0_0417, &PAYLOAD).unwrap();
        assert_eq!(frame.priority(), 3);
        assert_eq!(frame.pgn(), Pgn(0xF004));
        assert_eq!(frame.source_address(), 0x17);
    }

    #[test]
    fn rejects_short_payload() {
        let err = Frame::from_identifier(0.0, 0x18FE_F100, &PAYLOAD[..7]).unwrap_err();
        assert!(matches!(err, FrameError::DataLength { found: 7 }));
    }

    #[test]
    fn rejects_non_finite_timestamp() {
        for ts in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Frame::new(ts, 6, Pgn(0xFEF1), 0, &PAYLOAD).unwrap_err();
            assert!(matches!(err, FrameError::Timestamp { .. }));
        }
        assert!(Frame::from_identifier(f64::NAN, 0x18FE_F100, &PAYLOAD).is_err());
    }

    #[test]
    fn rejects_long_payload() {
        let long = [0u8; 12];
        let err = Frame::new(0.0, 6, Pgn(0xFEF1), 0, &long).unwrap_err();
        assert!(matches!(err, FrameError::DataLength { found: 12 }));
    }

    #[test]
    fn rejects_identifier_wider_than_29_bits() {
        let err = Frame::from_identifier(0.0, 0x2000_0000, &PAYLOAD).unwrap_err();
        assert!(matches!(err, FrameError::Identifier { .. }));
    }

    #[test]
    fn rejects_priority_out_of_range() {
        let err = Frame::new(0.0, 8, Pgn(0xFEF1), 0, &PAYLOAD).unwrap_err();
        assert!(matches!(err, FrameError::Priority { priority: 8 }));
    }

    #[test]
    fn pgn_hex_is_case_insensitive() {
        assert_eq!(Pgn::from_hex("fef1"), Some(Pgn(0xFEF1)));
        assert_eq!(Pgn::from_hex(" 0xFEF1 "), Some(Pgn(0xFEF1)));
        assert_eq!(Pgn::from_hex("F004"), Some(Pgn(0xF004)));
        assert_eq!(Pgn::from_hex("12345"), None);
        assert_eq!(Pgn::from_hex("zz"), None);
        assert_eq!(Pgn(0xF004).to_hex(), "F004");
        assert_eq!(Pgn(0x00EA).to_string(), "00EA");
    }

    #[test]
    fn datetime_and_hex_helpers() {
        let frame = Frame::from_identifier(1637164800.5, 0x18FE_F100, &PAYLOAD).unwrap();
        let dt = frame.datetime().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2021-11-17 16:00:00.500");
        assert_eq!(frame.data_hex(), "3E 42 03 00 39 00 03 01");
    }
}
