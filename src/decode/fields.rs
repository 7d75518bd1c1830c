use crate::types::{config::SentinelPolicy, value::SignalValue};

/// Raw little-endian fields of an 8-byte payload.
///
/// Every accessor returns the raw field together with its width mask, so the sentinel check
/// ("all bits set") is done in one place by [`scaled`].
#[derive(Copy, Clone, Debug)]
pub(crate) struct Payload<'a>(pub(crate) &'a [u8; 8]);

impl Payload<'_> {
    #[inline]
    pub(crate) fn u8(&self, index: usize) -> (u64, u64) {
        (self.0[index] as u64, 0xFF)
    }

    #[inline]
    pub(crate) fn u16_le(&self, index: usize) -> (u64, u64) {
        let raw: u16 = u16::from_le_bytes([self.0[index], self.0[index + 1]]);
        (raw as u64, 0xFFFF)
    }

    /// Byte `index` is the high byte.
    #[inline]
    pub(crate) fn u16_be(&self, index: usize) -> (u64, u64) {
        let raw: u16 = u16::from_be_bytes([self.0[index], self.0[index + 1]]);
        (raw as u64, 0xFFFF)
    }

    #[inline]
    pub(crate) fn u32_le(&self, index: usize) -> (u64, u64) {
        let raw: u32 = u32::from_le_bytes([
            self.0[index],
            self.0[index + 1],
            self.0[index + 2],
            self.0[index + 3],
        ]);
        (raw as u64, 0xFFFF_FFFF)
    }

    #[inline]
    pub(crate) fn u64_le(&self) -> (u64, u64) {
        (u64::from_le_bytes(*self.0), u64::MAX)
    }

    /// `(byte >> shift) & mask`, for enumerated state fields.
    #[inline]
    pub(crate) fn bits(&self, index: usize, shift: u8, mask: u8) -> u8 {
        (self.0[index] >> shift) & mask
    }

    #[inline]
    pub(crate) fn bit(&self, index: usize, bit: u8) -> bool {
        self.0[index] & (1 << bit) != 0
    }
}

/// Applies `convert` to a raw field unless the policy treats its all-ones pattern as
/// "not available".
#[inline]
pub(crate) fn scaled(
    (raw, mask): (u64, u64),
    policy: SentinelPolicy,
    convert: impl FnOnce(f64) -> f64,
) -> SignalValue {
    if policy == SentinelPolicy::Absent && raw == mask {
        return SignalValue::NotAvailable;
    }
    SignalValue::Number(convert(raw as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn little_endian_fields() {
        let p = Payload(&BYTES);
        assert_eq!(p.u8(7), (0x08, 0xFF));
        assert_eq!(p.u16_le(0), (0x0201, 0xFFFF));
        assert_eq!(p.u16_be(1), (0x0203, 0xFFFF));
        assert_eq!(p.u32_le(4), (0x0807_0605, 0xFFFF_FFFF));
        assert_eq!(p.u64_le().0, 0x0807_0605_0403_0201);
    }

    #[test]
    fn bit_fields() {
        let p = Payload(&[0b1101_0010, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(p.bits(0, 0, 0x03), 0b10);
        assert_eq!(p.bits(0, 6, 0x03), 0b11);
        assert!(p.bit(0, 4));
        assert!(!p.bit(0, 0));
    }

    #[test]
    fn sentinel_depends_on_policy() {
        assert_eq!(scaled((0xFF, 0xFF), SentinelPolicy::Absent, |v| v), SignalValue::NotAvailable);
        assert_eq!(
            scaled((0xFF, 0xFF), SentinelPolicy::Literal, |v| v * 0.4),
            SignalValue::Number(0xFF as f64 * 0.4)
        );
        assert_eq!(scaled((0xFE, 0xFF), SentinelPolicy::Absent, |v| v), SignalValue::Number(254.0));
    }
}
