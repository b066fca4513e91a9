//! Binary save-state stream.
//!
//! Components write their state field by field in a fixed order and read it
//! back in the same order. Integers are little-endian. Booleans use two
//! distinct non-zero patterns so that a stream read out of step is caught
//! early instead of silently loading garbage.
//!
//! This is an internal format: it is versioned by whoever writes the
//! header, and not meant to be portable between implementations.

use thiserror::Error;

const TRUE_PATTERN: u8 = 0xFE;
const FALSE_PATTERN: u8 = 0x01;

/// Failure while reading a state stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state stream truncated at offset {offset}: needed {needed} bytes, {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("invalid boolean byte {value:#04X} at offset {offset}")]
    InvalidBool { offset: usize, value: u8 },
    #[error("invalid {field} value {value} in state stream")]
    InvalidValue { field: &'static str, value: u64 },
    #[error("not a save-state (bad magic)")]
    BadMagic,
    #[error("unsupported save-state version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("save-state was made with a different cartridge (md5 {found})")]
    CartridgeMismatch { found: String },
    #[error("{0} unread bytes after end of state")]
    TrailingBytes(usize),
}

impl StateError {
    /// Shorthand for [`StateError::InvalidValue`].
    #[must_use]
    pub fn invalid(field: &'static str, value: impl Into<u64>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

/// Sequential byte stream used for both saving and loading.
///
/// A fresh serializer is empty and accumulates `put_*` calls. One built with
/// [`Serializer::from_bytes`] is read back with the `get_*` calls, each of
/// which fails with [`StateError::Truncated`] instead of reading past the
/// end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Serializer {
    data: Vec<u8>,
    pos: usize,
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing stream for reading.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total stream length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check that every byte was consumed.
    pub fn finish(&self) -> Result<(), StateError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(StateError::TrailingBytes(n)),
        }
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    pub fn put_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.data
            .push(if value { TRUE_PATTERN } else { FALSE_PATTERN });
    }

    /// Raw bytes with no length prefix; the reader must know the size.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Length-prefixed UTF-8 string.
    pub fn put_str(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.data.extend_from_slice(value.as_bytes());
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    fn take(&mut self, needed: usize) -> Result<&[u8], StateError> {
        if self.remaining() < needed {
            return Err(StateError::Truncated {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += needed;
        Ok(&self.data[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], StateError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8, StateError> {
        Ok(self.take(1)?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16, StateError> {
        self.take_array().map(u16::from_le_bytes)
    }

    pub fn get_u32(&mut self) -> Result<u32, StateError> {
        self.take_array().map(u32::from_le_bytes)
    }

    pub fn get_u64(&mut self) -> Result<u64, StateError> {
        self.take_array().map(u64::from_le_bytes)
    }

    pub fn get_bool(&mut self) -> Result<bool, StateError> {
        let offset = self.pos;
        match self.get_u8()? {
            TRUE_PATTERN => Ok(true),
            FALSE_PATTERN => Ok(false),
            value => Err(StateError::InvalidBool { offset, value }),
        }
    }

    /// Fill `out` with the next `out.len()` bytes.
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<(), StateError> {
        let src = self.take(out.len())?;
        out.copy_from_slice(src);
        Ok(())
    }

    pub fn get_string(&mut self) -> Result<String, StateError> {
        let len = self.get_u32()? as usize;
        let bytes = self.take(len)?.to_vec();
        String::from_utf8(bytes).map_err(|_| StateError::invalid("string", len as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fields_read_back_in_order() {
        let mut s = Serializer::new();
        s.put_u8(0x12);
        s.put_u16(0x3456);
        s.put_u32(0x789A_BCDE);
        s.put_u64(u64::MAX - 1);
        s.put_bool(true);
        s.put_bool(false);
        s.put_str("F8SC");
        s.put_bytes(&[1, 2, 3]);

        let mut r = Serializer::from_bytes(s.into_bytes());
        assert_eq!(r.get_u8(), Ok(0x12));
        assert_eq!(r.get_u16(), Ok(0x3456));
        assert_eq!(r.get_u32(), Ok(0x789A_BCDE));
        assert_eq!(r.get_u64(), Ok(u64::MAX - 1));
        assert_eq!(r.get_bool(), Ok(true));
        assert_eq!(r.get_bool(), Ok(false));
        assert_eq!(r.get_string().as_deref(), Ok("F8SC"));
        let mut raw = [0u8; 3];
        r.get_bytes(&mut raw).expect("three raw bytes");
        assert_eq!(raw, [1, 2, 3]);
        assert_eq!(r.finish(), Ok(()));
    }

    #[test]
    fn short_read_reports_truncation() {
        let mut r = Serializer::from_bytes(vec![0xAA]);
        assert_eq!(
            r.get_u16(),
            Err(StateError::Truncated {
                offset: 0,
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn zero_is_not_a_valid_bool() {
        let mut r = Serializer::from_bytes(vec![0x00]);
        assert_eq!(
            r.get_bool(),
            Err(StateError::InvalidBool {
                offset: 0,
                value: 0
            })
        );
    }

    #[test]
    fn leftover_bytes_fail_finish() {
        let mut r = Serializer::from_bytes(vec![1, 2, 3]);
        let _ = r.get_u8();
        assert_eq!(r.finish(), Err(StateError::TrailingBytes(2)));
    }

    proptest! {
        #[test]
        fn any_prefix_of_a_stream_fails_cleanly(
            values in prop::collection::vec(any::<u32>(), 1..16),
            cut in 0usize..64,
        ) {
            let mut s = Serializer::new();
            for &v in &values {
                s.put_u32(v);
            }
            let bytes = s.into_bytes();
            let cut = cut.min(bytes.len() - 1);
            let mut r = Serializer::from_bytes(bytes[..cut].to_vec());
            let mut result = Ok(0);
            for _ in &values {
                result = r.get_u32();
                if result.is_err() {
                    break;
                }
            }
            let is_truncated = matches!(result, Err(StateError::Truncated { .. }));
            prop_assert!(is_truncated);
        }

        #[test]
        fn u64_values_survive(v in any::<u64>(), flag in any::<bool>()) {
            let mut s = Serializer::new();
            s.put_u64(v);
            s.put_bool(flag);
            let mut r = Serializer::from_bytes(s.into_bytes());
            prop_assert_eq!(r.get_u64(), Ok(v));
            prop_assert_eq!(r.get_bool(), Ok(flag));
        }
    }
}
