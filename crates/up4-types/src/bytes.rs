//! Immutable byte sequences used as P4 match field and action parameter values.

use crate::Ipv4Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised when converting a [`ByteSequence`] to or from a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ByteSequenceError {
    #[error("byte sequence {value} does not fit in {width} byte(s)")]
    DoesNotFit { value: String, width: usize },

    #[error("invalid byte sequence format: {0}")]
    InvalidFormat(String),
}

/// A big-endian byte string.
///
/// P4Runtime byte strings may arrive in canonical form (leading zero bytes
/// stripped) or padded beyond the field width, so the integer readers only
/// care about the significant bytes.
///
/// # Examples
///
/// ```
/// use up4_types::ByteSequence;
///
/// let teid = ByteSequence::from_u32(0x1234);
/// assert_eq!(teid.as_bytes(), &[0x00, 0x00, 0x12, 0x34]);
/// assert_eq!(teid.to_string(), "0x00001234");
///
/// // The canonical (stripped) form reads back the same value.
/// let canonical = ByteSequence::copy_from(&[0x12, 0x34]);
/// assert_eq!(canonical.to_u32().unwrap(), 0x1234);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ByteSequence(Vec<u8>);

impl ByteSequence {
    /// Creates a sequence by copying the given bytes.
    pub fn copy_from(bytes: &[u8]) -> Self {
        ByteSequence(bytes.to_vec())
    }

    pub fn from_u8(value: u8) -> Self {
        ByteSequence(vec![value])
    }

    pub fn from_u16(value: u16) -> Self {
        ByteSequence(value.to_be_bytes().to_vec())
    }

    pub fn from_u32(value: u32) -> Self {
        ByteSequence(value.to_be_bytes().to_vec())
    }

    pub fn from_ipv4(addr: &Ipv4Address) -> Self {
        ByteSequence(addr.octets().to_vec())
    }

    /// Creates a sequence of `len` bytes with every bit set (an exact-match mask).
    pub fn ones(len: usize) -> Self {
        ByteSequence(vec![0xff; len])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bytes left after stripping leading zeros.
    fn significant(&self) -> &[u8] {
        let first = self
            .0
            .iter()
            .position(|b| *b != 0)
            .unwrap_or(self.0.len());
        &self.0[first..]
    }

    /// Reads the value as an unsigned integer of `width` bytes.
    fn to_uint(&self, width: usize) -> Result<u64, ByteSequenceError> {
        let significant = self.significant();
        if significant.len() > width {
            return Err(ByteSequenceError::DoesNotFit {
                value: self.to_string(),
                width,
            });
        }
        Ok(significant
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn to_u8(&self) -> Result<u8, ByteSequenceError> {
        // Width checked by to_uint.
        self.to_uint(1).map(|v| v as u8)
    }

    pub fn to_u16(&self) -> Result<u16, ByteSequenceError> {
        self.to_uint(2).map(|v| v as u16)
    }

    pub fn to_u32(&self) -> Result<u32, ByteSequenceError> {
        self.to_uint(4).map(|v| v as u32)
    }

    pub fn to_ipv4(&self) -> Result<Ipv4Address, ByteSequenceError> {
        self.to_u32().map(Ipv4Address::from_u32)
    }
}

impl fmt::Display for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl FromStr for ByteSequence {
    type Err = ByteSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| ByteSequenceError::InvalidFormat(s.to_string()))?;
        if hex.len() % 2 != 0 {
            return Err(ByteSequenceError::InvalidFormat(s.to_string()));
        }

        (0..hex.len())
            .step_by(2)
            .map(|i| {
                hex.get(i..i + 2)
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| ByteSequenceError::InvalidFormat(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(ByteSequence)
    }
}

impl TryFrom<String> for ByteSequence {
    type Error = ByteSequenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ByteSequence> for String {
    fn from(bytes: ByteSequence) -> Self {
        bytes.to_string()
    }
}

impl From<Vec<u8>> for ByteSequence {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSequence(bytes)
    }
}
