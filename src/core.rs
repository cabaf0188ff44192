//! Value types shared by the codec layers: the fixed-capacity ASCII buffer
//! that carries one SLCAN line, and the typed parameter values exchanged by
//! the read/write-parameter commands.

/// Longest SLCAN data line: marker + 8 identifier digits + DLC + 16 payload digits.
pub const MAX_SLCAN_LINE: usize = 26;

/// One SLCAN line (without terminator), stored inline to stay allocation free.
///
/// Only the encoders in this crate fill the buffer, and they write ASCII
/// exclusively, so the contents are always valid text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlcanBytes {
    pub(crate) len: usize,
    pub(crate) data: [u8; MAX_SLCAN_LINE],
}

impl Default for SlcanBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl SlcanBytes {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_SLCAN_LINE],
        }
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The line as text.
    pub fn as_str(&self) -> &str {
        // ASCII by construction; the empty fallback is unreachable.
        core::str::from_utf8(self.as_slice()).unwrap_or_default()
    }
}

impl AsRef<[u8]> for SlcanBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Value carried in bytes 4-7 of a parameter read/write payload.
///
/// The firmware stores every value little-endian; narrower integers are
/// zero-extended (or sign-extended for `I16`) to the full four bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterValue {
    F32(f32),
    U32(u32),
    U16(u16),
    U8(u8),
    I16(i16),
}

impl ParameterValue {
    /// Wire representation of the value.
    pub fn to_le_bytes(self) -> [u8; 4] {
        match self {
            ParameterValue::F32(v) => v.to_le_bytes(),
            ParameterValue::U32(v) => v.to_le_bytes(),
            ParameterValue::U16(v) => (v as u32).to_le_bytes(),
            ParameterValue::U8(v) => (v as u32).to_le_bytes(),
            ParameterValue::I16(v) => (v as i32).to_le_bytes(),
        }
    }

    /// `false` only for NaN or infinite floats.
    pub fn is_finite(self) -> bool {
        match self {
            ParameterValue::F32(v) => v.is_finite(),
            _ => true,
        }
    }
}
