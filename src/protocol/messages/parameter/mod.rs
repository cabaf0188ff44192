//! Single-parameter access (communication types 17 and 18): the registry of
//! read/write motor parameters, run modes, and the decoded read reply.
//!
//! # Payload layout
//!
//! ```text
//! Byte 0-1 : parameter index, little-endian (0x7005 -> "0570")
//! Byte 2-3 : zero
//! Byte 4-7 : value, little-endian (f32 bit pattern or zero-extended integer)
//! ```
use crate::core::ParameterValue;
use crate::error::DecodeError;
use crate::infra::codec::traits::FrameDecode;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CommunicationType;
use core::fmt;
use embedded_can::Frame;

//==================================================================================REGISTRY
/// Encoding of a parameter's four value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterKind {
    F32,
    U8,
    I16,
}

impl ParameterKind {
    /// Interpret the raw little-endian value bytes.
    pub fn interpret(self, bytes: [u8; 4]) -> ParameterValue {
        match self {
            ParameterKind::F32 => ParameterValue::F32(f32::from_le_bytes(bytes)),
            ParameterKind::U8 => ParameterValue::U8(bytes[0]),
            ParameterKind::I16 => ParameterValue::I16(i16::from_le_bytes([bytes[0], bytes[1]])),
        }
    }
}

/// 16-bit key of a motor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterIndex(pub u16);

impl ParameterIndex {
    /// Run mode, see [`RunMode`].
    pub const RUN_MODE: Self = Self(0x7005);
    /// Current-mode Iq command, -23..23 A.
    pub const IQ_REF: Self = Self(0x7006);
    /// Speed-mode command, -30..30 rad/s. Callers must check the range.
    pub const SPD_REF: Self = Self(0x700A);
    /// Torque limit, 0..12 N.m.
    pub const LIMIT_TORQUE: Self = Self(0x700B);
    /// Current loop Kp (default 0.125).
    pub const CUR_KP: Self = Self(0x7010);
    /// Current loop Ki (default 0.0158).
    pub const CUR_KI: Self = Self(0x7011);
    /// Current filter coefficient, 0..1 (default 0.1).
    pub const CUR_FILT_GAIN: Self = Self(0x7014);
    /// Position-mode angle command, rad.
    pub const LOC_REF: Self = Self(0x7016);
    /// Position-mode speed limit, 0..30 rad/s.
    pub const LIMIT_SPD: Self = Self(0x7017);
    /// Speed/position-mode current limit, 0..23 A.
    pub const LIMIT_CUR: Self = Self(0x7018);
    /// Load-side mechanical angle, rad. Read only.
    pub const MECH_POS: Self = Self(0x7019);
    /// Filtered Iq, A. Read only.
    pub const IQF: Self = Self(0x701A);
    /// Load-side speed, rad/s. Read only.
    pub const MECH_VEL: Self = Self(0x701B);
    /// Bus voltage, V. Read only.
    pub const VBUS: Self = Self(0x701C);
    /// Number of turns.
    pub const ROTATION: Self = Self(0x701D);
    /// Position loop Kp (default 30).
    pub const LOC_KP: Self = Self(0x701E);
    /// Speed loop Kp (default 1).
    pub const SPD_KP: Self = Self(0x701F);
    /// Speed loop Ki (default 0.002).
    pub const SPD_KI: Self = Self(0x7020);

    /// Value encoding for known parameters.
    pub fn kind(self) -> Option<ParameterKind> {
        match self.0 {
            0x7005 => Some(ParameterKind::U8),
            0x701D => Some(ParameterKind::I16),
            0x7006 | 0x700A | 0x700B | 0x7010 | 0x7011 | 0x7014 | 0x7016..=0x701C
            | 0x701E..=0x7020 => Some(ParameterKind::F32),
            _ => None,
        }
    }

    /// `false` for the telemetry entries the firmware refuses to write.
    pub fn is_writable(self) -> bool {
        self.kind().is_some() && !matches!(self.0, 0x7019..=0x701C)
    }

    /// Payload with the index in bytes 0-1 and `value` in bytes 4-7.
    pub fn payload(self, value: [u8; 4]) -> [u8; 8] {
        let [low, high] = self.0.to_le_bytes();
        [low, high, 0, 0, value[0], value[1], value[2], value[3]]
    }
}

impl From<u16> for ParameterIndex {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// Motor operating mode written to [`ParameterIndex::RUN_MODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RunMode {
    /// Motion-control frames (communication type 1).
    OperationControl = 0,
    Position = 1,
    Speed = 2,
    Current = 3,
}

impl RunMode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(RunMode::OperationControl),
            1 => Some(RunMode::Position),
            2 => Some(RunMode::Speed),
            3 => Some(RunMode::Current),
            _ => None,
        }
    }
}

//==================================================================================PARAMETER_FRAME
/// Reply to a single-parameter read.
///
/// The value bytes are kept raw; their meaning depends on the parameter, see
/// [`ParameterFrame::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterFrame {
    pub host_id: u8,
    pub motor_id: u8,
    pub parameter_index: ParameterIndex,
    pub value_bytes: [u8; 4],
}

impl ParameterFrame {
    pub fn as_f32(&self) -> f32 {
        f32::from_le_bytes(self.value_bytes)
    }

    pub fn as_u32(&self) -> u32 {
        u32::from_le_bytes(self.value_bytes)
    }

    pub fn as_u16(&self) -> u16 {
        u16::from_le_bytes([self.value_bytes[0], self.value_bytes[1]])
    }

    pub fn as_i16(&self) -> i16 {
        i16::from_le_bytes([self.value_bytes[0], self.value_bytes[1]])
    }

    pub fn as_u8(&self) -> u8 {
        self.value_bytes[0]
    }

    /// Typed value for parameters listed in [`ParameterIndex`], `None` otherwise.
    pub fn value(&self) -> Option<ParameterValue> {
        self.parameter_index
            .kind()
            .map(|kind| kind.interpret(self.value_bytes))
    }
}

impl FrameDecode for ParameterFrame {
    const COMMUNICATION_TYPE: u8 = CommunicationType::ReadSingleParameter as u8;

    fn from_frame(frame: &CanFrame) -> Result<Self, DecodeError> {
        let id = frame.cybergear_id().ok_or(DecodeError::MalformedFrame)?;
        if id.communication_type_raw() != Self::COMMUNICATION_TYPE {
            return Err(DecodeError::UnknownCommunicationType(
                id.communication_type_raw(),
            ));
        }
        let data = frame.data();
        if frame.is_remote_frame() || data.len() != 8 {
            return Err(DecodeError::MalformedFrame);
        }

        Ok(Self {
            host_id: id.target_id(),
            motor_id: id.source_id(),
            parameter_index: ParameterIndex(u16::from_le_bytes([data[0], data[1]])),
            value_bytes: [data[4], data[5], data[6], data[7]],
        })
    }
}

impl fmt::Display for ParameterFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter {:04X} (host {:02X}, motor {:02X}): {:02X?}",
            self.parameter_index.0, self.host_id, self.motor_id, self.value_bytes
        )
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
