//! Motor feedback (communication type 2).
//!
//! # Frame layout
//!
//! ```text
//! Identifier : bits 22-23 mode, 16-21 faults, 8-15 motor id, 0-7 host id
//! Byte 0-1   : angle, big-endian raw      [-4pi, 4pi] rad
//! Byte 2-3   : speed, big-endian raw      [-30, 30] rad/s
//! Byte 4-5   : torque, big-endian raw     [-12, 12] N.m
//! Byte 6-7   : temperature, big-endian    tenths of degC
//! ```
use crate::error::DecodeError;
use crate::infra::codec::scaling::{decode_linear, decode_temperature, Angle, FloatRange, Speed, Torque};
use crate::infra::codec::traits::FrameDecode;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CommunicationType;
use core::fmt;
use embedded_can::Frame;

//==================================================================================FAULTS
/// Fault bits 16-21 of the feedback identifier, shifted down to bits 0-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultFlags(u8);

impl FaultFlags {
    pub const UNDERVOLTAGE: u8 = 1 << 0;
    pub const OVERCURRENT: u8 = 1 << 1;
    pub const OVERTEMPERATURE: u8 = 1 << 2;
    pub const MAGNETIC_ENCODER: u8 = 1 << 3;
    /// Hall-encoder fault, reported as "HALL-coded" by the firmware.
    pub const HALL_ENCODER: u8 = 1 << 4;
    pub const NOT_CALIBRATED: u8 = 1 << 5;

    const MASK: u8 = 0x3F;

    /// Keep the six defined bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn undervoltage(self) -> bool {
        self.contains(Self::UNDERVOLTAGE)
    }

    pub const fn overcurrent(self) -> bool {
        self.contains(Self::OVERCURRENT)
    }

    pub const fn overtemperature(self) -> bool {
        self.contains(Self::OVERTEMPERATURE)
    }

    pub const fn magnetic_encoder(self) -> bool {
        self.contains(Self::MAGNETIC_ENCODER)
    }

    pub const fn hall_encoder(self) -> bool {
        self.contains(Self::HALL_ENCODER)
    }

    pub const fn not_calibrated(self) -> bool {
        self.contains(Self::NOT_CALIBRATED)
    }
}

impl fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names = [
            (Self::NOT_CALIBRATED, "not-calibrated"),
            (Self::HALL_ENCODER, "hall-encoder"),
            (Self::MAGNETIC_ENCODER, "magnetic-encoder"),
            (Self::OVERTEMPERATURE, "overtemperature"),
            (Self::OVERCURRENT, "overcurrent"),
            (Self::UNDERVOLTAGE, "undervoltage"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

//==================================================================================MODE
/// Motor state machine, bits 22-23 of the feedback identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MotorMode {
    Reset = 0,
    Calibration = 1,
    Run = 2,
}

impl MotorMode {
    pub fn from_raw(raw: u8) -> Result<Self, DecodeError> {
        match raw {
            0 => Ok(MotorMode::Reset),
            1 => Ok(MotorMode::Calibration),
            2 => Ok(MotorMode::Run),
            other => Err(DecodeError::UnknownMotorMode(other)),
        }
    }
}

//==================================================================================FEEDBACK
/// Decoded status report of one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorFeedback {
    pub host_id: u8,
    pub motor_id: u8,
    /// rad
    pub current_angle: f32,
    /// rad/s
    pub current_speed: f32,
    /// N.m
    pub current_torque: f32,
    /// degC
    pub current_temperature: f32,
    pub faults: FaultFlags,
    pub mode: MotorMode,
}

impl MotorFeedback {
    /// `true` when any fault bit is raised.
    pub fn has_fault(&self) -> bool {
        !self.faults.is_empty()
    }
}

fn be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

impl FrameDecode for MotorFeedback {
    const COMMUNICATION_TYPE: u8 = CommunicationType::StatusReport as u8;

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

        // Everything is computed before the value is built: no partial results.
        let mode = MotorMode::from_raw(id.mode_bits())?;
        let current_angle = decode_linear(be_u16(data, 0), Angle::MIN, Angle::range())?;
        let current_speed = decode_linear(be_u16(data, 2), Speed::MIN, Speed::range())?;
        let current_torque = decode_linear(be_u16(data, 4), Torque::MIN, Torque::range())?;

        Ok(Self {
            host_id: id.target_id(),
            motor_id: id.source_id(),
            current_angle,
            current_speed,
            current_torque,
            current_temperature: decode_temperature(be_u16(data, 6)),
            faults: FaultFlags::from_bits(id.fault_bits()),
            mode,
        })
    }
}

impl fmt::Display for MotorFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "motor {:02X} -> host {:02X}: angle {:.3} rad, speed {:.3} rad/s, torque {:.3} N.m, {:.1} degC, mode {:?}, faults {}",
            self.motor_id,
            self.host_id,
            self.current_angle,
            self.current_speed,
            self.current_torque,
            self.current_temperature,
            self.mode,
            self.faults
        )
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
