//! Creation and extraction of the 29-bit extended identifiers used by the
//! CyberGear private protocol.
//!
//! # Bit layout
//!
//! ```text
//! Bits 24-28 ( 5 bits) : Communication type
//! Bits  8-23 (16 bits) : Data area 2
//!                          commands : bits 8-15 host id (motion control: torque)
//!                          replies  : bits 8-15 motor id, 16-21 faults, 22-23 mode
//! Bits  0-7  ( 8 bits) : Target id (motor for commands, host for replies)
//! ```
use crate::error::EncodeError;

/// Highest logical CAN id accepted for hosts and motors.
pub const MAX_CAN_ID: u8 = 0x7F;

const COMMUNICATION_TYPE_SHIFT: u32 = 24;
const COMMUNICATION_TYPE_MASK: u32 = 0x1F;
const DATA_AREA_SHIFT: u32 = 8;
const DATA_AREA_MASK: u32 = 0xFFFF;
const SOURCE_SHIFT: u32 = 8;
const BYTE_MASK: u32 = 0xFF;
const FAULT_SHIFT: u32 = 16;
const FAULT_MASK: u32 = 0x3F;
const MODE_SHIFT: u32 = 22;
const MODE_MASK: u32 = 0x03;

//==================================================================================COMMUNICATION_TYPE
/// Command/response discriminator carried in bits 24-28.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommunicationType {
    /// Device id and 64-bit MCU identifier broadcast.
    FetchDeviceId = 0,
    /// Operation-control set-points (angle, speed, gains, torque).
    MotionControl = 1,
    /// Motor feedback.
    StatusReport = 2,
    EnableDevice = 3,
    /// Stop; payload byte 0 set to 1 also clears faults.
    DisableDevice = 4,
    /// Current position becomes mechanical zero (lost on power cycle).
    SetMechanicalZero = 6,
    /// Change the motor CAN id, effective immediately.
    SetCanId = 7,
    ReadSingleParameter = 17,
    /// Lost on power cycle.
    WriteSingleParameter = 18,
    ErrorReport = 21,
}

impl CommunicationType {
    /// Map a raw 5-bit value to a known communication type.
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::FetchDeviceId,
            1 => Self::MotionControl,
            2 => Self::StatusReport,
            3 => Self::EnableDevice,
            4 => Self::DisableDevice,
            6 => Self::SetMechanicalZero,
            7 => Self::SetCanId,
            17 => Self::ReadSingleParameter,
            18 => Self::WriteSingleParameter,
            21 => Self::ErrorReport,
            _ => return None,
        })
    }
}

impl From<CommunicationType> for u8 {
    fn from(value: CommunicationType) -> Self {
        value as u8
    }
}

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Extended CAN identifier (29 bits) with accessors for the CyberGear fields.
pub struct CanId(pub u32);

impl CanId {
    /// Creates a `CanIdBuilder` for the given communication type.
    pub fn builder(communication_type: impl Into<u8>) -> CanIdBuilder {
        CanIdBuilder::new(communication_type.into())
    }

    /// Identifier for a host-originated command: host id in bits 8-15,
    /// motor id in bits 0-7. Both are validated against [`MAX_CAN_ID`].
    pub fn command(
        communication_type: CommunicationType,
        host_id: u8,
        motor_id: u8,
    ) -> Result<Self, EncodeError> {
        Self::builder(communication_type)
            .from_host(host_id)
            .to_motor(motor_id)
            .build()
    }

    /// Raw 5-bit communication type.
    pub fn communication_type_raw(&self) -> u8 {
        ((self.0 >> COMMUNICATION_TYPE_SHIFT) & COMMUNICATION_TYPE_MASK) as u8
    }

    /// Known communication type, `None` for unassigned values.
    pub fn communication_type(&self) -> Option<CommunicationType> {
        CommunicationType::from_raw(self.communication_type_raw())
    }

    /// The 16 bits between the communication type and the target id.
    pub fn data_area(&self) -> u16 {
        ((self.0 >> DATA_AREA_SHIFT) & DATA_AREA_MASK) as u16
    }

    /// Bits 8-15: host id on commands, replying motor id on replies.
    pub fn source_id(&self) -> u8 {
        ((self.0 >> SOURCE_SHIFT) & BYTE_MASK) as u8
    }

    /// Bits 0-7: motor id on commands, host id on replies.
    pub fn target_id(&self) -> u8 {
        (self.0 & BYTE_MASK) as u8
    }

    /// Fault bits 16-21 of a status report.
    pub fn fault_bits(&self) -> u8 {
        ((self.0 >> FAULT_SHIFT) & FAULT_MASK) as u8
    }

    /// Mode bits 22-23 of a status report.
    pub fn mode_bits(&self) -> u8 {
        ((self.0 >> MODE_SHIFT) & MODE_MASK) as u8
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder that rejects out-of-range ids instead of masking them.
pub struct CanIdBuilder {
    pub communication_type: u8,
    pub data_area: u16,
    pub target_id: u8,
    host_id: Option<u8>,
}

impl CanIdBuilder {
    /// Initializes the builder for a communication type; every other field is zero.
    pub fn new(communication_type: u8) -> Self {
        Self {
            communication_type,
            data_area: 0,
            target_id: 0,
            host_id: None,
        }
    }

    /// Sets the requesting host id (bits 8-15), checked at build time.
    pub fn from_host(mut self, host_id: u8) -> Self {
        self.data_area = (self.data_area & 0xFF00) | host_id as u16;
        self.host_id = Some(host_id);
        self
    }

    /// Sets the addressed motor id (bits 0-7), checked at build time.
    pub fn to_motor(mut self, motor_id: u8) -> Self {
        self.target_id = motor_id;
        self
    }

    /// Overrides the whole 16-bit data area (motion-control torque, new CAN id).
    pub fn with_data_area(mut self, data_area: u16) -> Self {
        self.data_area = data_area;
        self
    }

    /// Builds the identifier.
    /// - communication type must fit 5 bits
    /// - target id, and host id when set, must be `<= MAX_CAN_ID`
    pub fn build(self) -> Result<CanId, EncodeError> {
        let host_id = self.host_id.unwrap_or(0);
        if self.target_id > MAX_CAN_ID || host_id > MAX_CAN_ID {
            return Err(EncodeError::IdOutOfRange {
                host_id,
                motor_id: self.target_id,
            });
        }
        if self.communication_type as u32 > COMMUNICATION_TYPE_MASK {
            return Err(EncodeError::IdentifierTooWide {
                id: (self.communication_type as u32) << COMMUNICATION_TYPE_SHIFT,
            });
        }

        let id = ((self.communication_type as u32) << COMMUNICATION_TYPE_SHIFT)
            | ((self.data_area as u32) << DATA_AREA_SHIFT)
            | self.target_id as u32;
        Ok(CanId(id))
    }
}
