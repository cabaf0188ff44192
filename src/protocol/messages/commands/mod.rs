//! Host-to-motor commands.
//!
//! Each command is a small value implementing [`FrameEncode`]; the free
//! `encode_*` functions build the command and render it as one SLCAN line
//! (no terminator) in a single call.
//!
//! | Command                  | Type | Data area (bits 8-23) | Payload                    |
//! |--------------------------|------|-----------------------|----------------------------|
//! | [`MotionControl`]        | 1    | torque raw            | angle, speed, Kp, Kd (BE)  |
//! | [`Enable`]               | 3    | host id               | none                       |
//! | [`Disable`]              | 4    | host id               | none, or byte 0 = 1        |
//! | [`SetMechanicalZero`]    | 6    | host id               | byte 0 = 1                 |
//! | [`SetCanId`]             | 7    | new id, host id       | none                       |
//! | [`ReadParameter`]        | 17   | host id               | index (LE)                 |
//! | [`WriteParameter`]       | 18   | host id               | index (LE), value (LE)     |
use crate::core::{ParameterValue, SlcanBytes};
use crate::error::EncodeError;
use crate::infra::codec::scaling::{Angle, FloatRange, Kd, Kp, RangedValue, Speed, Torque};
use crate::infra::codec::traits::FrameEncode;
use crate::protocol::messages::parameter::{ParameterIndex, RunMode};
use crate::protocol::transport::can_frame::{CanFrame, MAX_DLC};
use crate::protocol::transport::can_id::{CanId, CommunicationType, MAX_CAN_ID};

fn frame(id: CanId, payload: &[u8]) -> Result<CanFrame, EncodeError> {
    CanFrame::extended(id, payload).ok_or(EncodeError::IdentifierTooWide { id: id.0 })
}

//==================================================================================ENABLE_DISABLE
/// Start the motor (communication type 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Enable {
    pub host_id: u8,
    pub motor_id: u8,
}

impl FrameEncode for Enable {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        let id = CanId::command(CommunicationType::EnableDevice, self.host_id, self.motor_id)?;
        frame(id, &[])
    }
}

/// Stop the motor (communication type 4), optionally clearing latched faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Disable {
    pub host_id: u8,
    pub motor_id: u8,
    pub clear_fault: bool,
}

impl FrameEncode for Disable {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        let id = CanId::command(CommunicationType::DisableDevice, self.host_id, self.motor_id)?;
        if self.clear_fault {
            let mut payload = [0u8; MAX_DLC];
            payload[0] = 1;
            frame(id, &payload)
        } else {
            frame(id, &[])
        }
    }
}

//==================================================================================PARAMETERS
/// Write one parameter (communication type 18). Not persisted across power cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteParameter {
    pub host_id: u8,
    pub motor_id: u8,
    pub index: ParameterIndex,
    pub value: ParameterValue,
}

impl FrameEncode for WriteParameter {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        if !self.value.is_finite() {
            return Err(EncodeError::InvalidNumericValue);
        }
        let id = CanId::command(
            CommunicationType::WriteSingleParameter,
            self.host_id,
            self.motor_id,
        )?;
        frame(id, &self.index.payload(self.value.to_le_bytes()))
    }
}

/// Ask for one parameter (communication type 17); the motor answers with a
/// [`ParameterFrame`](crate::protocol::messages::parameter::ParameterFrame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadParameter {
    pub host_id: u8,
    pub motor_id: u8,
    pub index: ParameterIndex,
}

impl FrameEncode for ReadParameter {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        let id = CanId::command(
            CommunicationType::ReadSingleParameter,
            self.host_id,
            self.motor_id,
        )?;
        frame(id, &self.index.payload([0; 4]))
    }
}

//==================================================================================MOTION_CONTROL
/// Operation-control set-point (communication type 1).
///
/// Only honoured in [`RunMode::OperationControl`]. The torque travels in the
/// identifier, so this is the one command without a host id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionControl {
    pub motor_id: u8,
    pub torque: RangedValue<Torque>,
    pub angle: RangedValue<Angle>,
    pub speed: RangedValue<Speed>,
    pub kp: RangedValue<Kp>,
    pub kd: RangedValue<Kd>,
}

impl MotionControl {
    /// Checks every set-point against its physical range.
    pub fn new(
        motor_id: u8,
        torque: f32,
        angle: f32,
        speed: f32,
        kp: f32,
        kd: f32,
    ) -> Result<Self, EncodeError> {
        if !(torque.is_finite()
            && angle.is_finite()
            && speed.is_finite()
            && kp.is_finite()
            && kd.is_finite())
        {
            return Err(EncodeError::InvalidNumericValue);
        }
        Ok(Self {
            motor_id,
            torque: ranged(torque)?,
            angle: ranged(angle)?,
            speed: ranged(speed)?,
            kp: ranged(kp)?,
            kd: ranged(kd)?,
        })
    }
}

fn ranged<R: FloatRange>(value: f32) -> Result<RangedValue<R>, EncodeError> {
    RangedValue::new(value).ok_or(EncodeError::ValueOutOfRange)
}

impl FrameEncode for MotionControl {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        let id = CanId::builder(CommunicationType::MotionControl)
            .with_data_area(self.torque.raw())
            .to_motor(self.motor_id)
            .build()?;

        let mut payload = [0u8; MAX_DLC];
        payload[0..2].copy_from_slice(&self.angle.raw().to_be_bytes());
        payload[2..4].copy_from_slice(&self.speed.raw().to_be_bytes());
        payload[4..6].copy_from_slice(&self.kp.raw().to_be_bytes());
        payload[6..8].copy_from_slice(&self.kd.raw().to_be_bytes());
        frame(id, &payload)
    }
}

//==================================================================================CONFIGURATION
/// Make the current position the mechanical zero (communication type 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetMechanicalZero {
    pub host_id: u8,
    pub motor_id: u8,
}

impl FrameEncode for SetMechanicalZero {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        let id = CanId::command(
            CommunicationType::SetMechanicalZero,
            self.host_id,
            self.motor_id,
        )?;
        let mut payload = [0u8; MAX_DLC];
        payload[0] = 1;
        frame(id, &payload)
    }
}

/// Move a motor to a new CAN id (communication type 7), effective at once.
/// The motor answers on the new id with a device id broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetCanId {
    pub host_id: u8,
    pub motor_id: u8,
    pub new_id: u8,
}

impl FrameEncode for SetCanId {
    fn to_frame(&self) -> Result<CanFrame, EncodeError> {
        if self.new_id > MAX_CAN_ID {
            return Err(EncodeError::IdOutOfRange {
                host_id: self.host_id,
                motor_id: self.new_id,
            });
        }
        let id = CanId::builder(CommunicationType::SetCanId)
            .from_host(self.host_id)
            .with_data_area(((self.new_id as u16) << 8) | self.host_id as u16)
            .to_motor(self.motor_id)
            .build()?;
        frame(id, &[])
    }
}

//==================================================================================FREE_FUNCTIONS
/// `T03{host}{motor}0`
pub fn encode_enable(host_id: u8, motor_id: u8) -> Result<SlcanBytes, EncodeError> {
    Enable { host_id, motor_id }.to_slcan()
}

/// `T04{host}{motor}0`
pub fn encode_disable(host_id: u8, motor_id: u8) -> Result<SlcanBytes, EncodeError> {
    Disable {
        host_id,
        motor_id,
        clear_fault: false,
    }
    .to_slcan()
}

/// Disable and clear latched faults.
pub fn encode_disable_clear_fault(host_id: u8, motor_id: u8) -> Result<SlcanBytes, EncodeError> {
    Disable {
        host_id,
        motor_id,
        clear_fault: true,
    }
    .to_slcan()
}

pub fn encode_set_run_mode(
    host_id: u8,
    motor_id: u8,
    mode: RunMode,
) -> Result<SlcanBytes, EncodeError> {
    encode_write_parameter(
        host_id,
        motor_id,
        ParameterIndex::RUN_MODE,
        ParameterValue::U8(mode as u8),
    )
}

/// Writes `value` as its IEEE-754 bit pattern, little-endian.
///
/// The value is not range checked; see [`encode_set_speed_reference`] for the
/// checked speed helper.
pub fn encode_write_float_parameter(
    host_id: u8,
    motor_id: u8,
    index: impl Into<ParameterIndex>,
    value: f32,
) -> Result<SlcanBytes, EncodeError> {
    encode_write_parameter(host_id, motor_id, index, ParameterValue::F32(value))
}

pub fn encode_write_parameter(
    host_id: u8,
    motor_id: u8,
    index: impl Into<ParameterIndex>,
    value: ParameterValue,
) -> Result<SlcanBytes, EncodeError> {
    WriteParameter {
        host_id,
        motor_id,
        index: index.into(),
        value,
    }
    .to_slcan()
}

/// Speed-mode set-point; fails with `ValueOutOfRange` outside [-30, 30] rad/s.
pub fn encode_set_speed_reference(
    host_id: u8,
    motor_id: u8,
    speed: f32,
) -> Result<SlcanBytes, EncodeError> {
    if !speed.is_finite() {
        return Err(EncodeError::InvalidNumericValue);
    }
    if !(Speed::MIN..=Speed::MAX).contains(&speed) {
        return Err(EncodeError::ValueOutOfRange);
    }
    encode_write_float_parameter(host_id, motor_id, ParameterIndex::SPD_REF, speed)
}

pub fn encode_read_parameter(
    host_id: u8,
    motor_id: u8,
    index: impl Into<ParameterIndex>,
) -> Result<SlcanBytes, EncodeError> {
    ReadParameter {
        host_id,
        motor_id,
        index: index.into(),
    }
    .to_slcan()
}

pub fn encode_motion_control(command: &MotionControl) -> Result<SlcanBytes, EncodeError> {
    command.to_slcan()
}

pub fn encode_set_mechanical_zero(host_id: u8, motor_id: u8) -> Result<SlcanBytes, EncodeError> {
    SetMechanicalZero { host_id, motor_id }.to_slcan()
}

pub fn encode_set_can_id(
    host_id: u8,
    motor_id: u8,
    new_id: u8,
) -> Result<SlcanBytes, EncodeError> {
    SetCanId {
        host_id,
        motor_id,
        new_id,
    }
    .to_slcan()
}
