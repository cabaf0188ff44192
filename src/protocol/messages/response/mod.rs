//! Classification of motor replies.
//!
//! A reply line is exactly [`CYBERGEAR_FRAME_LEN`] bytes: an extended SLCAN
//! frame with eight data bytes (26 characters) followed by the `\r`
//! terminator, as delivered by the adapter.
use crate::error::DecodeError;
use crate::infra::codec::traits::FrameDecode;
use crate::protocol::messages::feedback::MotorFeedback;
use crate::protocol::messages::parameter::ParameterFrame;
use crate::protocol::transport::can_frame::{CanFrame, MAX_DLC};
use crate::protocol::transport::can_id::CommunicationType;
use crate::protocol::transport::slcan::{self, extended_line_len, FrameKind};
use crate::protocol::transport::LINE_TERMINATOR;
use embedded_can::Frame;

/// Length of one terminated reply line.
pub const CYBERGEAR_FRAME_LEN: usize = extended_line_len(MAX_DLC) + 1;

/// Every reply kind the host understands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    MotorFeedback(MotorFeedback),
    Parameter(ParameterFrame),
}

impl Response {
    /// Id of the motor that sent the reply.
    pub fn motor_id(&self) -> u8 {
        match self {
            Response::MotorFeedback(feedback) => feedback.motor_id,
            Response::Parameter(parameter) => parameter.motor_id,
        }
    }

    /// Id of the host the reply is addressed to.
    pub fn host_id(&self) -> u8 {
        match self {
            Response::MotorFeedback(feedback) => feedback.host_id,
            Response::Parameter(parameter) => parameter.host_id,
        }
    }

    pub fn communication_type(&self) -> CommunicationType {
        match self {
            Response::MotorFeedback(_) => CommunicationType::StatusReport,
            Response::Parameter(_) => CommunicationType::ReadSingleParameter,
        }
    }
}

/// Decode one terminated reply line.
///
/// Any length other than [`CYBERGEAR_FRAME_LEN`], or a missing terminator,
/// is a [`DecodeError::MalformedFrame`] before any character is parsed.
pub fn decode_response(line: &[u8]) -> Result<Response, DecodeError> {
    if line.len() != CYBERGEAR_FRAME_LEN || line[CYBERGEAR_FRAME_LEN - 1] != LINE_TERMINATOR {
        #[cfg(feature = "defmt")]
        defmt::debug!("response: malformed line of {} bytes", line.len());
        return Err(DecodeError::MalformedFrame);
    }
    let frame = slcan::decode(&line[..CYBERGEAR_FRAME_LEN - 1])?;
    decode_frame(&frame)
}

/// Dispatch an already parsed frame on its communication type.
pub fn decode_frame(frame: &CanFrame) -> Result<Response, DecodeError> {
    if !frame.is_extended() || frame.is_remote_frame() {
        return Err(DecodeError::UnsupportedFrameKind {
            marker: FrameKind::of(frame).marker(),
        });
    }
    if frame.dlc() != MAX_DLC {
        return Err(DecodeError::MalformedFrame);
    }
    let id = frame.cybergear_id().ok_or(DecodeError::MalformedFrame)?;

    let response = match id.communication_type() {
        Some(CommunicationType::StatusReport) => {
            Response::MotorFeedback(MotorFeedback::from_frame(frame)?)
        }
        Some(CommunicationType::ReadSingleParameter) => {
            Response::Parameter(ParameterFrame::from_frame(frame)?)
        }
        Some(CommunicationType::FetchDeviceId) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("response: device id broadcast from {}", id.source_id());
            return Err(DecodeError::NotImplemented);
        }
        _ => {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "response: unknown communication type {}",
                id.communication_type_raw()
            );
            return Err(DecodeError::UnknownCommunicationType(
                id.communication_type_raw(),
            ));
        }
    };

    #[cfg(feature = "defmt")]
    defmt::trace!("response: {}", response);
    Ok(response)
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
