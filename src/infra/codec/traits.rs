//! Traits decoupling CyberGear message types from the SLCAN frame codec.
//! Commands know how to become a [`CanFrame`]; responses know how to be
//! rebuilt from one. The SLCAN layer only ever sees frames.
use crate::core::SlcanBytes;
use crate::error::{DecodeError, EncodeError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::slcan;

//==================================================================================FRAME_ENCODE
/// Implemented by every outbound command.
pub trait FrameEncode {
    /// Build the CAN frame (identifier + payload) for this command.
    fn to_frame(&self) -> Result<CanFrame, EncodeError>;

    /// Render the command as one SLCAN line, without terminator.
    fn to_slcan(&self) -> Result<SlcanBytes, EncodeError> {
        let frame = self.to_frame()?;
        slcan::encode_frame(&frame)
    }
}

//==================================================================================FRAME_DECODE
/// Implemented by every inbound response payload.
pub trait FrameDecode: Sized {
    /// Communication type this decoder accepts.
    const COMMUNICATION_TYPE: u8;

    /// Rebuild the value from an already validated extended data frame.
    /// Either every field is recovered or an error is returned.
    fn from_frame(frame: &CanFrame) -> Result<Self, DecodeError>;
}
