//! `cybergear-slcan` library: host-side codec for Xiaomi CyberGear motors
//! reached through an SLCAN (serial line CAN) adapter, usable in a `no_std`
//! environment. The crate exposes the infrastructure modules (hex and
//! scaling codecs), the protocol logic (transport, messages, session), and
//! the shared value and error types.
#![no_std]
//==================================================================================
/// Fixed-capacity line buffer and parameter values shared by the codecs.
pub mod core;
/// Encode, decode, scaling and exchange errors.
pub mod error;
/// Hex digit and physical-unit codecs.
pub mod infra;
/// SLCAN transport, CyberGear messages and the motor session.
pub mod protocol;
//==================================================================================
pub use crate::core::{ParameterValue, SlcanBytes};
pub use crate::error::{DecodeError, EncodeError, ExchangeError, ScalingError};
pub use crate::infra::codec::scaling::{decode_linear, encode_linear};
pub use crate::protocol::messages::{
    decode_response, encode_disable, encode_enable, encode_set_run_mode,
    encode_write_float_parameter, MotorFeedback, ParameterFrame, ParameterIndex, Response,
    RunMode,
};
pub use crate::protocol::session::{MotorSession, SessionConfig};
