//! CyberGear message layer: commands sent by the host, replies sent by the
//! motors, and the parameter registry shared by both.
pub mod commands;
pub mod feedback;
pub mod parameter;
pub mod response;

pub use commands::{
    encode_disable, encode_disable_clear_fault, encode_enable, encode_motion_control,
    encode_read_parameter, encode_set_can_id, encode_set_mechanical_zero,
    encode_set_run_mode, encode_set_speed_reference, encode_write_float_parameter,
    encode_write_parameter,
};
pub use feedback::{FaultFlags, MotorFeedback, MotorMode};
pub use parameter::{ParameterFrame, ParameterIndex, ParameterKind, RunMode};
pub use response::{decode_frame, decode_response, Response, CYBERGEAR_FRAME_LEN};
