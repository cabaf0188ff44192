//! Tests for reply classification.
use super::*;
use crate::protocol::messages::feedback::MotorMode;
use crate::protocol::messages::parameter::ParameterIndex;

#[test]
/// Terminated feedback line decodes into `MotorFeedback`.
fn test_decode_feedback_line() {
    let response = decode_response(b"T02807F00880008000800000C8\r").unwrap();
    let Response::MotorFeedback(feedback) = response else {
        panic!("expected feedback, got {response:?}");
    };
    assert_eq!(feedback.motor_id, 0x7F);
    assert_eq!(feedback.host_id, 0x00);
    assert_eq!(feedback.mode, MotorMode::Run);
    assert!(feedback.current_temperature > 19.99 && feedback.current_temperature < 20.01);
    assert_eq!(response.motor_id(), 0x7F);
    assert_eq!(response.communication_type(), CommunicationType::StatusReport);
}

#[test]
/// Parameter reply decodes into `ParameterFrame`.
fn test_decode_parameter_line() {
    let response = decode_response(b"T11007F0081C7000000000C041\r").unwrap();
    let Response::Parameter(parameter) = response else {
        panic!("expected parameter, got {response:?}");
    };
    assert_eq!(parameter.parameter_index, ParameterIndex::VBUS);
    assert_eq!(parameter.as_f32(), 24.0);
    assert_eq!(response.host_id(), 0x00);
    assert_eq!(response.motor_id(), 0x7F);
}

#[test]
/// Any length other than 27 is malformed, whatever the content.
fn test_length_check_first() {
    assert_eq!(decode_response(b""), Err(DecodeError::MalformedFrame));
    // unterminated
    assert_eq!(
        decode_response(b"T02807F00880008000800000C8"),
        Err(DecodeError::MalformedFrame)
    );
    // garbage of the wrong length is not inspected
    assert_eq!(decode_response(b"ZZZZ\r"), Err(DecodeError::MalformedFrame));
    assert_eq!(
        decode_response(b"T02807F00880008000800000C8\r\r"),
        Err(DecodeError::MalformedFrame)
    );
    // right length, wrong terminator
    assert_eq!(
        decode_response(b"T02807F00880008000800000C8X"),
        Err(DecodeError::MalformedFrame)
    );
}

#[test]
/// Right length but bad content reports the precise SLCAN failure.
fn test_slcan_errors_surface() {
    assert_eq!(
        decode_response(b"T02807F0088000800080G000C8\r"),
        Err(DecodeError::InvalidHexDigit {
            position: 20,
            found: b'G'
        })
    );
    // 27 bytes but DLC 7 does not fit the line
    assert_eq!(
        decode_response(b"T02807F00780008000800000C8\r"),
        Err(DecodeError::MalformedFrame)
    );
}

#[test]
/// Dispatch on communication type.
fn test_dispatch() {
    assert_eq!(
        decode_response(b"T0000017F80000000000000000\r"),
        Err(DecodeError::NotImplemented)
    );
    assert_eq!(
        decode_response(b"T1500017F80000000000000000\r"),
        Err(DecodeError::UnknownCommunicationType(21))
    );
    assert_eq!(
        decode_response(b"T0300017F80000000000000000\r"),
        Err(DecodeError::UnknownCommunicationType(3))
    );
}

#[test]
/// Mode 3 in the identifier is rejected as a whole.
fn test_unknown_mode() {
    assert_eq!(
        decode_response(b"T02C07F00880008000800000C8\r"),
        Err(DecodeError::UnknownMotorMode(3))
    );
}

#[test]
/// Frames handed over directly must be eight-byte extended data frames.
fn test_decode_frame_shape() {
    use crate::protocol::transport::can_id::CanId;
    use embedded_can::StandardId;

    let short = CanFrame::extended(CanId(0x0280_7F00), &[0x80; 4]).unwrap();
    assert_eq!(decode_frame(&short), Err(DecodeError::MalformedFrame));

    let standard = CanFrame::new(StandardId::new(0x123).unwrap(), &[0; 8]).unwrap();
    assert_eq!(
        decode_frame(&standard),
        Err(DecodeError::UnsupportedFrameKind { marker: b't' })
    );
}
