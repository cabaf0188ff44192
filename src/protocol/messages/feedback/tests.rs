//! Tests for motor feedback decoding.
extern crate std;

use super::*;
use crate::protocol::transport::can_id::CanId;
use std::string::ToString;

fn approx(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

/// Status report identifier with the given mode and fault bits.
fn status_id(mode: u8, faults: u8, motor_id: u8, host_id: u8) -> CanId {
    CanId((2 << 24)
        | ((mode as u32) << 22)
        | ((faults as u32) << 16)
        | ((motor_id as u32) << 8)
        | host_id as u32)
}

#[test]
/// Mid-scale raw values decode to roughly zero; 0x00C8 is 20.0 degC.
fn test_decode_mid_scale() {
    let frame = CanFrame::extended(
        CanId(0x0280_7F00),
        &[0x80, 0x00, 0x80, 0x00, 0x80, 0x00, 0x00, 0xC8],
    )
    .unwrap();
    let feedback = MotorFeedback::from_frame(&frame).unwrap();

    assert_eq!(feedback.motor_id, 0x7F);
    assert_eq!(feedback.host_id, 0x00);
    assert!(approx(feedback.current_angle, 0.0, 0.001));
    assert!(approx(feedback.current_speed, 0.0, 0.001));
    assert!(approx(feedback.current_torque, 0.0, 0.001));
    assert!(approx(feedback.current_temperature, 20.0, 0.0001));
    assert_eq!(feedback.mode, MotorMode::Run);
    assert!(!feedback.has_fault());
}

#[test]
/// Raw extremes land on the range ends.
fn test_decode_extremes() {
    let frame = CanFrame::extended(
        status_id(0, 0, 1, 0),
        &[0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x01, 0x2C],
    )
    .unwrap();
    let feedback = MotorFeedback::from_frame(&frame).unwrap();

    assert!(approx(feedback.current_angle, Angle::MIN, 0.0001));
    assert!(approx(feedback.current_speed, 30.0, 0.0001));
    assert!(approx(feedback.current_torque, -12.0, 0.0001));
    assert!(approx(feedback.current_temperature, 30.0, 0.0001));
    assert_eq!(feedback.mode, MotorMode::Reset);
}

#[test]
/// Each fault bit maps to its own flag.
fn test_decode_faults() {
    let cases: [(u8, fn(FaultFlags) -> bool); 6] = [
        (1 << 0, FaultFlags::undervoltage),
        (1 << 1, FaultFlags::overcurrent),
        (1 << 2, FaultFlags::overtemperature),
        (1 << 3, FaultFlags::magnetic_encoder),
        (1 << 4, FaultFlags::hall_encoder),
        (1 << 5, FaultFlags::not_calibrated),
    ];
    for (bits, check) in cases {
        let frame = CanFrame::extended(status_id(2, bits, 0x10, 0x01), &[0x80; 8]).unwrap();
        let feedback = MotorFeedback::from_frame(&frame).unwrap();
        assert!(check(feedback.faults), "fault bits {bits:#04x}");
        assert_eq!(feedback.faults.bits(), bits);
        assert!(feedback.has_fault());
    }

    let all = FaultFlags::from_bits(0xFF);
    assert_eq!(all.bits(), 0x3F);
}

#[test]
/// Mode values 0-2 decode, 3 is reported as unknown.
fn test_decode_modes() {
    let frame = CanFrame::extended(status_id(1, 0, 0x10, 0x01), &[0x80; 8]).unwrap();
    assert_eq!(
        MotorFeedback::from_frame(&frame).unwrap().mode,
        MotorMode::Calibration
    );

    let frame = CanFrame::extended(status_id(3, 0, 0x10, 0x01), &[0x80; 8]).unwrap();
    assert_eq!(
        MotorFeedback::from_frame(&frame),
        Err(DecodeError::UnknownMotorMode(3))
    );
}

#[test]
/// Wrong type or payload size never yields a feedback value.
fn test_decode_rejects() {
    let frame = CanFrame::extended(CanId(0x0280_7F00), &[0x80; 6]).unwrap();
    assert_eq!(
        MotorFeedback::from_frame(&frame),
        Err(DecodeError::MalformedFrame)
    );

    let frame = CanFrame::extended(CanId(0x1100_7F00), &[0x80; 8]).unwrap();
    assert_eq!(
        MotorFeedback::from_frame(&frame),
        Err(DecodeError::UnknownCommunicationType(17))
    );
}

#[test]
/// Fault names are listed in bit order, most severe first.
fn test_fault_display() {
    assert_eq!(FaultFlags::default().to_string(), "none");
    assert_eq!(
        FaultFlags::from_bits(FaultFlags::NOT_CALIBRATED | FaultFlags::UNDERVOLTAGE).to_string(),
        "not-calibrated,undervoltage"
    );
}
