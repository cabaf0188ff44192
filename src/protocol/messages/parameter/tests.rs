//! Tests for the parameter registry and read replies.
use super::*;
use crate::protocol::transport::can_id::CanId;

fn reply(motor_id: u8, host_id: u8, data: &[u8]) -> CanFrame {
    let id = CanId(((CommunicationType::ReadSingleParameter as u32) << 24)
        | ((motor_id as u32) << 8)
        | host_id as u32);
    CanFrame::extended(id, data).unwrap()
}

#[test]
/// Index bytes are swapped on the wire, value follows after two zero bytes.
fn test_payload_layout() {
    assert_eq!(
        ParameterIndex::RUN_MODE.payload([2, 0, 0, 0]),
        [0x05, 0x70, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        ParameterIndex::SPD_REF.payload(1.12f32.to_le_bytes()),
        [0x0A, 0x70, 0x00, 0x00, 0x29, 0x5C, 0x8F, 0x3F]
    );
}

#[test]
/// Every registered parameter has a kind; unknown indices have none.
fn test_registry_kinds() {
    assert_eq!(ParameterIndex::RUN_MODE.kind(), Some(ParameterKind::U8));
    assert_eq!(ParameterIndex::ROTATION.kind(), Some(ParameterKind::I16));
    for index in [
        ParameterIndex::IQ_REF,
        ParameterIndex::SPD_REF,
        ParameterIndex::LIMIT_TORQUE,
        ParameterIndex::CUR_KP,
        ParameterIndex::CUR_KI,
        ParameterIndex::CUR_FILT_GAIN,
        ParameterIndex::LOC_REF,
        ParameterIndex::LIMIT_SPD,
        ParameterIndex::LIMIT_CUR,
        ParameterIndex::MECH_POS,
        ParameterIndex::IQF,
        ParameterIndex::MECH_VEL,
        ParameterIndex::VBUS,
        ParameterIndex::LOC_KP,
        ParameterIndex::SPD_KP,
        ParameterIndex::SPD_KI,
    ] {
        assert_eq!(index.kind(), Some(ParameterKind::F32), "{:04X}", index.0);
    }
    assert_eq!(ParameterIndex(0x7007).kind(), None);
    assert_eq!(ParameterIndex(0x2005).kind(), None);
}

#[test]
/// Telemetry entries are read only.
fn test_registry_writable() {
    assert!(ParameterIndex::SPD_REF.is_writable());
    assert!(ParameterIndex::RUN_MODE.is_writable());
    assert!(!ParameterIndex::VBUS.is_writable());
    assert!(!ParameterIndex::MECH_POS.is_writable());
    assert!(!ParameterIndex(0x1234).is_writable());
}

#[test]
fn test_run_mode_raw() {
    for mode in [
        RunMode::OperationControl,
        RunMode::Position,
        RunMode::Speed,
        RunMode::Current,
    ] {
        assert_eq!(RunMode::from_raw(mode as u8), Some(mode));
    }
    assert_eq!(RunMode::from_raw(4), None);
}

#[test]
/// A read reply carries the motor in bits 8-15 and the host in bits 0-7.
fn test_decode_parameter_reply() {
    let frame = reply(0x7F, 0x00, &[0x1C, 0x70, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x41]);
    let parameter = ParameterFrame::from_frame(&frame).unwrap();
    assert_eq!(parameter.motor_id, 0x7F);
    assert_eq!(parameter.host_id, 0x00);
    assert_eq!(parameter.parameter_index, ParameterIndex::VBUS);
    assert_eq!(parameter.as_f32(), 24.0);
    assert_eq!(parameter.value(), Some(ParameterValue::F32(24.0)));
}

#[test]
/// Typed accessors read the same four value bytes.
fn test_parameter_accessors() {
    let frame = reply(0x01, 0x02, &[0x05, 0x70, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]);
    let parameter = ParameterFrame::from_frame(&frame).unwrap();
    assert_eq!(parameter.as_u8(), 2);
    assert_eq!(parameter.as_u16(), 2);
    assert_eq!(parameter.as_u32(), 2);
    assert_eq!(parameter.value(), Some(ParameterValue::U8(2)));
    assert_eq!(RunMode::from_raw(parameter.as_u8()), Some(RunMode::Speed));

    let frame = reply(0x01, 0x02, &[0x1D, 0x70, 0x00, 0x00, 0xFE, 0xFF, 0xFF, 0xFF]);
    let parameter = ParameterFrame::from_frame(&frame).unwrap();
    assert_eq!(parameter.as_i16(), -2);
    assert_eq!(parameter.value(), Some(ParameterValue::I16(-2)));

    let frame = reply(0x01, 0x02, &[0x00, 0x20, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04]);
    let parameter = ParameterFrame::from_frame(&frame).unwrap();
    assert_eq!(parameter.value(), None);
    assert_eq!(parameter.as_u32(), 0x0403_0201);
}

#[test]
/// Short payloads and foreign communication types are rejected.
fn test_decode_parameter_rejects() {
    let short = reply(0x01, 0x00, &[0x05, 0x70, 0x00, 0x00]);
    assert_eq!(
        ParameterFrame::from_frame(&short),
        Err(DecodeError::MalformedFrame)
    );

    let feedback = CanFrame::extended(CanId(0x0280_7F00), &[0; 8]).unwrap();
    assert_eq!(
        ParameterFrame::from_frame(&feedback),
        Err(DecodeError::UnknownCommunicationType(2))
    );
}
