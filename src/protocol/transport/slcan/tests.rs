//! Tests for SLCAN line encoding/decoding.
use super::*;

#[test]
/// Header-only extended frame.
fn test_encode_extended_no_payload() {
    let line = encode(FrameKind::ExtendedData, 0x0300_647F, &[]).unwrap();
    assert_eq!(line.as_slice(), b"T0300647F0");
}

#[test]
/// Payload bytes are rendered high nibble first, upper case.
fn test_encode_extended_with_payload() {
    let line = encode(FrameKind::ExtendedData, 0x1200_007F, &[0x0A, 0x70, 0xFF]).unwrap();
    assert_eq!(line.as_slice(), b"T1200007F30A70FF");
}

#[test]
/// Serialized length is `1 + 8 + 1 + 2 * dlc` for every legal payload length.
fn test_encode_length_invariant() {
    let payload = [0xA5u8; 8];
    for dlc in 0..=8 {
        let line = encode(FrameKind::ExtendedData, 0x1FFF_FFFF, &payload[..dlc]).unwrap();
        assert_eq!(line.len(), 1 + 8 + 1 + 2 * dlc);
        assert_eq!(line.len(), extended_line_len(dlc));
    }
}

#[test]
/// Standard and remote kinds use their own widths and omit data.
fn test_encode_other_kinds() {
    let line = encode(FrameKind::StandardData, 0x123, &[0xAA, 0xBB]).unwrap();
    assert_eq!(line.as_slice(), b"t1232AABB");

    let line = encode(FrameKind::ExtendedRemote, 0x1234_5678, &[0, 0]).unwrap();
    assert_eq!(line.as_slice(), b"R123456782");

    let remote = CanFrame::new_remote(embedded_can::StandardId::new(0x42).unwrap(), 4).unwrap();
    assert_eq!(encode_frame(&remote).unwrap().as_slice(), b"r0424");
}

#[test]
/// Identifier width and payload size are enforced.
fn test_encode_limits() {
    assert_eq!(
        encode(FrameKind::ExtendedData, 0x2000_0000, &[]),
        Err(EncodeError::IdentifierTooWide { id: 0x2000_0000 })
    );
    assert_eq!(
        encode(FrameKind::StandardData, 0x800, &[]),
        Err(EncodeError::IdentifierTooWide { id: 0x800 })
    );
    assert_eq!(
        encode(FrameKind::ExtendedData, 0, &[0; 9]),
        Err(EncodeError::PayloadTooLong { len: 9 })
    );
}

#[test]
/// Decodes an extended frame into identifier and payload.
fn test_decode_extended() {
    let frame = decode(b"T02807F008800080007FFF00C8").unwrap();
    assert_eq!(frame.raw_id(), 0x0280_7F00);
    assert_eq!(frame.dlc(), 8);
    assert_eq!(frame.data(), &[0x80, 0x00, 0x80, 0x00, 0x7F, 0xFF, 0x00, 0xC8]);

    let frame = decode(b"T1200007F30A70FF").unwrap();
    assert!(frame.is_extended());
    assert!(frame.is_data_frame());
    assert_eq!(frame.raw_id(), 0x1200_007F);
    assert_eq!(frame.dlc(), 3);
    assert_eq!(frame.data(), &[0x0A, 0x70, 0xFF]);
}

#[test]
/// Encoding then decoding keeps identifier and data for every DLC.
fn test_encode_decode_cycle() {
    let payload = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
    for dlc in 0..=8 {
        let line = encode(FrameKind::ExtendedData, 0x0285_7F00, &payload[..dlc]).unwrap();
        let frame = decode(line.as_slice()).unwrap();
        assert_eq!(frame.raw_id(), 0x0285_7F00);
        assert_eq!(frame.data(), &payload[..dlc]);
    }
}

#[test]
/// Standard and remote frames are refused with their marker.
fn test_decode_unsupported_kinds() {
    assert_eq!(
        decode(b"t1232AABB"),
        Err(DecodeError::UnsupportedFrameKind { marker: b't' })
    );
    assert_eq!(
        decode(b"R123456780"),
        Err(DecodeError::UnsupportedFrameKind { marker: b'R' })
    );
    assert_eq!(
        decode(b"r1230"),
        Err(DecodeError::UnsupportedFrameKind { marker: b'r' })
    );
}

#[test]
/// Empty lines, unknown markers and length mismatches are malformed.
fn test_decode_malformed() {
    assert_eq!(decode(b""), Err(DecodeError::MalformedFrame));
    assert_eq!(decode(b"X0300647F0"), Err(DecodeError::MalformedFrame));
    assert_eq!(decode(b"T0300647F"), Err(DecodeError::MalformedFrame));
    assert_eq!(decode(b"T0300647F1"), Err(DecodeError::MalformedFrame));
    assert_eq!(decode(b"T0300647F0AA"), Err(DecodeError::MalformedFrame));
    // the line terminator is not part of the frame
    assert_eq!(decode(b"T0300647F0\r"), Err(DecodeError::MalformedFrame));
    // DLC digit 9 is above the classic CAN limit
    assert_eq!(
        decode(b"T0300647F9000000000000000000"),
        Err(DecodeError::MalformedFrame)
    );
    // 0x3... needs more than 29 bits
    assert_eq!(decode(b"T300000000"), Err(DecodeError::MalformedFrame));
}

#[test]
/// Non-hex characters are reported with their position.
fn test_decode_invalid_hex() {
    assert_eq!(
        decode(b"T03Z0647F0"),
        Err(DecodeError::InvalidHexDigit {
            position: 3,
            found: b'Z'
        })
    );
    assert_eq!(
        decode(b"T0300647F1G0"),
        Err(DecodeError::InvalidHexDigit {
            position: 10,
            found: b'G'
        })
    );
}

#[test]
/// Adapter control lines.
fn test_adapter_commands() {
    assert_eq!(SlcanCommand::SetBitrate(Bitrate::Mbit1).encode().as_slice(), b"S8");
    assert_eq!(SlcanCommand::SetBitrate(Bitrate::Kbit10).encode().as_slice(), b"S0");
    assert_eq!(SlcanCommand::Open.encode().as_slice(), b"O");
    assert_eq!(SlcanCommand::Close.encode().as_slice(), b"C");
}

#[test]
/// Rendered lines always read back as their full text, never truncated or empty.
fn test_lines_read_as_text() {
    assert_eq!(SlcanCommand::SetBitrate(Bitrate::Mbit1).encode().as_str(), "S8");
    assert_eq!(SlcanCommand::Open.encode().as_str(), "O");

    let line = encode(FrameKind::ExtendedData, 0x1FFF_FFFF, &[0xFF; 8]).unwrap();
    assert_eq!(line.len(), crate::core::MAX_SLCAN_LINE);
    assert_eq!(line.as_str(), "T1FFFFFFF8FFFFFFFFFFFFFFFF");
    assert_eq!(line.as_str().len(), line.len());
}
