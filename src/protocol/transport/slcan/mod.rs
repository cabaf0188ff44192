//! SLCAN (Serial Line CAN) ASCII framing.
//!
//! ```text
//! Extended data:   T<ID:8hex><DLC:1hex><DATA:2hex*DLC>
//! Standard data:   t<ID:3hex><DLC:1hex><DATA:2hex*DLC>
//! Extended remote: R<ID:8hex><DLC:1hex>
//! Standard remote: r<ID:3hex><DLC:1hex>
//! ```
//!
//! No checksum is appended (CyberGear firmware ignores it) and the `\r`
//! terminator belongs to the serial line, not to this layer.
use crate::core::SlcanBytes;
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::hex::{HexReader, HexWriter};
use crate::protocol::transport::can_frame::{CanFrame, MAX_DLC};
use embedded_can::{ExtendedId, Frame, Id};

/// Marker + 8 identifier digits + DLC digit.
pub const EXTENDED_HEADER_LEN: usize = 10;

const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;
const MAX_STANDARD_ID: u32 = 0x7FF;

/// Line length of an extended data frame carrying `dlc` bytes.
pub const fn extended_line_len(dlc: usize) -> usize {
    EXTENDED_HEADER_LEN + 2 * dlc
}

//==================================================================================FRAME_KIND
/// Frame type selected by the first character of the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    ExtendedData,
    StandardData,
    ExtendedRemote,
    StandardRemote,
}

impl FrameKind {
    /// Leading ASCII marker.
    pub const fn marker(self) -> u8 {
        match self {
            FrameKind::ExtendedData => b'T',
            FrameKind::StandardData => b't',
            FrameKind::ExtendedRemote => b'R',
            FrameKind::StandardRemote => b'r',
        }
    }

    /// Inverse of [`FrameKind::marker`].
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'T' => Some(FrameKind::ExtendedData),
            b't' => Some(FrameKind::StandardData),
            b'R' => Some(FrameKind::ExtendedRemote),
            b'r' => Some(FrameKind::StandardRemote),
            _ => None,
        }
    }

    /// Kind matching an existing frame.
    pub fn of(frame: &CanFrame) -> Self {
        match (frame.is_extended(), frame.is_remote_frame()) {
            (true, false) => FrameKind::ExtendedData,
            (false, false) => FrameKind::StandardData,
            (true, true) => FrameKind::ExtendedRemote,
            (false, true) => FrameKind::StandardRemote,
        }
    }

    pub const fn is_extended(self) -> bool {
        matches!(self, FrameKind::ExtendedData | FrameKind::ExtendedRemote)
    }

    pub const fn is_remote(self) -> bool {
        matches!(self, FrameKind::ExtendedRemote | FrameKind::StandardRemote)
    }

    /// Hex digits used by the identifier.
    pub const fn id_digits(self) -> u8 {
        if self.is_extended() {
            8
        } else {
            3
        }
    }

    /// Largest identifier the kind can carry (29 or 11 bits).
    pub const fn max_id(self) -> u32 {
        if self.is_extended() {
            MAX_EXTENDED_ID
        } else {
            MAX_STANDARD_ID
        }
    }
}

//==================================================================================ENCODE
/// Render one frame line. `payload.len()` becomes the DLC; remote kinds emit
/// the DLC only.
pub fn encode(kind: FrameKind, id: u32, payload: &[u8]) -> Result<SlcanBytes, EncodeError> {
    if payload.len() > MAX_DLC {
        return Err(EncodeError::PayloadTooLong { len: payload.len() });
    }
    write_line(kind, id, payload.len(), payload)
}

/// Render an existing frame, remote frames included.
pub fn encode_frame(frame: &CanFrame) -> Result<SlcanBytes, EncodeError> {
    if frame.len > MAX_DLC {
        return Err(EncodeError::PayloadTooLong { len: frame.len });
    }
    write_line(FrameKind::of(frame), frame.raw_id(), frame.len, frame.data())
}

fn write_line(
    kind: FrameKind,
    id: u32,
    dlc: usize,
    payload: &[u8],
) -> Result<SlcanBytes, EncodeError> {
    if id > kind.max_id() {
        return Err(EncodeError::IdentifierTooWide { id });
    }

    let mut line = SlcanBytes::new();
    let mut writer = HexWriter::new(&mut line.data);
    writer.write_raw(kind.marker())?;
    writer.write_digits(id, kind.id_digits())?;
    writer.write_nibble(dlc as u8)?;
    if !kind.is_remote() {
        writer.write_bytes(payload)?;
    }
    line.len = writer.cursor();
    Ok(line)
}

//==================================================================================DECODE
/// Parse one line (terminator already stripped) into an extended data frame.
///
/// Standard and remote frames are recognised but refused: CyberGear only
/// talks in extended data frames.
pub fn decode(line: &[u8]) -> Result<CanFrame, DecodeError> {
    let marker = *line.first().ok_or(DecodeError::MalformedFrame)?;
    let kind = FrameKind::from_marker(marker).ok_or(DecodeError::MalformedFrame)?;
    if kind != FrameKind::ExtendedData {
        #[cfg(feature = "defmt")]
        defmt::trace!("slcan: refusing frame kind {}", kind);
        return Err(DecodeError::UnsupportedFrameKind { marker });
    }
    if line.len() < EXTENDED_HEADER_LEN {
        return Err(DecodeError::MalformedFrame);
    }

    let mut reader = HexReader::new(line);
    reader.read_raw()?;
    let raw_id = reader.read_u32()?;
    let id = ExtendedId::new(raw_id).ok_or(DecodeError::MalformedFrame)?;
    let dlc = reader.read_nibble()? as usize;
    if dlc > MAX_DLC || line.len() != extended_line_len(dlc) {
        return Err(DecodeError::MalformedFrame);
    }

    let mut data = [0u8; MAX_DLC];
    reader.read_bytes(&mut data[..dlc])?;
    CanFrame::new(Id::Extended(id), &data[..dlc]).ok_or(DecodeError::MalformedFrame)
}

//==================================================================================ADAPTER_COMMANDS
/// CAN bus bitrates selectable with the `Sn` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bitrate {
    Kbit10,
    Kbit20,
    Kbit50,
    Kbit100,
    Kbit125,
    Kbit250,
    Kbit500,
    Kbit800,
    /// CyberGear default.
    Mbit1,
}

impl Bitrate {
    /// Setup digit used after `S`.
    pub const fn code(self) -> u8 {
        match self {
            Bitrate::Kbit10 => 0,
            Bitrate::Kbit20 => 1,
            Bitrate::Kbit50 => 2,
            Bitrate::Kbit100 => 3,
            Bitrate::Kbit125 => 4,
            Bitrate::Kbit250 => 5,
            Bitrate::Kbit500 => 6,
            Bitrate::Kbit800 => 7,
            Bitrate::Mbit1 => 8,
        }
    }
}

/// Adapter control lines (channel setup rather than bus traffic).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlcanCommand {
    /// `Sn`: select the bus bitrate; only valid while the channel is closed.
    SetBitrate(Bitrate),
    /// `O`: open the channel.
    Open,
    /// `C`: close the channel.
    Close,
}

impl SlcanCommand {
    /// Render the command line, without terminator.
    pub fn encode(self) -> SlcanBytes {
        let (bytes, len) = match self {
            SlcanCommand::SetBitrate(bitrate) => ([b'S', b'0' + bitrate.code()], 2),
            SlcanCommand::Open => ([b'O', 0], 1),
            SlcanCommand::Close => ([b'C', 0], 1),
        };
        let mut line = SlcanBytes::new();
        line.data[..2].copy_from_slice(&bytes);
        line.len = len;
        line
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
