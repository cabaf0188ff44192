//! In-memory representation of a classic CAN frame as carried by an SLCAN line.
use crate::protocol::transport::can_id::CanId;
use embedded_can::{ExtendedId, Frame, Id};

/// Maximum number of data bytes in a classic CAN frame.
pub const MAX_DLC: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Raw CAN frame: identifier, remote flag and up to eight data bytes.
pub struct CanFrame {
    /// Standard (11-bit) or extended (29-bit) identifier.
    pub id: Id,
    /// Remote transmission request: no data, `len` is the requested DLC.
    pub remote: bool,
    /// Payload buffer. Bytes past `len` are zero.
    pub data: [u8; MAX_DLC],
    /// Data Length Code, 0 to 8.
    pub len: usize,
}

impl CanFrame {
    /// Extended data frame carrying a CyberGear identifier.
    pub fn extended(id: CanId, data: &[u8]) -> Option<Self> {
        let id = ExtendedId::new(id.0)?;
        Self::new(id, data)
    }

    /// CyberGear view of the identifier, for extended frames only.
    pub fn cybergear_id(&self) -> Option<CanId> {
        match self.id {
            Id::Extended(id) => Some(CanId(id.as_raw())),
            Id::Standard(_) => None,
        }
    }

    /// Raw identifier value regardless of width.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_DLC {
            return None;
        }
        let mut buffer = [0u8; MAX_DLC];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            remote: false,
            data: buffer,
            len: data.len(),
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_DLC {
            return None;
        }
        Some(Self {
            id: id.into(),
            remote: true,
            data: [0; MAX_DLC],
            len: dlc,
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.len]
        }
    }
}
