//! Transport layer: CAN frame representation, CyberGear 29-bit identifiers,
//! SLCAN ASCII framing and the serial line/timer abstraction traits.
//!
//! ## Line timing constants
//!
//! These constants bound how a session waits on the SLCAN adapter.

pub mod can_frame;
pub mod can_id;
pub mod slcan;
pub mod traits;

/// Carriage return terminating every SLCAN line.
pub const LINE_TERMINATOR: u8 = b'\r';

/// Byte sent by SLCAN adapters instead of a line when a command fails.
pub const ADAPTER_ERROR: u8 = 0x07;

/// Recommended timeout for a motor reply (ms).
///
/// At 1 Mbit/s a CyberGear answers a command within a couple of
/// milliseconds; USB-serial adapters add their own latency on top.
///
/// # Timeout rationale
///
/// - Bus round trip: < 1 ms
/// - USB CDC polling and host scheduling: ~10-20 ms
/// - Safety margin x5 -> 100 ms
pub const RESPONSE_TIMEOUT_MS: u32 = 100;

/// Largest line a session buffers while waiting for a reply: a full
/// extended frame, its terminator and some slack for adapter noise.
pub const MAX_LINE_LEN: usize = 32;
