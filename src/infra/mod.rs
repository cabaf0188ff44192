//! Protocol-agnostic building blocks: ASCII hex cursors, numeric scaling and
//! the traits that tie command/response types to SLCAN frames.
pub mod codec;
