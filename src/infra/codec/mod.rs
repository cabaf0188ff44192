//! Codec primitives used by the protocol layer.
pub mod hex;
pub mod scaling;
pub mod traits;
