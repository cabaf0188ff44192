//! Abstraction traits used by the session layer (serial line and timer).
pub mod serial_line;
pub mod timer;
