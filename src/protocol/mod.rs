//! CyberGear protocol: SLCAN/CAN transport, message encoding and decoding,
//! the async command/response session and its shared supervisor.
pub mod messages;
pub mod session;
pub mod supervisor;
pub mod transport;
