//! Error definitions shared across library modules.
//! Each type models one failure domain: hex cursor access, numeric scaling,
//! frame encoding, frame decoding, the request/response exchange and the
//! supervisor replies.
use thiserror_no_std::Error;

//==================================================================================HEX_READER
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised while reading ASCII hex digits from a buffer.
pub enum HexReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more digits than the target type can hold.
    #[error("Cannot read more than {max} digits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// The byte at `position` is not in `[0-9A-Fa-f]`.
    #[error("Invalid hex digit {found:#04x} at position {position}")]
    InvalidDigit { position: usize, found: u8 },
}

//==================================================================================HEX_WRITER
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised while writing ASCII hex digits into a buffer.
pub enum HexWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more digits than the source type can hold.
    #[error("Cannot write more than {max} digits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
}

//==================================================================================SCALING
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised by the linear raw <-> physical conversions.
pub enum ScalingError {
    /// NaN or infinite value, or a degenerate range.
    #[error("Invalid numeric value")]
    InvalidNumericValue,
}

//==================================================================================ENCODE
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while building an outbound command.
pub enum EncodeError {
    /// Host or motor id above 127. Never truncated.
    #[error("Id out of range: host {host_id}, motor {motor_id} (max 127)")]
    IdOutOfRange { host_id: u8, motor_id: u8 },
    /// Identifier does not fit the frame kind (29 bits extended, 11 bits standard).
    #[error("Identifier {id:#x} too wide for frame kind")]
    IdentifierTooWide { id: u32 },
    /// Classic CAN carries at most eight data bytes.
    #[error("Payload too long: {len} bytes (max 8)")]
    PayloadTooLong { len: usize },
    /// NaN or infinite value supplied for a numeric field.
    #[error("Invalid numeric value")]
    InvalidNumericValue,
    /// Value outside the physical range accepted by a checked helper.
    #[error("Value out of range")]
    ValueOutOfRange,
    /// Failed while rendering hex digits.
    #[error("HexWriter error: {0}")]
    Hex(#[from] HexWriterError),
}

impl From<ScalingError> for EncodeError {
    fn from(_: ScalingError) -> Self {
        EncodeError::InvalidNumericValue
    }
}

//==================================================================================DECODE
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while decoding an inbound SLCAN line.
pub enum DecodeError {
    /// Wrong overall length, DLC mismatch or unknown marker.
    #[error("Malformed frame")]
    MalformedFrame,
    /// A byte inside a hex region is not a hex digit.
    #[error("Invalid hex digit {found:#04x} at position {position}")]
    InvalidHexDigit { position: usize, found: u8 },
    /// Standard or remote-request frame; only extended data frames are handled.
    #[error("Unsupported frame kind marker {marker:#04x}")]
    UnsupportedFrameKind { marker: u8 },
    /// Communication type without a decoder.
    #[error("Unknown communication type {0}")]
    UnknownCommunicationType(u8),
    /// Mode bits hold the reserved value 3.
    #[error("Unknown motor mode {0}")]
    UnknownMotorMode(u8),
    /// Response kind recognised but not decoded yet (device id broadcast).
    #[error("Functionality not implemented for this communication type")]
    NotImplemented,
    /// Scaling produced a non-finite value.
    #[error("Invalid numeric value")]
    InvalidNumericValue,
}

impl From<HexReaderError> for DecodeError {
    fn from(err: HexReaderError) -> Self {
        match err {
            HexReaderError::InvalidDigit { position, found } => {
                DecodeError::InvalidHexDigit { position, found }
            }
            HexReaderError::OutOfBounds { .. } | HexReaderError::TooLongForType { .. } => {
                DecodeError::MalformedFrame
            }
        }
    }
}

impl From<ScalingError> for DecodeError {
    fn from(_: ScalingError) -> Self {
        DecodeError::InvalidNumericValue
    }
}

//==================================================================================EXCHANGE
#[derive(Debug, Error)]
/// Errors encountered during a command/response exchange with a motor.
pub enum ExchangeError<E: core::fmt::Debug> {
    /// The command could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The reply could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Serial line refused or failed to write the command.
    #[error("Serial line send error: {0:?}")]
    Send(E),
    /// Serial line failed while reading the reply.
    #[error("Serial line receive error: {0:?}")]
    Receive(E),
    /// No reply before the response timeout elapsed.
    #[error("Timed out waiting for a reply")]
    Timeout,
    /// The SLCAN adapter answered with the BEL error byte.
    #[error("SLCAN adapter reported an error")]
    AdapterError,
}

//==================================================================================SUPERVISOR
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Exchange failure as handed back to supervisor clients. Serial line errors
/// are reduced to their direction so the reply stays `Copy`.
pub enum RequestError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Serial line send error")]
    Send,
    #[error("Serial line receive error")]
    Receive,
    #[error("Timed out waiting for a reply")]
    Timeout,
    #[error("SLCAN adapter reported an error")]
    AdapterError,
}

impl<E: core::fmt::Debug> From<ExchangeError<E>> for RequestError {
    fn from(err: ExchangeError<E>) -> Self {
        match err {
            ExchangeError::Encode(err) => RequestError::Encode(err),
            ExchangeError::Decode(err) => RequestError::Decode(err),
            ExchangeError::Send(_) => RequestError::Send,
            ExchangeError::Receive(_) => RequestError::Receive,
            ExchangeError::Timeout => RequestError::Timeout,
            ExchangeError::AdapterError => RequestError::AdapterError,
        }
    }
}
