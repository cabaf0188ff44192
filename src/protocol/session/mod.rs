//! Command/response exchanges with CyberGear motors over an SLCAN adapter.
//!
//! A [`MotorSession`] borrows a [`SerialLine`] and a [`Timer`] and runs one
//! exchange at a time:
//! 1. Render the command and write it with its `\r` terminator.
//! 2. Read lines until the expected reply arrives or the response timeout
//!    elapses, skipping transmit acknowledgements (`z`/`Z`) and traffic that
//!    is not a CyberGear reply.
//! 3. Report the adapter `BEL` byte as [`ExchangeError::AdapterError`].
use crate::core::{ParameterValue, SlcanBytes};
use crate::error::{DecodeError, ExchangeError};
use crate::infra::codec::traits::FrameEncode;
use crate::protocol::messages::commands::{
    self, Disable, Enable, MotionControl, ReadParameter, SetCanId, SetMechanicalZero,
};
use crate::protocol::messages::feedback::MotorFeedback;
use crate::protocol::messages::parameter::{ParameterFrame, ParameterIndex, RunMode};
use crate::protocol::messages::response::{decode_response, Response, CYBERGEAR_FRAME_LEN};
use crate::protocol::transport::slcan::{self, Bitrate, SlcanCommand};
use crate::protocol::transport::traits::serial_line::SerialLine;
use crate::protocol::transport::traits::timer::Timer;
use crate::protocol::transport::{ADAPTER_ERROR, LINE_TERMINATOR, MAX_LINE_LEN, RESPONSE_TIMEOUT_MS};
use futures_util::future::{select, Either};
use futures_util::pin_mut;

/// Host id used when none is configured.
pub const DEFAULT_HOST_ID: u8 = 0x00;

//==================================================================================CONFIG
/// Per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Id placed in bits 8-15 of every command.
    pub host_id: u8,
    /// How long an exchange waits for its reply.
    pub response_timeout_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host_id: DEFAULT_HOST_ID,
            response_timeout_ms: RESPONSE_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    pub fn with_host_id(mut self, host_id: u8) -> Self {
        self.host_id = host_id;
        self
    }

    pub fn with_response_timeout_ms(mut self, response_timeout_ms: u32) -> Self {
        self.response_timeout_ms = response_timeout_ms;
        self
    }
}

//==================================================================================SESSION
/// Host side of the conversation with one or more motors on the same adapter.
pub struct MotorSession<'a, L: SerialLine, T: Timer> {
    line: &'a mut L,
    timer: &'a mut T,
    config: SessionConfig,
}

type Exchange<L, R> = Result<R, ExchangeError<<L as SerialLine>::Error>>;

impl<'a, L: SerialLine, T: Timer> MotorSession<'a, L, T> {
    pub fn new(line: &'a mut L, timer: &'a mut T, config: SessionConfig) -> Self {
        Self {
            line,
            timer,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Select the bus bitrate, then open the adapter channel.
    pub async fn open_channel(&mut self, bitrate: Bitrate) -> Exchange<L, ()> {
        #[cfg(feature = "defmt")]
        defmt::info!("session: opening channel at {}", bitrate);

        self.adapter_command(SlcanCommand::SetBitrate(bitrate)).await?;
        self.adapter_command(SlcanCommand::Open).await
    }

    pub async fn close_channel(&mut self) -> Exchange<L, ()> {
        #[cfg(feature = "defmt")]
        defmt::info!("session: closing channel");

        self.adapter_command(SlcanCommand::Close).await
    }

    pub async fn enable(&mut self, motor_id: u8) -> Exchange<L, MotorFeedback> {
        let command = Enable {
            host_id: self.config.host_id,
            motor_id,
        };
        self.command_feedback(&command, motor_id).await
    }

    pub async fn disable(&mut self, motor_id: u8) -> Exchange<L, MotorFeedback> {
        let command = Disable {
            host_id: self.config.host_id,
            motor_id,
            clear_fault: false,
        };
        self.command_feedback(&command, motor_id).await
    }

    /// Disable the motor and clear its latched faults.
    pub async fn disable_clear_fault(&mut self, motor_id: u8) -> Exchange<L, MotorFeedback> {
        let command = Disable {
            host_id: self.config.host_id,
            motor_id,
            clear_fault: true,
        };
        self.command_feedback(&command, motor_id).await
    }

    pub async fn set_run_mode(&mut self, motor_id: u8, mode: RunMode) -> Exchange<L, MotorFeedback> {
        let line = commands::encode_set_run_mode(self.config.host_id, motor_id, mode)?;
        self.exchange(&line, Some(motor_id), feedback_from(motor_id)).await
    }

    pub async fn write_parameter(
        &mut self,
        motor_id: u8,
        index: ParameterIndex,
        value: ParameterValue,
    ) -> Exchange<L, MotorFeedback> {
        let line = commands::encode_write_parameter(self.config.host_id, motor_id, index, value)?;
        self.exchange(&line, Some(motor_id), feedback_from(motor_id)).await
    }

    /// Speed-mode set-point, checked against [-30, 30] rad/s before sending.
    pub async fn set_speed_reference(
        &mut self,
        motor_id: u8,
        speed: f32,
    ) -> Exchange<L, MotorFeedback> {
        let line = commands::encode_set_speed_reference(self.config.host_id, motor_id, speed)?;
        self.exchange(&line, Some(motor_id), feedback_from(motor_id)).await
    }

    /// Read one parameter; replies for other motors or indices are skipped.
    pub async fn read_parameter(
        &mut self,
        motor_id: u8,
        index: ParameterIndex,
    ) -> Exchange<L, ParameterFrame> {
        let command = ReadParameter {
            host_id: self.config.host_id,
            motor_id,
            index,
        };
        let line = command.to_slcan()?;
        self.exchange(&line, Some(motor_id), |response| match response {
            Response::Parameter(parameter)
                if parameter.motor_id == motor_id && parameter.parameter_index == index =>
            {
                Some(parameter)
            }
            _ => None,
        })
        .await
    }

    pub async fn motion_control(&mut self, command: &MotionControl) -> Exchange<L, MotorFeedback> {
        self.command_feedback(command, command.motor_id).await
    }

    pub async fn set_mechanical_zero(&mut self, motor_id: u8) -> Exchange<L, MotorFeedback> {
        let command = SetMechanicalZero {
            host_id: self.config.host_id,
            motor_id,
        };
        self.command_feedback(&command, motor_id).await
    }

    /// Move a motor to `new_id`. The motor answers with a device id broadcast,
    /// which is not decoded, so nothing is awaited.
    pub async fn set_can_id(&mut self, motor_id: u8, new_id: u8) -> Exchange<L, ()> {
        let command = SetCanId {
            host_id: self.config.host_id,
            motor_id,
            new_id,
        };
        self.send(&command).await
    }

    /// Send any command without waiting for a reply.
    pub async fn send(&mut self, command: &impl FrameEncode) -> Exchange<L, ()> {
        let line = command.to_slcan()?;
        self.write(&line).await
    }

    /// Send a pre-rendered line and return the first CyberGear reply.
    pub async fn request(&mut self, line: &SlcanBytes) -> Exchange<L, Response> {
        self.exchange(line, None, Some).await
    }

    //==============================================================================INTERNALS
    async fn command_feedback(
        &mut self,
        command: &impl FrameEncode,
        motor_id: u8,
    ) -> Exchange<L, MotorFeedback> {
        let line = command.to_slcan()?;
        self.exchange(&line, Some(motor_id), feedback_from(motor_id)).await
    }

    async fn adapter_command(&mut self, command: SlcanCommand) -> Exchange<L, ()> {
        self.write(&command.encode()).await?;
        // The adapter confirms with a bare terminator.
        self.read_until(|line| Ok(strip_terminator(line).is_empty().then_some(())))
            .await
    }

    /// Send `line` and wait for the reply `pick` accepts. With `source` set,
    /// frames from other motors are skipped before their payload is decoded.
    async fn exchange<R>(
        &mut self,
        line: &SlcanBytes,
        source: Option<u8>,
        mut pick: impl FnMut(Response) -> Option<R>,
    ) -> Exchange<L, R> {
        self.write(line).await?;
        self.read_until(|received| {
            if is_acknowledgement(received) {
                return Ok(None);
            }
            if received.len() != CYBERGEAR_FRAME_LEN {
                // Valid SLCAN of another shape is someone else's traffic.
                return match slcan::decode(strip_terminator(received)) {
                    Ok(_) | Err(DecodeError::UnsupportedFrameKind { .. }) => Ok(None),
                    Err(err) => Err(err.into()),
                };
            }
            if source.is_some_and(|motor_id| from_other_motor(received, motor_id)) {
                #[cfg(feature = "defmt")]
                defmt::trace!("session: skipping {=[u8]:a}", received);
                return Ok(None);
            }
            match decode_response(received) {
                Ok(response) => Ok(pick(response)),
                // Other traffic sharing the bus.
                Err(
                    DecodeError::UnsupportedFrameKind { .. }
                    | DecodeError::UnknownCommunicationType(_)
                    | DecodeError::NotImplemented,
                ) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("session: skipping {=[u8]:a}", received);
                    Ok(None)
                }
                Err(err) => Err(err.into()),
            }
        })
        .await
    }

    async fn write(&mut self, line: &SlcanBytes) -> Exchange<L, ()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("session: -> {=[u8]:a}", line.as_slice());

        let mut buffer = [0u8; MAX_LINE_LEN];
        let len = line.len();
        buffer[..len].copy_from_slice(line.as_slice());
        buffer[len] = LINE_TERMINATOR;
        self.line
            .write_line(&buffer[..=len])
            .await
            .map_err(ExchangeError::Send)
    }

    /// Read lines until `pick` accepts one, all within one response timeout.
    async fn read_until<R>(
        &mut self,
        mut pick: impl FnMut(&[u8]) -> Exchange<L, Option<R>>,
    ) -> Exchange<L, R> {
        let delay = self.timer.delay_ms(self.config.response_timeout_ms);
        pin_mut!(delay);
        let mut buffer = [0u8; MAX_LINE_LEN];

        loop {
            let len = {
                let read = self.line.read_line(&mut buffer);
                pin_mut!(read);
                match select(delay.as_mut(), read).await {
                    Either::Left(_) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!(
                            "session: no reply after {} ms",
                            self.config.response_timeout_ms
                        );
                        return Err(ExchangeError::Timeout);
                    }
                    Either::Right((received, _)) => received.map_err(ExchangeError::Receive)?,
                }
            };

            let received = buffer
                .get(..len)
                .ok_or(ExchangeError::Decode(DecodeError::MalformedFrame))?;
            if received.first() == Some(&ADAPTER_ERROR) {
                #[cfg(feature = "defmt")]
                defmt::error!("session: adapter reported an error");
                return Err(ExchangeError::AdapterError);
            }
            if let Some(found) = pick(received)? {
                return Ok(found);
            }
        }
    }
}

fn feedback_from(motor_id: u8) -> impl FnMut(Response) -> Option<MotorFeedback> {
    move |response| match response {
        Response::MotorFeedback(feedback) if feedback.motor_id == motor_id => Some(feedback),
        _ => None,
    }
}

/// Extended frame whose sender (bits 8-15) is not `motor_id`.
fn from_other_motor(line: &[u8], motor_id: u8) -> bool {
    slcan::decode(strip_terminator(line))
        .ok()
        .and_then(|frame| frame.cybergear_id())
        .is_some_and(|id| id.source_id() != motor_id)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    line.strip_suffix(&[LINE_TERMINATOR]).unwrap_or(line)
}

/// `z`/`Z` transmit confirmations and bare terminators.
fn is_acknowledgement(line: &[u8]) -> bool {
    matches!(strip_terminator(line), b"" | b"z" | b"Z")
}
