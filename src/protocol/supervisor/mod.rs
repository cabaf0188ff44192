//! Motor supervisor built on top of [`MotorSession`].
//!
//! One runner owns the session (and therefore the serial line) and executes
//! the commands another task queues through a [`MotorHandle`], one exchange
//! at a time. Replies travel back on a second channel, tagged with the
//! sequence number of their request so that a reply left behind by a
//! cancelled request is never handed to the next one.
//!
//! Firmware provides the pre-allocated [`embassy_sync::channel::Channel`]
//! instances and picks the raw mutex matching its executor. No allocation is
//! performed by the library.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::core::ParameterValue;
use crate::error::{DecodeError, RequestError};
use crate::protocol::messages::commands::MotionControl;
use crate::protocol::messages::feedback::MotorFeedback;
use crate::protocol::messages::parameter::{ParameterFrame, ParameterIndex, RunMode};
use crate::protocol::messages::response::Response;
use crate::protocol::session::MotorSession;
use crate::protocol::transport::traits::serial_line::SerialLine;
use crate::protocol::transport::traits::timer::Timer;

/// Commands queued by client tasks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorCommand {
    Enable { motor_id: u8 },
    Disable { motor_id: u8 },
    ClearFault { motor_id: u8 },
    SetRunMode { motor_id: u8, mode: RunMode },
    WriteParameter {
        motor_id: u8,
        index: ParameterIndex,
        value: ParameterValue,
    },
    SetSpeedReference { motor_id: u8, speed: f32 },
    ReadParameter { motor_id: u8, index: ParameterIndex },
    MotionControl(MotionControl),
    SetMechanicalZero { motor_id: u8 },
}

/// Outcome of one queued command.
pub type MotorResult = Result<Response, RequestError>;

/// A command and the sequence number its reply will carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorRequest {
    pub sequence: u32,
    pub command: MotorCommand,
}

/// Reply queued by the runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorReply {
    pub sequence: u32,
    pub result: MotorResult,
}

//==================================================================================SERVICE
/// Service assembling the supervisor components.
pub struct MotorService<
    'a,
    M: RawMutex,
    L: SerialLine,
    T: Timer,
    const CMD_CAP: usize,
    const REPLY_CAP: usize,
> {
    session: MotorSession<'a, L, T>,
    command_channel: &'a Channel<M, MotorRequest, CMD_CAP>,
    reply_channel: &'a Channel<M, MotorReply, REPLY_CAP>,
}

impl<'a, M, L, T, const CMD_CAP: usize, const REPLY_CAP: usize>
    MotorService<'a, M, L, T, CMD_CAP, REPLY_CAP>
where
    M: RawMutex,
    L: SerialLine,
    T: Timer,
{
    pub fn new(
        session: MotorSession<'a, L, T>,
        command_channel: &'a Channel<M, MotorRequest, CMD_CAP>,
        reply_channel: &'a Channel<M, MotorReply, REPLY_CAP>,
    ) -> Self {
        Self {
            session,
            command_channel,
            reply_channel,
        }
    }

    /// Split into handle/runner components.
    pub fn into_parts(self) -> MotorServiceParts<'a, M, L, T, CMD_CAP, REPLY_CAP> {
        MotorServiceParts {
            handle: MotorHandle {
                commands: self.command_channel.sender(),
                replies: self.reply_channel.receiver(),
                next_sequence: 0,
            },
            runner: MotorRunner {
                session: self.session,
                commands: self.command_channel.receiver(),
                replies: self.reply_channel.sender(),
            },
        }
    }
}

/// Bundle returned by [`MotorService::into_parts`].
pub struct MotorServiceParts<
    'a,
    M: RawMutex,
    L: SerialLine,
    T: Timer,
    const CMD_CAP: usize,
    const REPLY_CAP: usize,
> {
    pub handle: MotorHandle<'a, M, CMD_CAP, REPLY_CAP>,
    pub runner: MotorRunner<'a, M, L, T, CMD_CAP, REPLY_CAP>,
}

//==================================================================================RUNNER
/// Runner that drives the supervisor loop.
pub struct MotorRunner<
    'a,
    M: RawMutex,
    L: SerialLine,
    T: Timer,
    const CMD_CAP: usize,
    const REPLY_CAP: usize,
> {
    session: MotorSession<'a, L, T>,
    commands: Receiver<'a, M, MotorRequest, CMD_CAP>,
    replies: Sender<'a, M, MotorReply, REPLY_CAP>,
}

impl<'a, M, L, T, const CMD_CAP: usize, const REPLY_CAP: usize>
    MotorRunner<'a, M, L, T, CMD_CAP, REPLY_CAP>
where
    M: RawMutex,
    L: SerialLine,
    T: Timer,
{
    /// Serve commands forever. Failures are replied, never fatal.
    pub async fn drive(mut self) {
        loop {
            self.serve_one().await;
        }
    }

    /// Wait for one command, execute it and queue its reply.
    pub async fn serve_one(&mut self) {
        let MotorRequest { sequence, command } = self.commands.receive().await;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "supervisor: executing #{} {}",
            sequence,
            defmt::Debug2Format(&command)
        );

        let result = execute(&mut self.session, command).await;

        if let Err(_err) = &result {
            #[cfg(feature = "defmt")]
            defmt::warn!("supervisor: command #{} failed: {}", sequence, defmt::Debug2Format(_err));
        }

        self.replies.send(MotorReply { sequence, result }).await;
    }
}

async fn execute<L: SerialLine, T: Timer>(
    session: &mut MotorSession<'_, L, T>,
    command: MotorCommand,
) -> MotorResult {
    let response = match command {
        MotorCommand::Enable { motor_id } => {
            session.enable(motor_id).await.map(Response::MotorFeedback)
        }
        MotorCommand::Disable { motor_id } => {
            session.disable(motor_id).await.map(Response::MotorFeedback)
        }
        MotorCommand::ClearFault { motor_id } => session
            .disable_clear_fault(motor_id)
            .await
            .map(Response::MotorFeedback),
        MotorCommand::SetRunMode { motor_id, mode } => session
            .set_run_mode(motor_id, mode)
            .await
            .map(Response::MotorFeedback),
        MotorCommand::WriteParameter {
            motor_id,
            index,
            value,
        } => session
            .write_parameter(motor_id, index, value)
            .await
            .map(Response::MotorFeedback),
        MotorCommand::SetSpeedReference { motor_id, speed } => session
            .set_speed_reference(motor_id, speed)
            .await
            .map(Response::MotorFeedback),
        MotorCommand::ReadParameter { motor_id, index } => session
            .read_parameter(motor_id, index)
            .await
            .map(Response::Parameter),
        MotorCommand::MotionControl(command) => session
            .motion_control(&command)
            .await
            .map(Response::MotorFeedback),
        MotorCommand::SetMechanicalZero { motor_id } => session
            .set_mechanical_zero(motor_id)
            .await
            .map(Response::MotorFeedback),
    };
    response.map_err(RequestError::from)
}

//==================================================================================HANDLE
/// Client side: queue a command and wait for its reply.
///
/// A service has exactly one handle. Tasks that need to share it wrap it in
/// an async mutex.
pub struct MotorHandle<'a, M: RawMutex, const CMD_CAP: usize, const REPLY_CAP: usize> {
    commands: Sender<'a, M, MotorRequest, CMD_CAP>,
    replies: Receiver<'a, M, MotorReply, REPLY_CAP>,
    next_sequence: u32,
}

impl<'a, M: RawMutex, const CMD_CAP: usize, const REPLY_CAP: usize>
    MotorHandle<'a, M, CMD_CAP, REPLY_CAP>
{
    /// Queue `command` and wait for its own reply.
    ///
    /// Replies to earlier requests whose futures were dropped are discarded.
    pub async fn request(&mut self, command: MotorCommand) -> MotorResult {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.commands.send(MotorRequest { sequence, command }).await;

        loop {
            let reply = self.replies.receive().await;
            if reply.sequence == sequence {
                return reply.result;
            }
            #[cfg(feature = "defmt")]
            defmt::debug!("supervisor: dropping stale reply #{}", reply.sequence);
        }
    }

    /// Run a command answered by a status report.
    pub async fn feedback(&mut self, command: MotorCommand) -> Result<MotorFeedback, RequestError> {
        match self.request(command).await? {
            Response::MotorFeedback(feedback) => Ok(feedback),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn enable(&mut self, motor_id: u8) -> Result<MotorFeedback, RequestError> {
        self.feedback(MotorCommand::Enable { motor_id }).await
    }

    pub async fn disable(&mut self, motor_id: u8) -> Result<MotorFeedback, RequestError> {
        self.feedback(MotorCommand::Disable { motor_id }).await
    }

    pub async fn read_parameter(
        &mut self,
        motor_id: u8,
        index: ParameterIndex,
    ) -> Result<ParameterFrame, RequestError> {
        match self
            .request(MotorCommand::ReadParameter { motor_id, index })
            .await?
        {
            Response::Parameter(parameter) => Ok(parameter),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &Response) -> RequestError {
    RequestError::Decode(DecodeError::UnknownCommunicationType(
        response.communication_type() as u8,
    ))
}
