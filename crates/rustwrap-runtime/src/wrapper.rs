//! The event loop tying the game process, operator input and RCON together.
//!
//! A single task owns every piece of mutable state. Output chunks, input
//! lines and RCON events arrive over channels and are handled one at a time,
//! so switching console ownership from the local filter to RCON is a plain
//! assignment that no other event can observe half-done.

use std::sync::Arc;
use std::time::Duration;

use rustwrap_core::{
    ConsolePacket, ConsoleSink, LocalCommand, OutputFilter, RconConfig, ReconnectBudget,
    StartupCommand, not_connected_notice,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, timeout_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::notices;
use crate::process::{GameProcess, ProcessExit, ProcessOutput};
use crate::rcon::{RconClient, RconEvent, RconHandle};

/// Default time the game gets to exit after SIGTERM before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Total time spent reading buffered output once the game has exited.
/// Background jobs of the game can keep the pipes open indefinitely.
const OUTPUT_DRAIN: Duration = Duration::from_millis(200);

/// Everything needed to run one game server.
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    pub command: StartupCommand,
    pub rcon: RconConfig,
    pub budget: ReconnectBudget,
    pub shutdown_grace: Duration,
}

impl WrapperConfig {
    pub fn new(command: StartupCommand, rcon: RconConfig) -> Self {
        Self {
            command,
            rcon,
            budget: ReconnectBudget::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

/// Why the wrapper stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperExit {
    /// The game exited with status 0 or was stopped by a signal.
    ProcessStopped,
    /// The game exited with a non-zero status.
    ProcessFailed(i32),
    /// RCON closed a live session.
    RconClosed,
    /// RCON never came up within the reconnect budget.
    RconTimeout,
    /// Shutdown was requested from outside.
    Shutdown,
    /// The game could not be started.
    SpawnFailed,
}

impl WrapperExit {
    /// Process exit status for this outcome.
    pub const fn code(self) -> i32 {
        match self {
            Self::ProcessFailed(code) => code,
            Self::RconTimeout | Self::SpawnFailed => 1,
            Self::ProcessStopped | Self::RconClosed | Self::Shutdown => 0,
        }
    }
}

/// Who currently interprets operator input and game output.
enum ConsoleRoute {
    /// Before the first handshake: output goes through the filter, input
    /// only understands `quit`.
    Local(OutputFilter),
    /// After the first handshake: input becomes RCON commands and game
    /// output is discarded, since RCON echoes it.
    Remote {
        commands: UnboundedSender<ConsolePacket>,
        online: bool,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum InputOutcome {
    Handled,
    Quit,
}

impl ConsoleRoute {
    fn connected(&mut self, commands: &UnboundedSender<ConsolePacket>) {
        match self {
            Self::Local(_) => {
                debug!("handing console over to RCON");
                *self = Self::Remote {
                    commands: commands.clone(),
                    online: true,
                };
            }
            Self::Remote { online, .. } => *online = true,
        }
    }

    fn disconnected(&mut self) {
        if let Self::Remote { online, .. } = self {
            *online = false;
        }
    }

    const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    fn on_output(&mut self, output: &ProcessOutput, sink: &dyn ConsoleSink) {
        match self {
            Self::Local(filter) => filter.forward(&output.chunk, sink),
            Self::Remote { .. } => {
                trace!(stream = output.stream.as_str(), "discarding game output");
            }
        }
    }

    fn on_input(&self, line: &str, sink: &dyn ConsoleSink) -> InputOutcome {
        match self {
            Self::Local(_) => match LocalCommand::parse(line) {
                LocalCommand::Quit => return InputOutcome::Quit,
                LocalCommand::Rejected(command) => sink.info(&not_connected_notice(&command)),
            },
            Self::Remote { online: false, .. } => sink.warn(notices::RECONNECTING_INPUT_DROPPED),
            Self::Remote {
                commands,
                online: true,
            } => {
                let command = line.trim();
                sink.info(&notices::transmitting(command));
                if commands.send(ConsolePacket::command(command)).is_err() {
                    warn!("RCON client is gone, console input dropped");
                }
            }
        }
        InputOutcome::Handled
    }
}

enum LoopEvent {
    Shutdown,
    ProcessExited(std::io::Result<ProcessExit>),
    Output(Option<ProcessOutput>),
    Input(Option<String>),
    Rcon(RconEvent),
}

/// Supervises one game process and its RCON console.
pub struct Wrapper {
    config: WrapperConfig,
    sink: Arc<dyn ConsoleSink>,
}

impl Wrapper {
    pub fn new(config: WrapperConfig, sink: Arc<dyn ConsoleSink>) -> Self {
        Self { config, sink }
    }

    /// Run until the game exits, RCON ends the session, or `shutdown` fires.
    ///
    /// `input` carries operator console lines; it may close at any time
    /// without affecting the game.
    pub async fn run(
        self,
        mut input: UnboundedReceiver<String>,
        shutdown: CancellationToken,
    ) -> WrapperExit {
        let sink = self.sink.as_ref();
        sink.info(notices::STARTING);

        let (output_tx, mut output) = mpsc::unbounded_channel();
        let mut process = match GameProcess::spawn(&self.config.command, output_tx) {
            Ok(process) => process,
            Err(e) => {
                sink.error(&e.to_string());
                return WrapperExit::SpawnFailed;
            }
        };
        info!(pid = ?process.pid(), "game process started");

        let RconHandle {
            events: mut rcon_events,
            commands,
            task: rcon_task,
        } = RconClient::spawn(
            self.config.rcon.clone(),
            self.config.budget,
            Arc::clone(&self.sink),
        );

        let mut route = ConsoleRoute::Local(OutputFilter::new());
        let mut output_open = true;
        let mut input_open = true;

        let exit = loop {
            let event = tokio::select! {
                () = shutdown.cancelled() => LoopEvent::Shutdown,
                status = process.wait() => LoopEvent::ProcessExited(status),
                chunk = output.recv(), if output_open => LoopEvent::Output(chunk),
                line = input.recv(), if input_open => LoopEvent::Input(line),
                Some(event) = rcon_events.recv() => LoopEvent::Rcon(event),
            };

            match event {
                LoopEvent::Shutdown => {
                    sink.error(notices::STOP_REQUESTED);
                    match process.stop(self.config.shutdown_grace).await {
                        Ok(exit) => debug!(%exit, "game process stopped"),
                        Err(e) => warn!(error = %e, "failed to stop game process"),
                    }
                    break WrapperExit::Shutdown;
                }
                LoopEvent::ProcessExited(status) => {
                    if !route.is_remote() {
                        drain_output(&mut output, &mut route, sink).await;
                    }
                    break process_exit(status, sink);
                }
                LoopEvent::Output(Some(chunk)) => route.on_output(&chunk, sink),
                LoopEvent::Output(None) => output_open = false,
                LoopEvent::Input(Some(line)) => {
                    if route.on_input(&line, sink) == InputOutcome::Quit {
                        debug!("quit requested before RCON connected");
                        if let Err(e) = process.terminate() {
                            warn!(error = %e, "failed to signal game process");
                        }
                    }
                }
                LoopEvent::Input(None) => {
                    debug!("operator input closed");
                    input_open = false;
                }
                LoopEvent::Rcon(RconEvent::Connected { elapsed }) => {
                    route.connected(&commands);
                    sink.info(&notices::connected(elapsed));
                }
                LoopEvent::Rcon(RconEvent::Disconnected) => route.disconnected(),
                LoopEvent::Rcon(RconEvent::Closed { code, reason }) => {
                    info!("{}", notices::closed_with(code, &reason));
                    sink.error(notices::CONNECTION_CLOSED);
                    process.release();
                    break WrapperExit::RconClosed;
                }
                LoopEvent::Rcon(RconEvent::GaveUp { elapsed }) => {
                    debug!(elapsed_secs = elapsed.as_secs(), "giving up on RCON");
                    sink.error(&notices::gave_up(self.config.budget.max_wait));
                    if let Err(e) = process.kill().await {
                        warn!(error = %e, "failed to kill game process");
                    }
                    break WrapperExit::RconTimeout;
                }
            }
        };

        rcon_task.abort();
        exit
    }
}

async fn drain_output(
    output: &mut UnboundedReceiver<ProcessOutput>,
    route: &mut ConsoleRoute,
    sink: &dyn ConsoleSink,
) {
    let deadline = Instant::now() + OUTPUT_DRAIN;
    while let Ok(Some(chunk)) = timeout_at(deadline, output.recv()).await {
        route.on_output(&chunk, sink);
    }
}

fn process_exit(status: std::io::Result<ProcessExit>, sink: &dyn ConsoleSink) -> WrapperExit {
    match status {
        Ok(exit @ ProcessExit::Code(code)) if exit.is_failure() => {
            sink.error(&notices::process_exited(exit));
            WrapperExit::ProcessFailed(code)
        }
        Ok(exit) => {
            sink.info(&notices::process_exited(exit));
            WrapperExit::ProcessStopped
        }
        Err(e) => {
            sink.error(&format!("Failed to wait for the game process: {e}"));
            WrapperExit::ProcessFailed(1)
        }
    }
}
