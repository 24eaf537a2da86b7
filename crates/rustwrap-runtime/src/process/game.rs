//! The supervised game server process.

use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use rustwrap_core::StartupCommand;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::shutdown::{send_sigterm, shutdown_child};
use super::stream::{ProcessOutput, StreamKind, spawn_stream_reader};
use crate::error::RuntimeError;

/// How the game process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Exited on its own with a status code.
    Code(i32),
    /// Terminated by a signal.
    Signal(i32),
    /// The platform reported neither.
    Unknown,
}

impl ProcessExit {
    /// Whether this exit is fatal for the wrapper.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Code(code) if code != 0)
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signal(signal);
            }
        }

        Self::Unknown
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "code {code}"),
            Self::Signal(signal) => write!(f, "signal {signal}"),
            Self::Unknown => f.write_str("unknown status"),
        }
    }
}

/// Handle to the running game server.
///
/// Stdout and stderr are drained by background readers into the channel
/// passed to [`GameProcess::spawn`]. Stdin is held open but never written.
/// Dropping a handle whose process has not been reaped or released sends
/// it SIGTERM.
pub struct GameProcess {
    child: Child,
    pid: Option<u32>,
    _stdin: Option<ChildStdin>,
    finished: bool,
}

impl GameProcess {
    /// Run `command` through the platform shell.
    pub fn spawn(
        command: &StartupCommand,
        output: UnboundedSender<ProcessOutput>,
    ) -> Result<Self, RuntimeError> {
        let mut cmd = shell_command(command.as_str());
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| RuntimeError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(RuntimeError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(RuntimeError::MissingPipe("stderr"))?;
        spawn_stream_reader(stdout, StreamKind::Stdout, output.clone());
        spawn_stream_reader(stderr, StreamKind::Stderr, output);

        let pid = child.id();
        debug!(?pid, %command, "game process spawned");

        Ok(Self {
            _stdin: child.stdin.take(),
            child,
            pid,
            finished: false,
        })
    }

    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the process to exit. Cancel-safe.
    pub async fn wait(&mut self) -> io::Result<ProcessExit> {
        let status = self.child.wait().await?;
        self.finished = true;
        Ok(status.into())
    }

    /// Ask the process to stop without waiting for it.
    pub fn terminate(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }

        if cfg!(unix) {
            match self.pid {
                Some(pid) => send_sigterm(pid),
                None => Ok(()),
            }
        } else {
            self.child.start_kill()
        }
    }

    /// SIGKILL the process and reap it.
    pub async fn kill(&mut self) -> io::Result<ProcessExit> {
        if !self.finished {
            self.child.start_kill()?;
        }
        self.wait().await
    }

    /// SIGTERM, then SIGKILL once `grace` has elapsed.
    pub async fn stop(&mut self, grace: Duration) -> io::Result<ProcessExit> {
        let status = shutdown_child(&mut self.child, grace).await?;
        self.finished = true;
        Ok(status.into())
    }

    /// Give up ownership of the process without signalling it.
    pub const fn release(&mut self) {
        self.finished = true;
    }
}

impl Drop for GameProcess {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        if let Some(pid) = self.pid {
            debug!(pid, "game process dropped while running, sending SIGTERM");
            if let Err(e) = send_sigterm(pid) {
                warn!(pid, error = %e, "failed to signal game process on drop");
            }
        }
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn command(text: &str) -> StartupCommand {
        StartupCommand::from_args([text]).unwrap()
    }

    #[tokio::test]
    async fn output_is_streamed_and_exit_code_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut process = GameProcess::spawn(&command("echo out; echo err 1>&2; exit 3"), tx).unwrap();

        let exit = process.wait().await.unwrap();
        assert_eq!(exit, ProcessExit::Code(3));
        assert!(exit.is_failure());

        let mut seen = Vec::new();
        while let Some(out) = rx.recv().await {
            seen.push((out.stream, String::from_utf8(out.chunk).unwrap()));
        }
        seen.sort_by_key(|(stream, _)| stream.as_str());
        assert_eq!(
            seen,
            vec![
                (StreamKind::Stderr, "err".to_string()),
                (StreamKind::Stdout, "out".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn terminate_delivers_sigterm() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut process = GameProcess::spawn(&command("exec sleep 30"), tx).unwrap();

        process.terminate().unwrap();
        let exit = process.wait().await.unwrap();
        assert_eq!(exit, ProcessExit::Signal(15));
        assert!(!exit.is_failure());
    }

    #[tokio::test]
    async fn kill_reaps_the_process() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut process = GameProcess::spawn(&command("exec sleep 30"), tx).unwrap();

        assert_eq!(process.kill().await.unwrap(), ProcessExit::Signal(9));
    }

    #[test]
    fn exit_display() {
        assert_eq!(ProcessExit::Code(2).to_string(), "code 2");
        assert_eq!(ProcessExit::Signal(9).to_string(), "signal 9");
        assert!(!ProcessExit::Code(0).is_failure());
    }
}
