//! Signal delivery and graceful SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use tokio::time::timeout;
#[cfg(unix)]
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Send SIGTERM to `pid`. A process that is already gone is not an error.
#[cfg(unix)]
pub fn send_sigterm(pid: u32) -> io::Result<()> {
    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::other(e)),
    }
}

#[cfg(not(unix))]
pub fn send_sigterm(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "graceful termination is not available on this platform",
    ))
}

/// Gracefully shut down a child process, escalating to SIGKILL if needed.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to `grace` for the process to exit
/// 2. If still running, send SIGKILL
/// 3. Wait for reaping (required to avoid zombies)
///
/// On non-unix platforms the child is killed immediately.
pub async fn shutdown_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        let Some(pid) = child.id() else {
            // Already reaped
            return child.wait().await;
        };

        send_sigterm(pid)?;

        if let Ok(result) = timeout(grace, child.wait()).await {
            return result;
        }

        debug!(pid, grace_secs = grace.as_secs(), "grace period elapsed, sending SIGKILL");
    }

    #[cfg(not(unix))]
    let _ = grace;

    child.kill().await?;
    child.wait().await
}
