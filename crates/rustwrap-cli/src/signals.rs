//! Shutdown signal wiring.

use std::io;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancel `token` on Ctrl-C, and on SIGTERM where available.
///
/// The SIGTERM handler is registered before returning so a signal arriving
/// right after startup is not lost.
pub fn cancel_on_shutdown_signal(token: CancellationToken) -> io::Result<()> {
    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received Ctrl-C"),
            _ = sigterm.recv() => info!("received SIGTERM"),
        }

        #[cfg(not(unix))]
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl-C");
        }

        token.cancel();
    });

    Ok(())
}
