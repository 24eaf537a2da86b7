//! WebSocket RCON client with a cumulative reconnect budget.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use rustwrap_core::{
    BudgetVerdict, ConsolePacket, ConsoleSink, RconConfig, RconState, ReconnectBudget, WaitClock,
    decode_frame,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, trace, warn};

use crate::notices;

/// What the client reports to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RconEvent {
    /// Handshake succeeded after waiting `elapsed`.
    Connected { elapsed: Duration },
    /// A live session failed; the client is reconnecting.
    Disconnected,
    /// The server closed a live session. Terminal.
    Closed { code: Option<u16>, reason: String },
    /// The reconnect budget ran out. Terminal.
    GaveUp { elapsed: Duration },
}

/// Handle to a running client task.
pub struct RconHandle {
    pub events: UnboundedReceiver<RconEvent>,
    pub commands: UnboundedSender<ConsolePacket>,
    pub task: JoinHandle<()>,
}

enum SessionEnd {
    /// Transport error; goes through the budget.
    Failed,
    /// Remote close while connected.
    Closed { code: Option<u16>, reason: String },
    /// Nobody is listening for events any more.
    Abandoned,
}

/// Connect loop for one RCON endpoint.
///
/// Inbound console output goes straight to the sink; lifecycle changes are
/// reported as [`RconEvent`]s. Commands queued on the handle are sent while
/// a session is live; anything still queued when a new session starts is
/// discarded.
pub struct RconClient {
    config: RconConfig,
    budget: ReconnectBudget,
    clock: WaitClock,
    state: RconState,
    sink: Arc<dyn ConsoleSink>,
    events: UnboundedSender<RconEvent>,
    commands: UnboundedReceiver<ConsolePacket>,
}

impl RconClient {
    /// Start the connect loop on a new task.
    pub fn spawn(
        config: RconConfig,
        budget: ReconnectBudget,
        sink: Arc<dyn ConsoleSink>,
    ) -> RconHandle {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let client = Self {
            config,
            budget,
            clock: WaitClock::new(),
            state: RconState::Idle,
            sink,
            events: events_tx,
            commands: commands_rx,
        };

        RconHandle {
            events,
            commands,
            task: tokio::spawn(client.run()),
        }
    }

    async fn run(mut self) {
        loop {
            self.set_state(RconState::Connecting);
            self.clock.begin(now());
            debug!(uri = %self.config.redacted_uri(), "connecting to RCON");

            let end = match connect_async(self.config.uri()).await {
                Ok((stream, _response)) => self.run_session(stream).await,
                Err(e) => {
                    debug!(error = %e, "RCON connection attempt failed");
                    SessionEnd::Failed
                }
            };

            match end {
                SessionEnd::Failed => {}
                SessionEnd::Closed { code, reason } => {
                    self.set_state(RconState::Closed);
                    let _ = self.events.send(RconEvent::Closed { code, reason });
                    return;
                }
                SessionEnd::Abandoned => return,
            }

            match self.clock.failed(now(), &self.budget) {
                BudgetVerdict::Exhausted { elapsed } => {
                    warn!(elapsed_secs = elapsed.as_secs(), "RCON reconnect budget exhausted");
                    self.set_state(RconState::Closed);
                    let _ = self.events.send(RconEvent::GaveUp { elapsed });
                    return;
                }
                BudgetVerdict::Retry { elapsed, delay } => {
                    self.sink.info(&notices::waiting(elapsed));
                    sleep(delay).await;
                }
            }
        }
    }

    async fn run_session<S>(&mut self, stream: S) -> SessionEnd
    where
        S: futures_util::Stream<Item = Result<Message, tungstenite::Error>>
            + Sink<Message, Error = tungstenite::Error>
            + Unpin,
    {
        // Must happen before `Connected` goes out, or fresh input could be lost.
        let stale = self.discard_queued_commands();
        if stale > 0 {
            warn!(stale, "discarding console commands queued before the connection dropped");
        }

        let elapsed = self.clock.connected(now());
        self.set_state(RconState::Connected);
        info!(elapsed_secs = elapsed.as_secs(), "RCON connected");
        if self.events.send(RconEvent::Connected { elapsed }).is_err() {
            return SessionEnd::Abandoned;
        }

        let (mut writer, mut reader) = stream.split();
        if send_packet(&mut writer, &ConsolePacket::status_probe()).await.is_err() {
            return self.session_failed();
        }

        loop {
            tokio::select! {
                frame = reader.next() => match frame {
                    Some(Ok(Message::Text(text))) => relay(self.sink.as_ref(), text.as_str()),
                    Some(Ok(Message::Binary(bytes))) => {
                        relay(self.sink.as_ref(), &String::from_utf8_lossy(&bytes));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame.map_or((None, String::new()), |f| {
                            (Some(u16::from(f.code)), f.reason.as_str().to_string())
                        });
                        return SessionEnd::Closed { code, reason };
                    }
                    Some(Ok(other)) => trace!(?other, "ignoring control frame"),
                    Some(Err(e)) => {
                        warn!(error = %e, "RCON transport error");
                        return self.session_failed();
                    }
                    None => {
                        return SessionEnd::Closed {
                            code: None,
                            reason: String::new(),
                        };
                    }
                },
                packet = self.commands.recv() => match packet {
                    Some(packet) => {
                        if send_packet(&mut writer, &packet).await.is_err() {
                            return self.session_failed();
                        }
                    }
                    None => {
                        let _ = writer.close().await;
                        return SessionEnd::Abandoned;
                    }
                },
            }
        }
    }

    /// Drop commands left over from a previous session.
    fn discard_queued_commands(&mut self) -> usize {
        let mut discarded = 0;
        while self.commands.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    fn session_failed(&self) -> SessionEnd {
        if self.events.send(RconEvent::Disconnected).is_err() {
            return SessionEnd::Abandoned;
        }
        SessionEnd::Failed
    }

    fn set_state(&mut self, next: RconState) {
        if !self.state.can_transition_to(next) {
            warn!(from = %self.state, to = %next, "unexpected RCON state transition");
        }
        trace!(from = %self.state, to = %next, "RCON state");
        self.state = next;
    }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

fn relay(sink: &dyn ConsoleSink, payload: &str) {
    match decode_frame(payload) {
        Ok(lines) => {
            for line in lines {
                sink.info(&line);
            }
        }
        Err(e) => sink.error(&e.to_string()),
    }
}

async fn send_packet<W>(writer: &mut W, packet: &ConsolePacket) -> Result<(), tungstenite::Error>
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let frame = match packet.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "dropping unencodable console packet");
            return Ok(());
        }
    };

    writer.send(Message::Text(frame.into())).await.map_err(|e| {
        warn!(error = %e, "failed to send RCON packet");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustwrap_core::LogLevel;
    use rustwrap_core::testing::RecordingSink;

    #[test]
    fn relay_splits_lines_and_reports_bad_json() {
        let sink = RecordingSink::new();
        relay(&sink, r#"{"Message":"a\nb"}"#);
        relay(&sink, r#"{"Message":""}"#);
        relay(&sink, "{oops");

        assert_eq!(sink.lines_at(LogLevel::Info), vec!["a", "b"]);
        let errors = sink.lines_at(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Invalid JSON received"));
    }
}
