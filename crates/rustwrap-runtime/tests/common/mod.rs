//! Shared helpers for runtime integration tests.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rustwrap_core::testing::RecordingSink;
use rustwrap_core::{RconConfig, ReconnectBudget};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

/// Poll the sink until a line containing `needle` shows up.
pub async fn wait_for(sink: &RecordingSink, needle: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while sink.count_containing(needle) == 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {needle:?}; sink has {:?}",
            sink.entries()
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Poll the sink until `count` lines contain `needle`.
pub async fn wait_for_count(sink: &RecordingSink, needle: &str, count: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while sink.count_containing(needle) < count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {count} x {needle:?}; sink has {:?}",
            sink.entries()
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Receive with a generous real-time limit so a broken test fails instead of hanging.
pub async fn recv<T>(rx: &mut UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting on channel")
        .expect("channel closed")
}

/// A port nothing is listening on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn rcon_config(port: u16) -> RconConfig {
    RconConfig::new("127.0.0.1", Some(port.to_string()), Some("secret".into()))
}

pub const fn budget(max_wait: Duration, retry_delay: Duration) -> ReconnectBudget {
    ReconnectBudget {
        max_wait,
        retry_delay,
    }
}

pub enum ServerAction {
    Send(String),
    Close,
}

/// How one of the connections before the served one ends.
#[derive(Debug, Clone, Copy)]
pub enum EarlyDrop {
    /// TCP is accepted and closed before the WebSocket handshake.
    BeforeHandshake,
    /// The handshake completes, the first frame is read, then TCP is
    /// dropped without a close frame.
    AfterFirstFrame,
}

/// Fake RCON endpoint. Connections listed in the drop script are cut short
/// in order; the next one is served until closed.
pub struct FakeRcon {
    pub port: u16,
    /// Text frames received from the client, across all connections.
    pub frames: UnboundedReceiver<String>,
    pub actions: UnboundedSender<ServerAction>,
}

impl FakeRcon {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener)
    }

    pub fn serve(listener: TcpListener) -> Self {
        Self::serve_after_drops(listener, Vec::new())
    }

    pub fn serve_after_drops(listener: TcpListener, drops: Vec<EarlyDrop>) -> Self {
        let port = listener.local_addr().unwrap().port();
        let (frames_tx, frames) = mpsc::unbounded_channel();
        let (actions, mut actions_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for drop_kind in drops {
                let (tcp, _) = listener.accept().await.unwrap();
                match drop_kind {
                    EarlyDrop::BeforeHandshake => drop(tcp),
                    EarlyDrop::AfterFirstFrame => {
                        let mut ws = accept_async(tcp).await.unwrap();
                        if let Some(Ok(Message::Text(text))) = ws.next().await {
                            let _ = frames_tx.send(text.as_str().to_string());
                        }
                        drop(ws);
                    }
                }
            }

            let (tcp, _) = listener.accept().await.unwrap();
            let ws = accept_async(tcp).await.unwrap();
            let (mut write, mut read) = ws.split();

            loop {
                tokio::select! {
                    msg = read.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            let _ = frames_tx.send(text.as_str().to_string());
                        }
                        Some(Ok(_)) => {}
                        _ => break,
                    },
                    action = actions_rx.recv() => match action {
                        Some(ServerAction::Send(text)) => {
                            write.send(Message::Text(text.into())).await.unwrap();
                        }
                        Some(ServerAction::Close) | None => {
                            let _ = write
                                .send(Message::Close(Some(CloseFrame {
                                    code: CloseCode::Normal,
                                    reason: "bye".into(),
                                })))
                                .await;
                            break;
                        }
                    },
                }
            }
        });

        Self {
            port,
            frames,
            actions,
        }
    }

    pub fn send(&self, text: &str) {
        self.actions.send(ServerAction::Send(text.to_string())).unwrap();
    }

    pub fn close(&self) {
        self.actions.send(ServerAction::Close).unwrap();
    }

    pub async fn next_frame(&mut self) -> serde_json::Value {
        let frame = recv(&mut self.frames).await;
        serde_json::from_str(&frame).unwrap()
    }
}
