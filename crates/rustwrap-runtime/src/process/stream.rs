//! Async line readers (non-UTF8-safe).
//!
//! The dedicated server can emit non-UTF8 bytes on stdout/stderr, and
//! `BufReader::lines()` would end the reader task on the first bad byte.
//! These readers split on raw `\n` and leave decoding to the consumer.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

/// Which of the child's output streams a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// One line of raw child output, newline stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stream: StreamKind,
    pub chunk: Vec<u8>,
}

/// Forward each line of a child output stream into `tx`.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    tx: UnboundedSender<ProcessOutput>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        pump_lines(stream, kind.as_str(), |chunk| {
            tx.send(ProcessOutput {
                stream: kind,
                chunk,
            })
            .is_ok()
        })
        .await;
    })
}

/// Read `stream` line by line until EOF, a read error, or `deliver` returns false.
pub(crate) async fn pump_lines<R, F>(stream: R, label: &'static str, mut deliver: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(Vec<u8>) -> bool,
{
    let mut reader = BufReader::new(stream);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                // Trim trailing newline(s)
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }

                if !deliver(buf.clone()) {
                    debug!(%label, "line receiver dropped");
                    break;
                }
            }
            Err(e) => {
                debug!(%label, error = %e, "line reader exiting due to read error");
                break;
            }
        }
    }

    debug!(%label, "line reader task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn lines_are_reassembled_across_reads() {
        let stream = tokio_test::io::Builder::new()
            .read(b"Loading Prefab Bundle 10%\nLoading Pre")
            .read(b"fab Bundle 20%\r\n")
            .read(b"\xffraw\n")
            .read(b"no newline at eof")
            .build();

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_stream_reader(stream, StreamKind::Stderr, tx)
            .await
            .unwrap();

        let mut chunks = Vec::new();
        while let Some(out) = rx.recv().await {
            assert_eq!(out.stream, StreamKind::Stderr);
            chunks.push(out.chunk);
        }

        assert_eq!(
            chunks,
            vec![
                b"Loading Prefab Bundle 10%".to_vec(),
                b"Loading Prefab Bundle 20%".to_vec(),
                b"\xffraw".to_vec(),
                b"no newline at eof".to_vec(),
            ]
        );
    }

    #[tokio::test]
    async fn reader_stops_when_receiver_is_gone() {
        let stream = tokio_test::io::Builder::new()
            .read(b"one\n")
            .build();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        spawn_stream_reader(stream, StreamKind::Stdout, tx)
            .await
            .unwrap();
    }
}
