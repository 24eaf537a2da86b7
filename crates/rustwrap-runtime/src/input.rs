//! Operator input reader.

use tokio::io::AsyncRead;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::process::pump_lines;

/// Read operator input line by line on a background task.
///
/// The receiver yields each line lossily decoded and without its line
/// terminator; it closes when the input reaches EOF.
pub fn spawn_input_reader(
    input: impl AsyncRead + Unpin + Send + 'static,
) -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        pump_lines(input, "operator input", |line| {
            tx.send(String::from_utf8_lossy(&line).into_owned()).is_ok()
        })
        .await;
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_arrive_in_order_then_channel_closes() {
        let input = tokio_test::io::Builder::new()
            .read(b"help\r\nquit\n")
            .read(b"say hi")
            .build();

        let mut rx = spawn_input_reader(input);
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        assert_eq!(lines, vec!["help", "quit", "say hi"]);
    }
}
