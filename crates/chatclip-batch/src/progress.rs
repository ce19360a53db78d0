//! Batch progress sink.
//!
//! Workers enqueue status lines; a single writer task drains the queue, so
//! concurrent writers never interleave partial lines and the underlying
//! output is only ever touched from one task.

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::warn;

/// Write-only handle for human-readable status lines.
///
/// Clone freely across workers; [`ProgressSink::write`] is best-effort and
/// never fails or blocks.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ProgressSink {
    /// Sink that prints each line to stdout from a dedicated writer task.
    pub fn stdout() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            let mut out = tokio::io::stdout();
            while let Some(line) = rx.recv().await {
                let mut buf = line.into_bytes();
                buf.push(b'\n');
                if let Err(e) = out.write_all(&buf).await {
                    warn!(error = %e, "Failed to write progress line");
                }
                let _ = out.flush().await;
            }
        });
        Self { tx }
    }

    /// Sink whose lines are handed back to the caller. Used in tests and
    /// by embedders that render status lines themselves.
    pub fn capture() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue one status line. A closed sink drops the line.
    pub fn write(&self, line: impl Into<String>) {
        self.tx.send(line.into()).ok();
    }
}
