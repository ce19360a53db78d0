//! Batch and per-item error types.

use std::time::Duration;

use thiserror::Error;

use chatclip_media::MediaError;
use chatclip_models::{ItemStatus, ProcessingStep};

/// Errors that abort a batch before any item starts. The only kind that
/// escapes [`crate::BatchScheduler::run`] as an error.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("configuration error: {0}")]
    Config(String),
}

impl BatchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Per-item failures. Converted to an [`ItemStatus`] at the pipeline
/// boundary; these never propagate out of the scheduler.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download failed: {0}")]
    Download(MediaError),

    #[error("chat render failed: {0}")]
    Render(MediaError),

    #[error("combine failed: {0}")]
    Combine(MediaError),

    #[error("{step} timed out after {timeout:?}")]
    Timeout {
        step: ProcessingStep,
        timeout: Duration,
    },
}

impl ItemError {
    pub fn download(e: MediaError) -> Self {
        Self::Download(e)
    }

    pub fn render(e: MediaError) -> Self {
        Self::Render(e)
    }

    pub fn combine(e: MediaError) -> Self {
        Self::Combine(e)
    }

    pub fn timeout(step: ProcessingStep, timeout: Duration) -> Self {
        Self::Timeout { step, timeout }
    }

    /// Whether this error is a wait-bound expiry, reported as `TimedOut`
    /// rather than `Failed`.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Fold into the status recorded on the item's outcome.
    pub fn into_status(self) -> ItemStatus {
        if self.is_timeout() {
            ItemStatus::TimedOut
        } else {
            ItemStatus::Failed {
                reason: self.to_string(),
            }
        }
    }
}
