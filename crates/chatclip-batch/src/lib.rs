//! Bounded-concurrency batch processing of clips and VOD segments.
//!
//! This crate provides:
//! - The batch scheduler (bounded worker pool, batch deadline, outcome map)
//! - The per-item pipeline (download, transcribe/render, combine, cleanup)
//! - A separately bounded render pool
//! - Profanity detection over transcription output
//! - A single-writer progress sink for status lines

pub mod config;
pub mod error;
pub mod pipeline;
pub mod profanity;
pub mod progress;
pub mod render_pool;
pub mod scheduler;

pub use config::BatchConfig;
pub use error::{BatchError, ItemError};
pub use pipeline::PipelineContext;
pub use profanity::{ProfanityDetector, DEFAULT_PATTERNS};
pub use progress::ProgressSink;
pub use render_pool::{RenderPool, DEFAULT_RENDER_WORKERS};
pub use scheduler::{BatchReport, BatchScheduler};
