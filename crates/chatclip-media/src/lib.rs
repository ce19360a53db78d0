//! External tool boundary for ChatClip.
//!
//! This crate provides:
//! - Type-safe command building and running for the downloader CLI and FFmpeg
//! - Clip, chat, and VOD segment downloads
//! - Chat overlay rendering
//! - Filter-graph builders for the combine step (overlay placement, muting)
//! - A transcription service client with word-level timestamps
//! - The [`ClipTools`] trait the batch layer consumes

pub mod combine;
pub mod command;
pub mod download;
pub mod error;
pub mod filters;
pub mod render;
pub mod tools;
pub mod transcribe;

pub use command::{check_ffmpeg, check_twitch_cli, ToolCommand, ToolRunner, FFMPEG, TWITCH_CLI};
pub use error::{MediaError, MediaResult};
pub use filters::{build_combine_filter, build_mute_filter, build_overlay_filter, AUDIO_PASSTHROUGH};
pub use tools::{CliTools, ClipTools};
pub use transcribe::{TranscriberClient, TranscriptWord};
