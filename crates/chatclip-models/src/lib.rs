//! Shared data models for ChatClip.
//!
//! This crate provides Serde-serializable types for:
//! - Work items (clips and VOD segments) and their canonical identity
//! - Chat overlay geometry and the persisted settings snapshot
//! - Mute intervals derived from transcription
//! - Per-item processing outcomes

pub mod item;
pub mod mute;
pub mod outcome;
pub mod settings;
pub mod timestamp;

// Re-export common types
pub use item::{safe_title, ClipRef, WorkItem};
pub use mute::MuteInterval;
pub use outcome::{ItemOutcome, ItemStatus, ProcessingStep};
pub use settings::{
    ChatOverlaySettings, PixelRect, Settings, SettingsError, REFERENCE_HEIGHT, REFERENCE_WIDTH,
};
pub use timestamp::{format_compact_time, is_valid_compact_time, normalize_time};
