//! Work items and their canonical identity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a clip is addressed on the platform.
///
/// Resolution to a downloader-facing identifier happens exactly once, at
/// pipeline entry, via [`ClipRef::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipRef {
    /// Public slug, resolved to a clips.twitch.tv URL.
    Slug(String),
    /// Raw clip id or full URL, passed through unchanged.
    Id(String),
}

impl ClipRef {
    /// Resolve to the identifier handed to the downloader CLI.
    pub fn resolve(&self) -> String {
        match self {
            ClipRef::Slug(slug) => format!("https://clips.twitch.tv/{}", slug),
            ClipRef::Id(id) => id.clone(),
        }
    }
}

/// One unit of batch work: a clip or a time-ranged VOD segment.
///
/// Immutable once enqueued. No two items of a batch share scratch space;
/// [`WorkItem::item_id`] is the stable name everything else hangs off.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkItem {
    /// A published clip.
    Clip {
        reference: ClipRef,
        title: String,
    },
    /// A time range cut from a VOD.
    VodSegment {
        /// 1-based position in the submitted range list.
        index: u32,
        /// Range start, compact `HHMMSS` or `HH:MM:SS`.
        start: String,
        /// Range end, same formats as `start`.
        end: String,
        vod_url: String,
    },
}

impl WorkItem {
    /// Stable identifier used for scratch naming, output naming, and
    /// outcome reporting.
    pub fn item_id(&self) -> String {
        match self {
            WorkItem::Clip { title, .. } => safe_title(title),
            WorkItem::VodSegment { index, .. } => format!("segment_{}", index),
        }
    }

    /// Human-readable name for progress lines.
    pub fn display_title(&self) -> String {
        match self {
            WorkItem::Clip { title, .. } => title.clone(),
            WorkItem::VodSegment {
                index, start, end, ..
            } => format!("segment {} ({} to {})", index, start, end),
        }
    }

    /// Name of the combined output file placed in the download directory.
    pub fn output_filename(&self) -> String {
        format!("{}_combined.mp4", self.item_id())
    }
}

/// Sanitize a clip title for use in file and directory names.
///
/// Keeps alphanumerics and spaces, drops everything else, and trims
/// trailing whitespace.
pub fn safe_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_title() {
        assert_eq!(safe_title("Hello World!"), "Hello World");
        assert_eq!(safe_title("What?! A *WIN*???"), "What A WIN");
        assert_eq!(safe_title("trailing dots... "), "trailing dots");
    }

    #[test]
    fn test_clip_ref_resolve() {
        let slug = ClipRef::Slug("FunnyClipSlug".to_string());
        assert_eq!(slug.resolve(), "https://clips.twitch.tv/FunnyClipSlug");

        let id = ClipRef::Id("https://clips.twitch.tv/abc".to_string());
        assert_eq!(id.resolve(), "https://clips.twitch.tv/abc");
    }

    #[test]
    fn test_item_id() {
        let clip = WorkItem::Clip {
            reference: ClipRef::Slug("x".to_string()),
            title: "Big Play #3".to_string(),
        };
        assert_eq!(clip.item_id(), "Big Play 3");
        assert_eq!(clip.output_filename(), "Big Play 3_combined.mp4");

        let segment = WorkItem::VodSegment {
            index: 2,
            start: "00:10:00".to_string(),
            end: "00:12:30".to_string(),
            vod_url: "https://www.twitch.tv/videos/123".to_string(),
        };
        assert_eq!(segment.item_id(), "segment_2");
    }

    #[test]
    fn test_work_item_serde() {
        let raw = r#"{"type":"clip","reference":{"slug":"abc"},"title":"T"}"#;
        let item: WorkItem = serde_json::from_str(raw).unwrap();
        assert!(matches!(item, WorkItem::Clip { .. }));

        let raw = r#"{"type":"vod_segment","index":1,"start":"001000","end":"001230","vod_url":"u"}"#;
        let item: WorkItem = serde_json::from_str(raw).unwrap();
        assert!(matches!(item, WorkItem::VodSegment { index: 1, .. }));
    }
}
