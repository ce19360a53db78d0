//! Per-item outcomes and pipeline step labels.

use std::fmt;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// Terminal status of one work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Combined output was produced.
    Success,
    /// A fatal step failed; the reason is the step error's message.
    Failed { reason: String },
    /// A per-item wait bound expired before the item settled.
    TimedOut,
}

impl ItemStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ItemStatus::Failed { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, ItemStatus::TimedOut)
    }
}

/// Outcome of one submitted work item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemOutcome {
    pub item_id: String,
    pub title: String,
    pub status: ItemStatus,

    /// Final composited file, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ItemOutcome {
    pub fn success(item: &WorkItem, output: PathBuf) -> Self {
        Self {
            item_id: item.item_id(),
            title: item.display_title(),
            status: ItemStatus::Success,
            output: Some(output),
        }
    }

    pub fn failed(item: &WorkItem, reason: impl Into<String>) -> Self {
        Self {
            item_id: item.item_id(),
            title: item.display_title(),
            status: ItemStatus::Failed {
                reason: reason.into(),
            },
            output: None,
        }
    }

    pub fn timed_out(item: &WorkItem) -> Self {
        Self {
            item_id: item.item_id(),
            title: item.display_title(),
            status: ItemStatus::TimedOut,
            output: None,
        }
    }
}

/// Pipeline stages, used for progress lines and timeout labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStep {
    Downloading,
    Transcribing,
    RenderingChat,
    Combining,
    Cleanup,
}

impl ProcessingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStep::Downloading => "downloading",
            ProcessingStep::Transcribing => "transcribing",
            ProcessingStep::RenderingChat => "rendering chat",
            ProcessingStep::Combining => "combining",
            ProcessingStep::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for ProcessingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ClipRef;

    fn clip() -> WorkItem {
        WorkItem::Clip {
            reference: ClipRef::Slug("s".to_string()),
            title: "A Clip".to_string(),
        }
    }

    #[test]
    fn test_status_predicates() {
        assert!(ItemStatus::Success.is_success());
        assert!(ItemStatus::TimedOut.is_timed_out());
        assert!(ItemStatus::Failed {
            reason: "x".to_string()
        }
        .is_failed());
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = ItemOutcome::success(&clip(), PathBuf::from("/out/A Clip_combined.mp4"));
        assert!(ok.status.is_success());
        assert!(ok.output.is_some());

        let failed = ItemOutcome::failed(&clip(), "download failed");
        assert!(failed.status.is_failed());
        assert!(failed.output.is_none());
        assert_eq!(failed.item_id, "A Clip");
    }
}
