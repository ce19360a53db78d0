//! Mute intervals derived from transcription.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A time range, in milliseconds, whose audio gets silenced in the
/// combined output.
///
/// An empty interval list is a valid "nothing to mute" result, never an
/// error. Intervals are not merged: overlapping ranges silence the same
/// span more than once, which is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MuteInterval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl MuteInterval {
    /// Create an interval. `end_ms` is raised to `start_ms` if the service
    /// returned a degenerate range, keeping `start <= end`.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self {
            start_ms,
            end_ms: end_ms.max(start_ms),
        }
    }

    pub fn start_sec(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    pub fn end_sec(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_conversion() {
        let interval = MuteInterval::new(2000, 3500);
        assert_eq!(interval.start_sec(), 2.0);
        assert_eq!(interval.end_sec(), 3.5);
    }

    #[test]
    fn test_degenerate_range_clamped() {
        let interval = MuteInterval::new(4000, 1000);
        assert_eq!(interval.start_ms, 4000);
        assert_eq!(interval.end_ms, 4000);
    }
}
