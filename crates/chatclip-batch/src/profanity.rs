//! Profanity detection over transcription output.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

use chatclip_media::{ClipTools, TranscriptWord};
use chatclip_models::MuteInterval;

use crate::progress::ProgressSink;

/// Default profanity patterns.
///
/// Censor-character tolerant (`f*ck` still matches) and applied
/// case-insensitively to each transcribed word. The set is configuration:
/// pass a different one to [`ProfanityDetector::new`] to change policy.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"\bf[u\*]+ck",
    r"\bsh[i\*]+t",
    r"\bd[a\*]+mn",
    r"\bb[i\*]+tch",
    r"\ba[s\*]+",
    r"\bmotherfuck",
    r"\bretard(?:s|ed)?",
    r"\bcunts?",
    r"\bd[i\*]+ck",
    r"\bp[e\*]+nis",
];

/// Scans transcribed words for profanity and emits mute intervals.
///
/// Detection is advisory: every failure path degrades to an empty
/// interval list and never fails the item.
pub struct ProfanityDetector {
    pattern: Option<Regex>,
}

impl Default for ProfanityDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS).expect("default profanity patterns are valid")
    }
}

impl ProfanityDetector {
    /// Build a detector from regex pattern sources. An empty set matches
    /// nothing.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sources: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        if sources.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&sources.join("|"))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Pure scan: word order in, monotonic interval order out. Identical
    /// input yields identical output.
    pub fn scan(&self, words: &[TranscriptWord]) -> Vec<MuteInterval> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        words
            .iter()
            .filter(|word| pattern.is_match(&word.text))
            .map(|word| MuteInterval::new(word.start_ms, word.end_ms))
            .collect()
    }

    /// Transcribe `media` and scan the words.
    ///
    /// Service failures are logged and reported to the sink, then
    /// swallowed: the item proceeds with nothing muted.
    pub async fn detect(
        &self,
        tools: &dyn ClipTools,
        media: &Path,
        progress: &ProgressSink,
        label: &str,
    ) -> Vec<MuteInterval> {
        progress.write(format!("Transcribing audio: {}", label));
        match tools.transcribe(media).await {
            Ok(words) => {
                let intervals = self.scan(&words);
                if !intervals.is_empty() {
                    info!(
                        item = %label,
                        intervals = intervals.len(),
                        "Profanity intervals detected"
                    );
                }
                intervals
            }
            Err(e) => {
                warn!(item = %label, error = %e, "Transcription failed, muting disabled for this item");
                progress.write(format!("Transcription failed for {}: {}", label, e));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start_ms: u64, end_ms: u64) -> TranscriptWord {
        TranscriptWord {
            text: text.to_string(),
            start_ms,
            end_ms,
        }
    }

    #[test]
    fn test_matches_plain_and_censored_words() {
        let detector = ProfanityDetector::default();
        let words = [
            word("well", 0, 400),
            word("fuck", 500, 900),
            word("f*ck", 1000, 1400),
            word("shoot", 1500, 1900),
        ];
        let intervals = detector.scan(&words);
        assert_eq!(
            intervals,
            vec![MuteInterval::new(500, 900), MuteInterval::new(1000, 1400)]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let detector = ProfanityDetector::default();
        let intervals = detector.scan(&[word("DAMN", 100, 300)]);
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn test_clean_transcript_yields_nothing() {
        let detector = ProfanityDetector::default();
        let words = [word("what", 0, 200), word("a", 250, 300), word("save", 350, 700)];
        assert!(detector.scan(&words).is_empty());
    }

    #[test]
    fn test_intervals_follow_word_order() {
        let detector = ProfanityDetector::default();
        let words = [
            word("shit", 100, 300),
            word("ok", 400, 500),
            word("bitch", 600, 900),
        ];
        let intervals = detector.scan(&words);
        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].start_ms <= intervals[1].start_ms);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let detector = ProfanityDetector::default();
        let words = [word("damn", 100, 300), word("penis", 400, 800)];
        assert_eq!(detector.scan(&words), detector.scan(&words));
    }

    #[test]
    fn test_empty_pattern_set_matches_nothing() {
        let detector = ProfanityDetector::new(std::iter::empty::<&str>()).unwrap();
        assert!(detector.scan(&[word("fuck", 0, 100)]).is_empty());
    }

    #[test]
    fn test_custom_pattern_set() {
        let detector = ProfanityDetector::new([r"\bheck\b"]).unwrap();
        assert_eq!(detector.scan(&[word("heck", 0, 100)]).len(), 1);
        assert!(detector.scan(&[word("fuck", 0, 100)]).is_empty());
    }
}
