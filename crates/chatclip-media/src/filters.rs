//! FFmpeg filter-graph builders for the combine step.
//!
//! Pure string builders; the combine step passes the result to
//! `-filter_complex` untouched.

use chatclip_models::{MuteInterval, PixelRect};

/// Audio pass-through used when there is nothing to mute.
pub const AUDIO_PASSTHROUGH: &str = "[0:a]acopy[aout]";

/// Build the audio mute chain for a set of intervals.
///
/// Each interval contributes a zero-gain gate active during its window.
/// Intervals are applied independently: overlapping ranges silence the
/// same span more than once, which is idempotent. An empty list yields
/// the pass-through expression.
pub fn build_mute_filter(intervals: &[MuteInterval]) -> String {
    if intervals.is_empty() {
        return AUDIO_PASSTHROUGH.to_string();
    }
    let gates: Vec<String> = intervals
        .iter()
        .map(|interval| {
            format!(
                "volume=enable='between(t,{},{})':volume=0",
                interval.start_sec(),
                interval.end_sec()
            )
        })
        .collect();
    format!("[0:a]{}[aout]", gates.join(","))
}

/// Build the overlay graph: scale the chat render to its pixel size and
/// place it at the settings-derived position.
pub fn build_overlay_filter(rect: &PixelRect) -> String {
    format!(
        "[1:v]scale={}:{}[chat];[0:v][chat]overlay={}:{}[vout]",
        rect.width, rect.height, rect.x, rect.y
    )
}

/// Full combine graph: overlay video plus mute chain, exposing `[vout]`
/// and `[aout]` pads.
pub fn build_combine_filter(rect: &PixelRect, intervals: &[MuteInterval]) -> String {
    format!(
        "{};{}",
        build_overlay_filter(rect),
        build_mute_filter(intervals)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> PixelRect {
        PixelRect {
            x: 1461,
            y: 418,
            width: 458,
            height: 661,
        }
    }

    #[test]
    fn test_empty_intervals_pass_audio_through() {
        assert_eq!(build_mute_filter(&[]), AUDIO_PASSTHROUGH);
    }

    #[test]
    fn test_single_interval() {
        let filter = build_mute_filter(&[MuteInterval::new(2000, 3000)]);
        assert_eq!(
            filter,
            "[0:a]volume=enable='between(t,2,3)':volume=0[aout]"
        );
    }

    #[test]
    fn test_intervals_chain_in_order() {
        let filter = build_mute_filter(&[
            MuteInterval::new(1500, 1900),
            MuteInterval::new(4000, 4250),
        ]);
        assert_eq!(
            filter,
            "[0:a]volume=enable='between(t,1.5,1.9)':volume=0,\
             volume=enable='between(t,4,4.25)':volume=0[aout]"
        );
    }

    #[test]
    fn test_mute_filter_is_pure() {
        let intervals = vec![MuteInterval::new(2000, 3000), MuteInterval::new(2000, 3000)];
        assert_eq!(build_mute_filter(&intervals), build_mute_filter(&intervals));
    }

    #[test]
    fn test_overlay_filter() {
        assert_eq!(
            build_overlay_filter(&rect()),
            "[1:v]scale=458:661[chat];[0:v][chat]overlay=1461:418[vout]"
        );
    }

    #[test]
    fn test_combine_filter_joins_graphs() {
        let filter = build_combine_filter(&rect(), &[]);
        assert!(filter.starts_with("[1:v]scale="));
        assert!(filter.ends_with("[0:a]acopy[aout]"));
        assert_eq!(filter.matches(';').count(), 2);
    }
}
