//! Final composite: source media, chat overlay, and audio filter.

use std::path::Path;

use tracing::info;

use crate::command::{ToolCommand, ToolRunner, FFMPEG};
use crate::error::MediaResult;

/// Composite `media` and `overlay` into `output`, applying
/// `filter_complex`. The graph must expose `[vout]` and `[aout]` pads.
pub async fn combine(
    runner: &ToolRunner,
    media: &Path,
    overlay: &Path,
    filter_complex: &str,
    output: &Path,
) -> MediaResult<()> {
    let cmd = combine_command(media, overlay, filter_complex, output);
    info!(output = %output.display(), "Combining media and chat overlay");
    runner.run(&cmd).await
}

fn combine_command(
    media: &Path,
    overlay: &Path,
    filter_complex: &str,
    output: &Path,
) -> ToolCommand {
    ToolCommand::new(FFMPEG)
        .arg("-y")
        .arg("-v")
        .arg("error")
        .arg("-i")
        .arg(media.to_string_lossy())
        .arg("-i")
        .arg(overlay.to_string_lossy())
        .arg("-filter_complex")
        .arg(filter_complex)
        .arg("-map")
        .arg("[vout]")
        .arg("-map")
        .arg("[aout]")
        .arg(output.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_command_shape() {
        let cmd = combine_command(
            Path::new("/s/clip.mp4"),
            Path::new("/s/chat.mov"),
            "[1:v]scale=458:661[chat];[0:v][chat]overlay=1461:418[vout];[0:a]acopy[aout]",
            Path::new("/dl/out.mp4"),
        );
        let args = cmd.build_args();

        assert_eq!(cmd.program(), "ffmpeg");
        // Both inputs, in order.
        let inputs: Vec<&String> = args
            .iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| *flag == "-i")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(inputs, ["/s/clip.mp4", "/s/chat.mov"]);
        // Both pads mapped.
        assert!(args.contains(&"[vout]".to_string()));
        assert!(args.contains(&"[aout]".to_string()));
        assert_eq!(args.last().unwrap(), "/dl/out.mp4");
    }
}
