//! Clip, chat, and VOD segment downloads via TwitchDownloaderCLI.

use std::path::{Path, PathBuf};

use tracing::info;

use chatclip_models::{normalize_time, ClipRef};

use crate::command::{ToolCommand, ToolRunner, TWITCH_CLI};
use crate::error::{MediaError, MediaResult};

/// Download a clip into `dest_dir`, returning the media path.
pub async fn download_clip(
    runner: &ToolRunner,
    clip: &ClipRef,
    dest_dir: &Path,
    stem: &str,
) -> MediaResult<PathBuf> {
    let output = dest_dir.join(format!("{stem}_clip.mp4"));
    let cmd = clip_download_command(clip, &output);
    info!(clip = %clip.resolve(), "Downloading clip");
    runner.run(&cmd).await?;
    Ok(output)
}

/// Download a clip's chat log (with embedded images) into `dest_dir`.
pub async fn download_clip_chat(
    runner: &ToolRunner,
    clip: &ClipRef,
    dest_dir: &Path,
    stem: &str,
) -> MediaResult<PathBuf> {
    let output = dest_dir.join(format!("{stem}_chat.json"));
    let cmd = clip_chat_command(clip, &output);
    info!(clip = %clip.resolve(), "Downloading clip chat");
    runner.run(&cmd).await?;
    Ok(output)
}

/// Download a time range of a VOD into `dest_dir`.
pub async fn download_vod_segment(
    runner: &ToolRunner,
    vod_url: &str,
    start: &str,
    end: &str,
    dest_dir: &Path,
    stem: &str,
) -> MediaResult<PathBuf> {
    let output = dest_dir.join(format!("{stem}.mp4"));
    let cmd = vod_segment_command(vod_url, start, end, &output)?;
    info!(vod = vod_url, start, end, "Downloading VOD segment");
    runner.run(&cmd).await?;
    Ok(output)
}

/// Download the chat log for a time range of a VOD into `dest_dir`.
pub async fn download_vod_chat(
    runner: &ToolRunner,
    vod_url: &str,
    start: &str,
    end: &str,
    dest_dir: &Path,
    stem: &str,
) -> MediaResult<PathBuf> {
    let output = dest_dir.join(format!("{stem}_chat.json"));
    let cmd = vod_chat_command(vod_url, start, end, &output)?;
    info!(vod = vod_url, start, end, "Downloading VOD chat");
    runner.run(&cmd).await?;
    Ok(output)
}

fn clip_download_command(clip: &ClipRef, output: &Path) -> ToolCommand {
    ToolCommand::new(TWITCH_CLI)
        .arg("clipdownload")
        .arg("--id")
        .arg(clip.resolve())
        .arg("-o")
        .arg(output.to_string_lossy())
}

fn clip_chat_command(clip: &ClipRef, output: &Path) -> ToolCommand {
    ToolCommand::new(TWITCH_CLI)
        .arg("chatdownload")
        .arg("--id")
        .arg(clip.resolve())
        .arg("--embed-images")
        .arg("-o")
        .arg(output.to_string_lossy())
}

fn vod_segment_command(
    vod_url: &str,
    start: &str,
    end: &str,
    output: &Path,
) -> MediaResult<ToolCommand> {
    let (start, end) = normalize_range(start, end)?;
    Ok(ToolCommand::new(TWITCH_CLI)
        .arg("videodownload")
        .arg("-u")
        .arg(vod_url)
        .arg("-o")
        .arg(output.to_string_lossy())
        .arg("-b")
        .arg(start)
        .arg("-e")
        .arg(end))
}

fn vod_chat_command(
    vod_url: &str,
    start: &str,
    end: &str,
    output: &Path,
) -> MediaResult<ToolCommand> {
    let (start, end) = normalize_range(start, end)?;
    Ok(ToolCommand::new(TWITCH_CLI)
        .arg("chatdownload")
        .arg("-u")
        .arg(vod_url)
        .arg("-o")
        .arg(output.to_string_lossy())
        .arg("-b")
        .arg(start)
        .arg("-e")
        .arg(end))
}

fn normalize_range(start: &str, end: &str) -> MediaResult<(String, String)> {
    let start =
        normalize_time(start).ok_or_else(|| MediaError::InvalidTimestamp(start.to_string()))?;
    let end = normalize_time(end).ok_or_else(|| MediaError::InvalidTimestamp(end.to_string()))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_download_command() {
        let clip = ClipRef::Slug("FunSlug".to_string());
        let cmd = clip_download_command(&clip, Path::new("/dl/t_clip.mp4"));
        assert_eq!(
            cmd.build_args(),
            [
                "clipdownload",
                "--id",
                "https://clips.twitch.tv/FunSlug",
                "-o",
                "/dl/t_clip.mp4"
            ]
        );
    }

    #[test]
    fn test_clip_chat_command_embeds_images() {
        let clip = ClipRef::Id("12345".to_string());
        let cmd = clip_chat_command(&clip, Path::new("/dl/t_chat.json"));
        assert!(cmd.build_args().contains(&"--embed-images".to_string()));
        assert!(cmd.build_args().contains(&"12345".to_string()));
    }

    #[test]
    fn test_vod_segment_command_normalizes_times() {
        let cmd = vod_segment_command("https://vod", "001000", "00:12:30", Path::new("/dl/s.mp4"))
            .unwrap();
        let args = cmd.build_args();
        assert!(args.contains(&"00:10:00".to_string()));
        assert!(args.contains(&"00:12:30".to_string()));
        assert_eq!(args[0], "videodownload");
    }

    #[test]
    fn test_vod_segment_command_rejects_bad_time() {
        let err = vod_segment_command("https://vod", "later", "001230", Path::new("/dl/s.mp4"))
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidTimestamp(_)));
    }
}
