//! Chat overlay rendering via TwitchDownloaderCLI chatrender.

use std::path::{Path, PathBuf};

use tracing::info;

use chatclip_models::ChatOverlaySettings;

use crate::command::{ToolCommand, ToolRunner, TWITCH_CLI};
use crate::error::MediaResult;

/// Render framerate for chat overlays. Chat motion is sparse, so a low
/// rate keeps render times and file sizes down.
const RENDER_FRAMERATE: u32 = 12;

/// Render a chat log into a transparent overlay video next to the log,
/// returning the overlay path.
pub async fn render_overlay(
    runner: &ToolRunner,
    chat_path: &Path,
    dest_dir: &Path,
    stem: &str,
    settings: &ChatOverlaySettings,
) -> MediaResult<PathBuf> {
    let output = dest_dir.join(format!("{stem}_chat_render.mov"));
    let cmd = chat_render_command(chat_path, &output, settings);
    info!(chat = %chat_path.display(), "Rendering chat overlay");
    runner.run(&cmd).await?;
    Ok(output)
}

fn chat_render_command(
    chat_path: &Path,
    output: &Path,
    settings: &ChatOverlaySettings,
) -> ToolCommand {
    // Geometry is derived from the settings snapshot at this call, not
    // cached anywhere.
    let rect = settings.pixel_rect();
    ToolCommand::new(TWITCH_CLI)
        .arg("chatrender")
        .arg("-i")
        .arg(chat_path.to_string_lossy())
        .arg("-o")
        .arg(output.to_string_lossy())
        .arg("--font-size")
        .arg(settings.font_size.to_string())
        .arg("--chat-width")
        .arg(rect.width.to_string())
        .arg("--chat-height")
        .arg(rect.height.to_string())
        .arg("--framerate")
        .arg(RENDER_FRAMERATE.to_string())
        .arg("--background-color")
        .arg(settings.background_color_arg())
        // ProRes 4444 with an alpha pixel format keeps the overlay
        // transparent when composited.
        .arg("--output-args=-c:v prores_ks -pix_fmt argb \"{save_path}\"")
}
