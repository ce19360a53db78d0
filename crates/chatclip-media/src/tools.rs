//! The external-operation boundary consumed by the batch layer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use chatclip_models::{ChatOverlaySettings, WorkItem};

use crate::combine;
use crate::command::{check_ffmpeg, check_twitch_cli, ToolRunner};
use crate::download;
use crate::error::{MediaError, MediaResult};
use crate::render;
use crate::transcribe::{TranscriberClient, TranscriptWord};

/// External operations the item pipeline depends on.
///
/// `CliTools` implements this over subprocess and HTTP calls; the batch
/// crate's tests implement it with scripted doubles.
#[async_trait]
pub trait ClipTools: Send + Sync {
    /// Download the item's media into `dest_dir`; returns the media path.
    async fn download_media(&self, item: &WorkItem, dest_dir: &Path) -> MediaResult<PathBuf>;

    /// Download the item's chat log into `dest_dir`; returns the log path.
    async fn download_chat(&self, item: &WorkItem, dest_dir: &Path) -> MediaResult<PathBuf>;

    /// Render a chat log into a transparent overlay video.
    async fn render_overlay(
        &self,
        chat_path: &Path,
        dest_dir: &Path,
        stem: &str,
        settings: &ChatOverlaySettings,
    ) -> MediaResult<PathBuf>;

    /// Transcribe media into word-level timestamps.
    async fn transcribe(&self, media: &Path) -> MediaResult<Vec<TranscriptWord>>;

    /// Composite media and overlay into `output` using `filter_complex`.
    async fn combine(
        &self,
        media: &Path,
        overlay: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> MediaResult<()>;
}

/// Subprocess/HTTP implementation of [`ClipTools`].
pub struct CliTools {
    runner: ToolRunner,
    transcriber: Option<TranscriberClient>,
}

impl CliTools {
    /// Build the real tool set, verifying required binaries up front.
    ///
    /// The transcriber is optional: without an API key every transcribe
    /// call fails and the caller degrades to no muting.
    pub fn new(step_timeout_secs: u64) -> MediaResult<Self> {
        check_twitch_cli()?;
        check_ffmpeg()?;
        Ok(Self {
            runner: ToolRunner::new().with_timeout(step_timeout_secs),
            transcriber: TranscriberClient::from_env().ok(),
        })
    }

    /// Replace the transcriber (tests, alternate gateways).
    pub fn with_transcriber(mut self, transcriber: TranscriberClient) -> Self {
        self.transcriber = Some(transcriber);
        self
    }
}

#[async_trait]
impl ClipTools for CliTools {
    async fn download_media(&self, item: &WorkItem, dest_dir: &Path) -> MediaResult<PathBuf> {
        match item {
            WorkItem::Clip { reference, .. } => {
                download::download_clip(&self.runner, reference, dest_dir, &item.item_id()).await
            }
            WorkItem::VodSegment {
                start,
                end,
                vod_url,
                ..
            } => {
                download::download_vod_segment(
                    &self.runner,
                    vod_url,
                    start,
                    end,
                    dest_dir,
                    &item.item_id(),
                )
                .await
            }
        }
    }

    async fn download_chat(&self, item: &WorkItem, dest_dir: &Path) -> MediaResult<PathBuf> {
        match item {
            WorkItem::Clip { reference, .. } => {
                download::download_clip_chat(&self.runner, reference, dest_dir, &item.item_id())
                    .await
            }
            WorkItem::VodSegment {
                start,
                end,
                vod_url,
                ..
            } => {
                download::download_vod_chat(
                    &self.runner,
                    vod_url,
                    start,
                    end,
                    dest_dir,
                    &item.item_id(),
                )
                .await
            }
        }
    }

    async fn render_overlay(
        &self,
        chat_path: &Path,
        dest_dir: &Path,
        stem: &str,
        settings: &ChatOverlaySettings,
    ) -> MediaResult<PathBuf> {
        render::render_overlay(&self.runner, chat_path, dest_dir, stem, settings).await
    }

    async fn transcribe(&self, media: &Path) -> MediaResult<Vec<TranscriptWord>> {
        match &self.transcriber {
            Some(transcriber) => transcriber.transcribe(media).await,
            None => Err(MediaError::transcription_failed(
                "transcription service not configured",
            )),
        }
    }

    async fn combine(
        &self,
        media: &Path,
        overlay: &Path,
        filter_complex: &str,
        output: &Path,
    ) -> MediaResult<()> {
        combine::combine(&self.runner, media, overlay, filter_complex, output).await
    }
}
