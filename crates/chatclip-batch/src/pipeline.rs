//! Per-item processing pipeline.
//!
//! One item flows through download, then transcription and chat render in
//! parallel, then combine, with a private scratch directory that is
//! removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::time::timeout;
use tracing::{info, warn};

use chatclip_media::{filters, ClipTools, MediaError};
use chatclip_models::{ChatOverlaySettings, ItemOutcome, ProcessingStep, WorkItem};

use crate::config::BatchConfig;
use crate::error::ItemError;
use crate::profanity::ProfanityDetector;
use crate::progress::ProgressSink;
use crate::render_pool::RenderPool;

/// Shared dependencies for every item of one batch run.
///
/// `settings` is the immutable snapshot taken at batch start; nothing
/// mutates it while items are in flight.
pub struct PipelineContext {
    pub tools: Arc<dyn ClipTools>,
    pub render_pool: RenderPool,
    pub detector: Arc<ProfanityDetector>,
    pub progress: ProgressSink,
    pub settings: ChatOverlaySettings,
    pub config: BatchConfig,
}

impl PipelineContext {
    pub fn new(
        tools: Arc<dyn ClipTools>,
        settings: ChatOverlaySettings,
        config: BatchConfig,
        progress: ProgressSink,
    ) -> Self {
        let render_pool = RenderPool::new(Arc::clone(&tools), config.render_workers);
        Self {
            tools,
            render_pool,
            detector: Arc::new(ProfanityDetector::default()),
            progress,
            settings,
            config,
        }
    }

    /// Replace the profanity pattern set for this run.
    pub fn with_detector(mut self, detector: ProfanityDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }
}

/// Process one work item to a terminal outcome.
///
/// Never returns an error: every failure is folded into the outcome, the
/// outcome is reported to the progress sink, and the scratch directory is
/// removed regardless of how the item ended.
pub async fn process_item(
    ctx: &PipelineContext,
    item: &WorkItem,
    download_dir: &Path,
) -> ItemOutcome {
    let item_id = item.item_id();
    let title = item.display_title();

    let scratch = match TempDir::with_prefix_in(format!("temp_{}_", item_id), download_dir) {
        Ok(dir) => dir,
        Err(e) => {
            warn!(item_id = %item_id, error = %e, "Failed to create scratch directory");
            let err = ItemError::from(e);
            ctx.progress
                .write(format!("Error processing {}: {}", title, err));
            return ItemOutcome::failed(item, err.to_string());
        }
    };

    let result = run_stages(ctx, item, scratch.path(), download_dir).await;

    // Cleanup runs on every path. A removal failure is logged and never
    // replaces the item's real outcome.
    let scratch_path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!(
            item_id = %item_id,
            path = %scratch_path.display(),
            error = %e,
            "Failed to remove scratch directory"
        );
    }

    match result {
        Ok(output) => {
            info!(item_id = %item_id, output = %output.display(), "Item completed");
            ctx.progress.write(format!("Completed processing: {}", title));
            ItemOutcome::success(item, output)
        }
        Err(e) if e.is_timeout() => {
            warn!(item_id = %item_id, error = %e, "Item timed out");
            ctx.progress.write(format!("Timeout while processing {}", title));
            ItemOutcome::timed_out(item)
        }
        Err(e) => {
            warn!(item_id = %item_id, error = %e, "Item failed");
            ctx.progress
                .write(format!("Error processing {}: {}", title, e));
            ItemOutcome::failed(item, e.to_string())
        }
    }
}

/// The fallible stage sequence; the caller owns cleanup and reporting.
async fn run_stages(
    ctx: &PipelineContext,
    item: &WorkItem,
    scratch: &Path,
    download_dir: &Path,
) -> Result<PathBuf, ItemError> {
    let item_id = item.item_id();
    let title = item.display_title();

    info!(item_id = %item_id, "Starting item processing");
    ctx.progress.write(format!("Downloading: {}", title));

    // Media and chat downloads are independent subprocess waits; either
    // failure is fatal to the item.
    let (media_path, chat_path) = tokio::try_join!(
        async {
            ctx.tools
                .download_media(item, scratch)
                .await
                .map_err(ItemError::download)
        },
        async {
            ctx.tools
                .download_chat(item, scratch)
                .await
                .map_err(ItemError::download)
        },
    )?;

    // Derived work: the chat render goes through the bounded pool while
    // profanity detection runs alongside it. Detection is advisory and
    // abortable; a render failure is fatal.
    ctx.progress.write(format!("Rendering chat: {}", title));
    let render_handle = ctx.render_pool.submit(
        chat_path.clone(),
        scratch.to_path_buf(),
        item_id.clone(),
        ctx.settings.clone(),
    );

    let detector = Arc::clone(&ctx.detector);
    let detect_tools = Arc::clone(&ctx.tools);
    let detect_media = media_path.clone();
    let detect_progress = ctx.progress.clone();
    let detect_label = title.clone();
    let detect_handle = tokio::spawn(async move {
        detector
            .detect(
                detect_tools.as_ref(),
                &detect_media,
                &detect_progress,
                &detect_label,
            )
            .await
    });

    let overlay_path = match timeout(ctx.config.render_wait, render_handle).await {
        Err(_) => {
            // The render result is abandoned; detection output would be
            // discarded anyway.
            detect_handle.abort();
            return Err(ItemError::timeout(
                ProcessingStep::RenderingChat,
                ctx.config.render_wait,
            ));
        }
        Ok(Err(join_err)) => {
            detect_handle.abort();
            return Err(ItemError::render(MediaError::internal(format!(
                "render task failed: {}",
                join_err
            ))));
        }
        Ok(Ok(Err(e))) => {
            detect_handle.abort();
            return Err(ItemError::render(e));
        }
        Ok(Ok(Ok(path))) => path,
    };

    let mute_intervals = match detect_handle.await {
        Ok(intervals) => intervals,
        Err(e) => {
            // Detection stays advisory even when its task dies.
            warn!(item_id = %item_id, error = %e, "Profanity detection task failed");
            Vec::new()
        }
    };

    // Pixel geometry is derived from the snapshot at combine time; an
    // empty interval list becomes the pass-through audio filter.
    let rect = ctx.settings.pixel_rect();
    let filter = filters::build_combine_filter(&rect, &mute_intervals);
    let output_path = download_dir.join(item.output_filename());

    ctx.progress
        .write(format!("Combining media and chat: {}", title));
    match timeout(
        ctx.config.combine_wait,
        ctx.tools
            .combine(&media_path, &overlay_path, &filter, &output_path),
    )
    .await
    {
        Err(_) => Err(ItemError::timeout(
            ProcessingStep::Combining,
            ctx.config.combine_wait,
        )),
        Ok(Err(e)) => Err(ItemError::combine(e)),
        Ok(Ok(())) => Ok(output_path),
    }
}
