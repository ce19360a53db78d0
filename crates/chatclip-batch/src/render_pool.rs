//! Bounded pool for the chat-render step.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::debug;

use chatclip_media::{ClipTools, MediaError, MediaResult};
use chatclip_models::ChatOverlaySettings;

/// Default render pool width. Rendering is the most resource-hungry step,
/// so its cap stays independent of the item-level worker count.
pub const DEFAULT_RENDER_WORKERS: usize = 2;

/// Fixed-width pool for chat renders.
///
/// Submissions beyond capacity queue and start in FIFO order (the
/// semaphore's wait queue is fair). A failing or panicking render
/// resolves its handle with an error; it never tears down the pool.
pub struct RenderPool {
    tools: Arc<dyn ClipTools>,
    permits: Arc<Semaphore>,
}

impl RenderPool {
    pub fn new(tools: Arc<dyn ClipTools>, workers: usize) -> Self {
        Self {
            tools,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Submit one render; the handle resolves to the overlay path.
    pub fn submit(
        &self,
        chat_path: PathBuf,
        dest_dir: PathBuf,
        stem: String,
        settings: ChatOverlaySettings,
    ) -> JoinHandle<MediaResult<PathBuf>> {
        let tools = Arc::clone(&self.tools);
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| MediaError::internal("render pool closed"))?;
            debug!(stem = %stem, "Render slot acquired");
            tools
                .render_overlay(&chat_path, &dest_dir, &stem, &settings)
                .await
        })
    }
}
