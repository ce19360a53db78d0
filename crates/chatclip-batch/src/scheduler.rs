//! The batch scheduler.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

use chatclip_models::{ItemOutcome, WorkItem};

use crate::error::BatchError;
use crate::pipeline::{self, PipelineContext};

/// Aggregate result of one batch run.
///
/// `outcomes` preserves submission order; completion order is
/// unconstrained and not recorded.
#[derive(Debug)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub outcomes: Vec<ItemOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// True when the batch deadline fired before every item settled.
    pub deadline_hit: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }

    pub fn timed_out(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_timed_out())
            .count()
    }
}

/// Fans a batch of work items over a bounded worker pool.
pub struct BatchScheduler {
    ctx: Arc<PipelineContext>,
}

impl BatchScheduler {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Run one batch to completion or to the batch deadline.
    ///
    /// Per-item failures are folded into the report; the only error this
    /// returns is a pre-flight configuration problem. When the deadline
    /// fires, unfinished items are reported here as timed out while their
    /// detached tasks keep running and keep writing to the progress sink.
    pub async fn run(
        &self,
        items: &[WorkItem],
        download_dir: &Path,
    ) -> Result<BatchReport, BatchError> {
        let config = &self.ctx.config;
        if config.max_workers < 1 {
            return Err(BatchError::config("max_workers must be at least 1"));
        }

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();

        if items.is_empty() {
            return Ok(BatchReport {
                batch_id,
                outcomes: Vec::new(),
                started_at,
                finished_at: Utc::now(),
                deadline_hit: false,
            });
        }

        tokio::fs::create_dir_all(download_dir)
            .await
            .map_err(|e| BatchError::config(format!("download directory unusable: {}", e)))?;

        info!(
            batch_id = %batch_id,
            items = items.len(),
            max_workers = config.max_workers,
            "Starting batch"
        );
        self.ctx.progress.write(format!(
            "Processing {} items ({} workers)",
            items.len(),
            config.max_workers
        ));

        let permits = Arc::new(Semaphore::new(config.max_workers));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, ItemOutcome)>();

        for (index, item) in items.iter().cloned().enumerate() {
            let ctx = Arc::clone(&self.ctx);
            let permits = Arc::clone(&permits);
            let dir = download_dir.to_path_buf();
            let tx = tx.clone();
            tokio::spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                let outcome = pipeline::process_item(&ctx, &item, &dir).await;
                // The batch call may already have returned; delivery is
                // best-effort and the sink got the per-item line already.
                tx.send((index, outcome)).ok();
            });
        }
        drop(tx);

        let deadline = tokio::time::Instant::now() + config.batch_timeout;
        let mut slots: Vec<Option<ItemOutcome>> = vec![None; items.len()];
        let mut settled = 0usize;
        let mut deadline_hit = false;

        while settled < items.len() {
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(Some((index, outcome))) => {
                    slots[index] = Some(outcome);
                    settled += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        batch_id = %batch_id,
                        pending = items.len() - settled,
                        "Batch deadline reached with items still running"
                    );
                    self.ctx.progress.write(
                        "Batch timed out; unfinished items keep running in the background",
                    );
                    deadline_hit = true;
                    break;
                }
            }
        }

        let outcomes: Vec<ItemOutcome> = items
            .iter()
            .zip(slots)
            .map(|(item, slot)| slot.unwrap_or_else(|| ItemOutcome::timed_out(item)))
            .collect();

        let report = BatchReport {
            batch_id,
            outcomes,
            started_at,
            finished_at: Utc::now(),
            deadline_hit,
        };
        self.ctx.progress.write(format!(
            "Batch complete: {} succeeded, {} failed, {} timed out",
            report.succeeded(),
            report.failed(),
            report.timed_out()
        ));
        info!(
            batch_id = %batch_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            timed_out = report.timed_out(),
            "Batch finished"
        );
        Ok(report)
    }
}
