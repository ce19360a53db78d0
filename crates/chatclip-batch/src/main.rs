//! Batch worker binary.
//!
//! Reads the persisted settings snapshot and a JSON batch manifest, runs
//! one batch, and exits non-zero when nothing succeeded.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chatclip_batch::{BatchConfig, BatchScheduler, PipelineContext, ProgressSink};
use chatclip_media::CliTools;
use chatclip_models::{Settings, WorkItem};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("chatclip=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let (manifest_path, download_dir) = match (args.next(), args.next()) {
        (Some(manifest), Some(dir)) => (PathBuf::from(manifest), PathBuf::from(dir)),
        _ => {
            eprintln!("usage: chatclip-batch <manifest.json> <download-dir>");
            return ExitCode::from(2);
        }
    };

    let settings = match Settings::load_or_default(Path::new("settings.json")) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = settings.chat_settings.validate() {
        error!("Invalid chat settings: {}", e);
        return ExitCode::FAILURE;
    }

    let items: Vec<WorkItem> = match load_manifest(&manifest_path) {
        Ok(items) => items,
        Err(e) => {
            error!("Failed to read manifest {}: {}", manifest_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!(items = items.len(), "Loaded batch manifest");

    let config = BatchConfig::from_env().with_settings(&settings);

    let tools = match CliTools::new(config.step_timeout_secs) {
        Ok(tools) => Arc::new(tools),
        Err(e) => {
            error!("Tool check failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = PipelineContext::new(
        tools,
        settings.chat_settings.clone(),
        config,
        ProgressSink::stdout(),
    );
    let scheduler = BatchScheduler::new(ctx);

    match scheduler.run(&items, &download_dir).await {
        Ok(report) => {
            info!(
                batch_id = %report.batch_id,
                succeeded = report.succeeded(),
                failed = report.failed(),
                timed_out = report.timed_out(),
                "Batch run finished"
            );
            if report.succeeded() == 0 && !report.outcomes.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("Batch failed to start: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_manifest(path: &Path) -> Result<Vec<WorkItem>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
