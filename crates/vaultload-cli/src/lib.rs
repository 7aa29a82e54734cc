//! Batch driver shared by the `vaultload` binary and its tests.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;
use vaultload_core::LogLevel;
use vaultload_services::{LoadOutcome, VaultLoader};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Identifiers listed one per line; blank lines and `#` comments are ignored.
///
/// Returns the valid identifiers and the lines that are not UUIDs.
pub fn parse_identifiers(text: &str) -> (Vec<Uuid>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Uuid::parse_str(line) {
            Ok(id) => valid.push(id),
            Err(_) => invalid.push(line.to_string()),
        }
    }
    (valid, invalid)
}

/// Identifiers from the command line followed by those in `file`, if given
pub fn collect_identifiers(
    args: &[String],
    file: Option<&Path>,
) -> anyhow::Result<(Vec<Uuid>, Vec<String>)> {
    let (mut valid, mut invalid) = parse_identifiers(&args.join("\n"));
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read identifiers from {}", path.display()))?;
        let (file_valid, file_invalid) = parse_identifiers(&text);
        valid.extend(file_valid);
        invalid.extend(file_invalid);
    }
    for line in &invalid {
        tracing::warn!(input = %line, "Not a bag identifier, skipping");
    }
    Ok((valid, invalid))
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadFailure {
    pub bag_id: Uuid,
    pub error_code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoadSummary {
    /// Base bags whose versions were written
    pub processed: usize,
    pub not_found: usize,
    /// Identifiers of non-base versions
    pub skipped_versions: usize,
    pub failed: usize,
    pub skipped_invalid: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Load every identifier, at most `concurrency` at a time.
///
/// A failing identifier is logged and counted; the others carry on.
pub async fn run_batch(
    loader: Arc<VaultLoader>,
    ids: Vec<Uuid>,
    concurrency: usize,
) -> anyhow::Result<LoadSummary> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(ids.len());

    for bag_id in ids {
        let loader = loader.clone();
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Load semaphore closed")?;

        handles.push((
            bag_id,
            tokio::spawn(async move {
                let result = loader.load_from_vault(bag_id).await;
                drop(permit);
                result
            }),
        ));
    }

    let mut summary = LoadSummary::default();
    for (bag_id, handle) in handles {
        match handle.await.context("Load task panicked")? {
            Ok(LoadOutcome::Processed { .. }) => summary.processed += 1,
            Ok(LoadOutcome::NotFound) => summary.not_found += 1,
            Ok(LoadOutcome::SkippedVersion { .. }) => summary.skipped_versions += 1,
            Err(e) => {
                match e.log_level() {
                    LogLevel::Warn => tracing::warn!(
                        bag_id = %bag_id,
                        error_code = e.error_code(),
                        error = %e.detailed_message(),
                        "Failed to load bag"
                    ),
                    LogLevel::Debug | LogLevel::Error => tracing::error!(
                        bag_id = %bag_id,
                        error_code = e.error_code(),
                        error = %e.detailed_message(),
                        "Failed to load bag"
                    ),
                }
                summary.failed += 1;
                summary.failures.push(LoadFailure {
                    bag_id,
                    error_code: e.error_code(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(summary)
}
