pub(crate) mod executor;
pub(crate) mod planner;
pub(crate) mod report;

pub use executor::{apply, FailurePolicy};
pub use planner::{plan, RestorePlan};

use anyhow::{Context, Result};
use std::io::Write;

use crate::catalog::{VersionCatalog, VersionStore};
use crate::config::{AppConfig, OperationConfig, TargetConfig};
use crate::errors::AppError;
use crate::utils::format_timestamp;

/// Restores every object under the configured prefix to its state at the
/// configured timestamp.
pub async fn run_restore_flow(app_config: &AppConfig, store: &dyn VersionStore) -> Result<()> {
    let (target, policy) = match &app_config.operation {
        Some(OperationConfig::Restore { target, policy }) => (target, *policy),
        _ => anyhow::bail!("Restore operation selected but no restore configuration found."),
    };

    let plan = fetch_plan(store, target).await?;
    println!(
        "🔄 Restoring s3://{}/{} to {}: {} to restore, {} already current",
        target.bucket,
        target.prefix,
        format_timestamp(&target.timestamp),
        plan.restorations().count(),
        plan.skipped()
    );

    let report = apply(store, &target.bucket, &plan, policy)
        .await
        .context("Restore aborted")?;

    println!("Restored {}, skipped {}", report.restored.len(), report.skipped);

    if !report.failures.is_empty() {
        return Err(AppError::PartialRestore {
            failed: report.failures.len(),
            attempted: report.attempted(),
        }
        .into());
    }
    Ok(())
}

/// Writes the version in effect at the configured timestamp for every object
/// under the configured prefix. Nothing is modified.
pub async fn run_list_flow<W: Write>(app_config: &AppConfig, store: &dyn VersionStore, out: &mut W) -> Result<()> {
    let target = match &app_config.operation {
        Some(OperationConfig::List(target)) => target,
        _ => anyhow::bail!("List operation selected but no list configuration found."),
    };

    let plan = fetch_plan(store, target).await?;
    report::render(out, &plan).context("Failed to write version report")?;
    Ok(())
}

async fn fetch_plan(store: &dyn VersionStore, target: &TargetConfig) -> Result<RestorePlan> {
    let catalog: VersionCatalog = store
        .list_versions(&target.bucket, &target.prefix)
        .await
        .context("Failed to fetch version catalog")?;

    tracing::info!(
        bucket = %target.bucket,
        prefix = %target.prefix,
        versions = catalog.len(),
        "Fetched version catalog"
    );
    if catalog.is_empty() {
        tracing::info!("No object versions found");
    } else if !catalog.is_newest_first() {
        tracing::warn!("Version listing is not newest-first per key; the selected versions may be wrong");
    }

    let plan = plan(&catalog, target.timestamp);
    tracing::debug!(keys = plan.len(), "Computed restore plan");
    Ok(plan)
}
