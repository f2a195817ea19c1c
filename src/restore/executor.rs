// s3restore/src/restore/executor.rs
use crate::catalog::VersionStore;
use crate::errors::{AppError, Result};

use super::planner::RestorePlan;

/// How the executor reacts to a failed copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failed copy and return its error.
    #[default]
    FailFast,
    /// Attempt every copy and collect failures in the report.
    ContinueOnError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredKey {
    pub key: String,
    pub version_id: String,
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub restored: Vec<RestoredKey>,
    pub skipped: usize,
    /// Only populated under [`FailurePolicy::ContinueOnError`].
    pub failures: Vec<AppError>,
}

impl ExecutionReport {
    pub fn attempted(&self) -> usize {
        self.restored.len() + self.failures.len()
    }
}

/// Copies the planned version over the live object of every key decided
/// `RestoreTo`, one key at a time in plan order.
///
/// Restorations applied before a failure are not rolled back.
pub async fn apply(
    store: &dyn VersionStore,
    bucket: &str,
    plan: &RestorePlan,
    policy: FailurePolicy,
) -> Result<ExecutionReport> {
    let mut report = ExecutionReport {
        skipped: plan.skipped(),
        ..Default::default()
    };

    for (key, version_id) in plan.restorations() {
        println!("Restoring... {} (version {})", key, version_id);

        match store.copy_version(bucket, key, version_id).await {
            Ok(()) => {
                println!("Restored: {} (version {})", key, version_id);
                report.restored.push(RestoredKey {
                    key: key.to_string(),
                    version_id: version_id.to_string(),
                });
            }
            Err(e) => match policy {
                FailurePolicy::FailFast => {
                    tracing::error!(
                        key,
                        version_id,
                        already_restored = report.restored.len(),
                        "Restore aborted"
                    );
                    return Err(e);
                }
                FailurePolicy::ContinueOnError => {
                    eprintln!("❌ {}", e);
                    report.failures.push(e);
                }
            },
        }
    }

    Ok(report)
}
