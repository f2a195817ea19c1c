//! Version records and the storage seam they are fetched through.

pub(crate) mod s3_store;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::errors::Result;

/// One stored revision of one object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub key: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub is_latest: bool,
}

/// Version records for a bucket and prefix, in the order storage returned them.
///
/// Storage lists each key's versions most recent first, interleaved with other
/// keys. Planning relies on that order and does not re-sort; see
/// [`VersionCatalog::is_newest_first`] for a diagnostic check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    records: Vec<VersionRecord>,
}

impl VersionCatalog {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns false if any key has a record listed after an older one of the
    /// same key. Equal timestamps are accepted.
    pub fn is_newest_first(&self) -> bool {
        let mut previous: HashMap<&str, DateTime<Utc>> = HashMap::new();
        for record in &self.records {
            if let Some(prev) = previous.insert(record.key.as_str(), record.last_modified) {
                if record.last_modified > prev {
                    return false;
                }
            }
        }
        true
    }
}

/// Storage operations needed for point-in-time restore.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Lists the versions stored under `prefix`. Only a single page is fetched.
    async fn list_versions(&self, bucket: &str, prefix: &str) -> Result<VersionCatalog>;

    /// Copies `version_id` of `key` over the current object of the same key.
    async fn copy_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) fn record(key: &str, version_id: &str, secs: i64, is_latest: bool) -> VersionRecord {
    VersionRecord {
        key: key.to_string(),
        version_id: version_id.to_string(),
        last_modified: DateTime::from_timestamp(secs, 0).expect("valid test timestamp"),
        is_latest,
    }
}
