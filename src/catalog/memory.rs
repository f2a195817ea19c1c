//! In-memory [`VersionStore`] used by unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{VersionCatalog, VersionRecord, VersionStore};
use crate::errors::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCall {
    pub bucket: String,
    pub key: String,
    pub version_id: String,
}

#[derive(Default)]
pub struct MemoryStore {
    records: Vec<VersionRecord>,
    fail_list: bool,
    /// 1-based index of copy calls that fail.
    failing_copies: Vec<usize>,
    calls: Mutex<Vec<CopyCall>>,
}

impl MemoryStore {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }

    pub fn fail_copy(mut self, nth: usize) -> Self {
        self.failing_copies.push(nth);
        self
    }

    pub fn calls(&self) -> Vec<CopyCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn list_versions(&self, bucket: &str, prefix: &str) -> Result<VersionCatalog> {
        if self.fail_list {
            return Err(AppError::CatalogFetch {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                reason: "access denied".to_string(),
            });
        }
        let records = self
            .records
            .iter()
            .filter(|r| r.key.starts_with(prefix))
            .cloned()
            .collect();
        Ok(VersionCatalog::new(records))
    }

    async fn copy_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(CopyCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            version_id: version_id.to_string(),
        });
        if self.failing_copies.contains(&calls.len()) {
            return Err(AppError::Copy {
                key: key.to_string(),
                version_id: version_id.to_string(),
                reason: "internal error".to_string(),
            });
        }
        Ok(())
    }
}
