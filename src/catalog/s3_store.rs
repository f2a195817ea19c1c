// s3restore/src/catalog/s3_store.rs
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3 as s3;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::ObjectVersion;
use chrono::{DateTime, Utc};
use s3::config::Region;

use super::{VersionCatalog, VersionRecord, VersionStore};
use crate::config::StorageConfig;
use crate::errors::{AppError, Result};

/// Region used when neither the config file nor the environment names one.
pub const DEFAULT_REGION: &str = "eu-west-1";

/// [`VersionStore`] backed by an S3 (or S3-compatible) endpoint.
pub struct S3VersionStore {
    client: s3::Client,
}

impl S3VersionStore {
    /// Builds a client from the AWS default chain, with region and endpoint
    /// overrides from `storage_config`.
    pub async fn connect(storage_config: &StorageConfig) -> Self {
        let region = RegionProviderChain::first_try(storage_config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(DEFAULT_REGION));

        let mut loader = aws_config::defaults(s3::config::BehaviorVersion::latest()).region(region);
        if let Some(endpoint_url) = &storage_config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        let s3_config = s3::config::Builder::from(&sdk_config)
            .force_path_style(storage_config.force_path_style)
            .build();

        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint = ?storage_config.endpoint_url,
            "S3 client configured"
        );

        Self {
            client: s3::Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl VersionStore for S3VersionStore {
    async fn list_versions(&self, bucket: &str, prefix: &str) -> Result<VersionCatalog> {
        let output = self
            .client
            .list_object_versions()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| AppError::CatalogFetch {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        if output.is_truncated().unwrap_or(false) {
            tracing::warn!(bucket, prefix, "Version listing is truncated; only the first page is used");
        }

        let records = output.versions().iter().filter_map(to_record).collect();
        Ok(VersionCatalog::new(records))
    }

    async fn copy_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(bucket)
            .key(key)
            .copy_source(copy_source(bucket, key, version_id))
            .send()
            .await
            .map_err(|e| AppError::Copy {
                key: key.to_string(),
                version_id: version_id.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}

/// Formats the `x-amz-copy-source` value for a specific version.
///
/// Key segments are percent-encoded; `/` separators are kept as-is.
pub fn copy_source(bucket: &str, key: &str, version_id: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!(
        "{}/{}?versionId={}",
        bucket,
        encoded_key,
        urlencoding::encode(version_id)
    )
}

fn to_record(version: &ObjectVersion) -> Option<VersionRecord> {
    let (Some(key), Some(version_id), Some(modified)) =
        (version.key(), version.version_id(), version.last_modified())
    else {
        tracing::warn!(?version, "Skipping version record with missing fields");
        return None;
    };

    let Some(last_modified) = DateTime::<Utc>::from_timestamp(modified.secs(), modified.subsec_nanos())
    else {
        tracing::warn!(key, version_id, "Skipping version record with out-of-range timestamp");
        return None;
    };

    Some(VersionRecord {
        key: key.to_string(),
        version_id: version_id.to_string(),
        last_modified,
        is_latest: version.is_latest().unwrap_or(false),
    })
}
