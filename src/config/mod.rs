// s3restore/src/config/mod.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::errors::AppError;
use crate::restore::FailurePolicy;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// Structs for deserializing config.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonS3StorageConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJsonConfig {
    pub s3_storage: Option<JsonS3StorageConfig>,
}

// Application's internal configuration structs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

/// Bucket, prefix and restore point shared by both commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub bucket: String,
    pub prefix: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationConfig {
    Restore {
        target: TargetConfig,
        policy: FailurePolicy,
    },
    List(TargetConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub operation: Option<OperationConfig>,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Loads the config file at `config_path`, or `config.json` if present.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_json(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load_from_json(default_path)
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                    Self::from_raw(RawJsonConfig::default())
                }
            }
        }
    }

    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;

        Self::from_raw(raw_json_config)
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))
    }

    fn from_raw(raw_json_config: RawJsonConfig) -> Result<Self> {
        let s3_raw = raw_json_config.s3_storage.unwrap_or_default();
        let storage = StorageConfig {
            region: non_empty(s3_raw.region),
            endpoint_url: non_empty(s3_raw.endpoint_url),
            force_path_style: s3_raw.force_path_style.unwrap_or(false),
        };
        if let Some(endpoint_url) = &storage.endpoint_url {
            validate_endpoint_url(endpoint_url)?;
        }

        Ok(AppConfig {
            operation: None, // To be filled by main after parsing CLI args
            storage,
        })
    }

    /// Applies command-line overrides on top of the file configuration.
    pub fn with_overrides(mut self, region: Option<String>, endpoint_url: Option<String>) -> Result<Self> {
        if let Some(region) = non_empty(region) {
            self.storage.region = Some(region);
        }
        if let Some(endpoint_url) = non_empty(endpoint_url) {
            validate_endpoint_url(&endpoint_url)?;
            self.storage.endpoint_url = Some(endpoint_url);
        }
        Ok(self)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_endpoint_url(endpoint_url: &str) -> std::result::Result<(), AppError> {
    let parsed = url::Url::parse(endpoint_url)
        .map_err(|e| AppError::Config(format!("endpoint_url {:?} is not a valid URL: {}", endpoint_url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::Config(format!(
            "endpoint_url must use http or https, got {:?}",
            other
        ))),
    }
}
