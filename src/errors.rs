use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid timestamp {input:?}: {reason}")]
    TimestampParse { input: String, reason: String },

    #[error("Failed to list object versions in s3://{bucket}/{prefix}: {reason}")]
    CatalogFetch {
        bucket: String,
        prefix: String,
        reason: String,
    },

    #[error("Failed to restore {key} to version {version_id}: {reason}")]
    Copy {
        key: String,
        version_id: String,
        reason: String,
    },

    #[error("{failed} of {attempted} restorations failed")]
    PartialRestore { failed: usize, attempted: usize },
}

pub type Result<T> = std::result::Result<T, AppError>;
