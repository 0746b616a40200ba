use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeesError {
    #[error("Config directory not found at {0}. Run 'fees init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Payment amount must be greater than zero")]
    InvalidAmount,

    #[error("Payment would exceed remaining balance for student '{student}' (max {max} remaining)")]
    AmountTooHigh { student: String, max: i64 },

    #[error("Student '{0}' has no outstanding balance for this year; nothing left to pay")]
    FullyPaid(String),

    #[error("Unknown payment method '{0}'. Use 'cash' or 'mobile-money'.")]
    UnknownPaymentMethod(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("API request failed: {0}")]
    Api(#[from] ureq::Error),

    #[error("API rejected the request: {0}")]
    ApiRejected(String),

    #[error("Failed to decode API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notification dispatch failed: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeesError>;
