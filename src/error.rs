use thiserror::Error;

/// Why an inbound feed record was dropped.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field `{field}` is not numeric")]
    NonNumeric { field: &'static str },
    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Rejected scene configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
