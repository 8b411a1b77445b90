use thiserror::Error;

use crate::report::ValidationReport;

/// Core error type shared across dataworkshop crates.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// The JSON Schema itself could not be compiled.
    #[error("schema error: {0}")]
    Schema(String),
    /// Document extension is neither `.toml` nor `.json`.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    /// The dataset document failed validation.
    #[error("invalid dataset: {0}")]
    InvalidSpec(ValidationReport),
}

/// Convenience alias for results returned by dataworkshop crates.
pub type Result<T> = std::result::Result<T, Error>;
