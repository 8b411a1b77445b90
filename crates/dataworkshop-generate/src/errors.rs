use thiserror::Error;

use dataworkshop_core::ValidationReport;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The dataset failed validation; no row was generated.
    #[error("invalid dataset: {0}")]
    InvalidSpec(ValidationReport),
    /// A column reached a provider without the parameters its type requires.
    /// Validation rejects such columns, so this signals a caller bug.
    #[error("contract violation on column '{column}': {reason}")]
    ContractViolation { column: String, reason: String },
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    pub(crate) fn contract(column: &str, reason: impl Into<String>) -> Self {
        GenerationError::ContractViolation {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
