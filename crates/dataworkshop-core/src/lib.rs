//! Core contracts for dataworkshop.
//!
//! This crate defines the column specification model, the dataset document
//! accepted by generators, and the validation rules that gate generation.

pub mod column;
pub mod dataset;
pub mod error;
pub mod report;
pub mod validation;

pub use column::{
    ColumnKind, ColumnSpec, DECIMAL_SCALE, DEFAULT_SEQUENCE_COUNT, ENUM_SEPARATORS, EnumValues,
    SemanticType, decimal_scaled_range, split_enum_values,
};
pub use dataset::{
    DEFAULT_DATASET_NAME, DEFAULT_ROWS, DatasetSpec, DocumentFormat, dataset_json_schema,
};
pub use error::{Error, Result};
pub use report::{IssueSeverity, ValidationIssue, ValidationReport};
pub use validation::{ensure_valid, validate_columns, validate_dataset, validate_dataset_json};
