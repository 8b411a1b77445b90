use std::path::Path;

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnSpec;
use crate::error::{Error, Result};

/// Dataset name used when the document does not set one.
pub const DEFAULT_DATASET_NAME: &str = "Fake Data";
/// Row count used when the document does not set one.
pub const DEFAULT_ROWS: u64 = 200;

/// A dataset request: columns, row count and generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DatasetSpec {
    /// Dataset name; also used as the export file stem.
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of rows to generate.
    #[serde(default = "default_rows")]
    pub rows: u64,
    /// Seed for reproducible output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Locale for name/company/city/country values (ex.: `zh_CN`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Output columns, in order.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

fn default_name() -> String {
    DEFAULT_DATASET_NAME.to_string()
}

fn default_rows() -> u64 {
    DEFAULT_ROWS
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            name: default_name(),
            rows: DEFAULT_ROWS,
            seed: None,
            locale: None,
            columns: Vec::new(),
        }
    }
}

impl DatasetSpec {
    pub fn new(name: impl Into<String>, rows: u64, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a `.toml` or `.json` document.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match DocumentFormat::from_path(path)? {
            DocumentFormat::Toml => Self::from_toml_str(&content),
            DocumentFormat::Json => Self::from_json_str(&content),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Supported on-disk formats for dataset documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// JSON Schema describing a dataset document.
pub fn dataset_json_schema() -> Result<Value> {
    let schema = schema_for!(DatasetSpec);
    Ok(serde_json::to_value(&schema)?)
}
