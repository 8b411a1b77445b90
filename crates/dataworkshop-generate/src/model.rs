use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dataworkshop_core::{SemanticType, ValidationIssue};

/// Options for the generation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Locale overriding the dataset document (ex.: `pt_BR`).
    pub locale: Option<String>,
    /// Seed overriding the dataset document.
    pub seed: Option<u64>,
    /// Treat validation warnings as errors.
    pub strict: bool,
    /// Run id to stamp on the report; a fresh UUID v4 when absent.
    pub run_id: Option<String>,
}

/// Summary of one materialized pool.
#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    pub column: String,
    pub semantic_type: SemanticType,
    pub size: usize,
    pub unique_values: usize,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub dataset: String,
    pub seed: u64,
    pub locale: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub columns: usize,
    pub provider_usage: BTreeMap<String, u64>,
    pub pools: Vec<PoolReport>,
    pub null_count: u64,
    pub warnings: Vec<ValidationIssue>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, dataset: String, seed: u64, locale: String) -> Self {
        Self {
            run_id,
            dataset,
            seed,
            locale,
            rows_requested: 0,
            rows_generated: 0,
            columns: 0,
            provider_usage: BTreeMap::new(),
            pools: Vec::new(),
            null_count: 0,
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn record_provider_usage(&mut self, id: &str, count: u64) {
        *self.provider_usage.entry(id.to_string()).or_insert(0) += count;
    }
}
