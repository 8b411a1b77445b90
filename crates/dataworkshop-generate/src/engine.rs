use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use dataworkshop_core::{ColumnSpec, DatasetSpec, ValidationReport, validate_dataset};

use crate::errors::GenerationError;
use crate::faker_rs::{FakeRsAdapter, LocaleKey};
use crate::generators::{ValueProvider, resolve_providers};
use crate::model::{GenerateOptions, GenerationReport, PoolReport};
use crate::pool::{GenerationPool, materialize_pools};
use crate::seed::{hash_row_seed, hash_seed};
use crate::table::{GeneratedRow, GeneratedTable};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub table: GeneratedTable,
    pub pools: GenerationPool,
    pub report: GenerationReport,
}

/// Entry point for generating a dataset: validate, build pools, fill rows.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Validate a dataset with the engine's strictness applied.
    pub fn validate(&self, dataset: &DatasetSpec) -> ValidationReport {
        let mut report = validate_dataset(dataset);
        if self.options.strict {
            report.errors.append(&mut report.warnings);
        }
        report
    }

    pub fn run(&self, dataset: &DatasetSpec) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();

        let validation = self.validate(dataset);
        if !validation.is_ok() {
            warn!(
                dataset = %dataset.name,
                errors = validation.errors.len(),
                "dataset validation failed"
            );
            return Err(GenerationError::InvalidSpec(validation));
        }
        for issue in &validation.warnings {
            warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
        }

        let locale = self.resolve_locale(dataset)?;
        let seed = self
            .options
            .seed
            .or(dataset.seed)
            .unwrap_or_else(|| rand::rng().random());
        let run_id = self
            .options
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        info!(
            run_id = %run_id,
            dataset = %dataset.name,
            rows = dataset.rows,
            columns = dataset.columns.len(),
            seed,
            locale = %locale,
            "generation started"
        );

        let pools = materialize_pools(&dataset.columns, locale, seed)?;
        info!(run_id = %run_id, pools = pools.len(), "pools materialized");

        let providers = resolve_providers(&dataset.columns, &pools)?;
        let table = fill_rows(&dataset.columns, &providers, dataset.rows, seed)
            .with_name(dataset.name.clone());

        let mut report = GenerationReport::new(
            run_id.clone(),
            dataset.name.clone(),
            seed,
            locale.to_string(),
        );
        report.rows_requested = dataset.rows;
        report.rows_generated = table.row_count() as u64;
        report.columns = table.column_count();
        for provider in &providers {
            report.record_provider_usage(provider.id(), report.rows_generated);
        }
        report.pools = pools
            .iter()
            .map(|(_, entry)| PoolReport {
                column: entry.column.clone(),
                semantic_type: entry.semantic_type,
                size: entry.len(),
                unique_values: entry.unique_count(),
            })
            .collect();
        report.null_count = table.null_count();
        report.warnings = validation.warnings;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            rows_generated = report.rows_generated,
            null_count = report.null_count,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            table,
            pools,
            report,
        })
    }

    fn resolve_locale(&self, dataset: &DatasetSpec) -> Result<LocaleKey, GenerationError> {
        let locale = self.options.locale.as_deref().or(dataset.locale.as_deref());
        FakeRsAdapter::resolve_locale(locale)
    }
}

/// Generate `row_count` rows for already validated columns and built pools.
///
/// Rows are independent: each one draws from its own RNG derived from `seed`
/// and its index, and only the read-only pools are shared.
pub fn generate_rows(
    columns: &[ColumnSpec],
    pools: &GenerationPool,
    row_count: u64,
    seed: u64,
) -> Result<GeneratedTable, GenerationError> {
    let providers = resolve_providers(columns, pools)?;
    Ok(fill_rows(columns, &providers, row_count, seed))
}

/// Rows reserved up front; larger tables grow as they fill.
const MAX_PREALLOCATED_ROWS: u64 = 1 << 16;

fn initial_capacity(row_count: u64) -> usize {
    usize::try_from(row_count.min(MAX_PREALLOCATED_ROWS)).unwrap_or(0)
}

fn fill_rows(
    columns: &[ColumnSpec],
    providers: &[ValueProvider<'_>],
    row_count: u64,
    seed: u64,
) -> GeneratedTable {
    let table_seed = hash_seed(seed, "rows");
    let mut table = GeneratedTable::new(columns.iter().map(|col| col.name.clone()).collect());
    table.rows.reserve(initial_capacity(row_count));

    for row_index in 0..row_count {
        let mut rng = ChaCha8Rng::seed_from_u64(hash_row_seed(table_seed, row_index));
        let mut row = GeneratedRow::with_capacity(providers.len());
        for provider in providers {
            row.values.push(provider.generate(&mut rng));
        }
        table.rows.push(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preallocation_is_bounded() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(200), 200);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOCATED_ROWS as usize);
    }
}
