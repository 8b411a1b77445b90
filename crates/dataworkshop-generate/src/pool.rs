use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use dataworkshop_core::{ColumnKind, ColumnSpec, SemanticType};

use crate::errors::GenerationError;
use crate::faker_rs::{FakerKind, LocaleKey};
use crate::generators::semantic::{faker_pool, named_sequence_pool};
use crate::seed::hash_seed;

/// Pre-synthesized values of one pooled column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolEntry {
    pub column: String,
    pub semantic_type: SemanticType,
    pub values: Vec<String>,
}

impl PoolEntry {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct strings in the pool (at most `len()`).
    pub fn unique_count(&self) -> usize {
        let mut unique: Vec<&str> = self.values.iter().map(String::as_str).collect();
        unique.sort_unstable();
        unique.dedup();
        unique.len()
    }
}

/// Closed per-run pools for pooled columns, keyed by column position.
///
/// Positions keep duplicate column names independent; [`GenerationPool::by_name`]
/// resolves the first column with a given name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationPool {
    entries: BTreeMap<usize, PoolEntry>,
}

impl GenerationPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ordinal: usize, entry: PoolEntry) {
        self.entries.insert(ordinal, entry);
    }

    pub fn get(&self, ordinal: usize) -> Option<&PoolEntry> {
        self.entries.get(&ordinal)
    }

    pub fn by_name(&self, column: &str) -> Option<&PoolEntry> {
        self.entries.values().find(|entry| entry.column == column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PoolEntry)> {
        self.entries.iter().map(|(ordinal, entry)| (*ordinal, entry))
    }
}

/// Build one pool of exactly `distinct_count` values per pooled column.
///
/// Each column draws from its own RNG derived from `seed`, its position and
/// its name, so pools do not depend on each other.
pub fn materialize_pools(
    columns: &[ColumnSpec],
    locale: LocaleKey,
    seed: u64,
) -> Result<GenerationPool, GenerationError> {
    let mut pool = GenerationPool::new();

    for (ordinal, column) in columns.iter().enumerate() {
        let Some(count) = column.kind.distinct_count() else {
            continue;
        };
        let count = usize::try_from(count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                GenerationError::contract(
                    &column.name,
                    format!("distinct_count must be >= 1, got {count}"),
                )
            })?;

        let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, &pool_key(ordinal, &column.name)));
        let faker = match &column.kind {
            ColumnKind::PersonName { .. } => Some(FakerKind::PersonName),
            ColumnKind::Company { .. } => Some(FakerKind::Company),
            ColumnKind::City { .. } => Some(FakerKind::City),
            ColumnKind::Country { .. } => Some(FakerKind::Country),
            ColumnKind::NamedSequence { .. } => None,
            _ => continue,
        };
        let (values, provider) = match faker {
            Some(kind) => (faker_pool(kind, locale, count, &mut rng), kind.id()),
            None => (named_sequence_pool(&column.name, count), "sequence.named"),
        };

        debug!(
            column = %column.name,
            semantic_type = %column.semantic_type(),
            provider,
            size = values.len(),
            "pool materialized"
        );

        pool.insert(
            ordinal,
            PoolEntry {
                column: column.name.clone(),
                semantic_type: column.semantic_type(),
                values,
            },
        );
    }

    Ok(pool)
}

fn pool_key(ordinal: usize, column: &str) -> String {
    format!("pool.{ordinal}.{column}")
}
