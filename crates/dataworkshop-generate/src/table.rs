use std::collections::HashSet;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};

use dataworkshop_core::DEFAULT_DATASET_NAME;

use crate::generators::GeneratedValue;

/// One generated row; values follow the table's column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedRow {
    pub values: Vec<GeneratedValue>,
}

impl GeneratedRow {
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            values: Vec::with_capacity(columns),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rows in generation order with named columns in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<GeneratedRow>,
}

impl GeneratedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            name: DEFAULT_DATASET_NAME.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Value at `row` for the first column named `column`.
    pub fn value(&self, row: usize, column: &str) -> Option<&GeneratedValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|row| row.values.get(idx))
    }

    /// All values of the column at position `idx`, in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &GeneratedValue> {
        self.rows.iter().filter_map(move |row| row.values.get(idx))
    }

    pub fn null_count(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter())
            .filter(|value| value.is_null())
            .count() as u64
    }

    /// Column names with repeats suffixed (`v`, `v_2`, `v_3`) so every key is
    /// distinct. Names that are already unique are kept as is.
    pub fn unique_columns(&self) -> Vec<String> {
        let mut taken: HashSet<String> = self.columns.iter().cloned().collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut keys = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            if seen.insert(column.as_str()) {
                keys.push(column.clone());
                continue;
            }
            let key = (2_u64..)
                .map(|n| format!("{column}_{n}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| column.clone());
            taken.insert(key.clone());
            keys.push(key);
        }
        keys
    }

    /// Serializable view of the rows as `{column: value}` records, keyed by
    /// [`GeneratedTable::unique_columns`].
    pub fn records(&self) -> Records<'_> {
        Records {
            table: self,
            keys: self.unique_columns(),
        }
    }
}

/// Rows serialized as JSON objects keyed by column name, in column order.
pub struct Records<'a> {
    table: &'a GeneratedTable,
    keys: Vec<String>,
}

struct Record<'a> {
    columns: &'a [String],
    row: &'a GeneratedRow,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.table.rows.len()))?;
        for row in &self.table.rows {
            seq.serialize_element(&Record {
                columns: &self.keys,
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(&self.row.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
