pub mod primitives;
pub mod semantic;

use chrono::NaiveDate;
use rand::RngCore;
use serde::{Serialize, Serializer};

use dataworkshop_core::{
    ColumnKind, ColumnSpec, DECIMAL_SCALE, SemanticType, decimal_scaled_range,
};

use crate::errors::GenerationError;
use crate::pool::GenerationPool;

/// Generated value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(String),
    Date(NaiveDate),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    pub fn to_csv(&self) -> String {
        match self {
            GeneratedValue::Null => String::new(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => {
                let scale = DECIMAL_SCALE as usize;
                format!("{value:.scale$}")
            }
            GeneratedValue::Text(value) | GeneratedValue::Uuid(value) => value.clone(),
            GeneratedValue::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) | GeneratedValue::Uuid(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            GeneratedValue::Date(value) => Some(*value),
            _ => None,
        }
    }
}

impl Serialize for GeneratedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GeneratedValue::Null => serializer.serialize_none(),
            GeneratedValue::Int(value) => serializer.serialize_i64(*value),
            GeneratedValue::Float(value) => serializer.serialize_f64(*value),
            GeneratedValue::Text(value) | GeneratedValue::Uuid(value) => {
                serializer.serialize_str(value)
            }
            GeneratedValue::Date(value) => {
                serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
            }
        }
    }
}

/// Value provider for one column, resolved once per run.
///
/// Resolution checks the parameters each semantic type requires; after that,
/// [`ValueProvider::generate`] cannot fail.
#[derive(Debug, Clone)]
pub enum ValueProvider<'a> {
    Identifier,
    Integer { min: i64, max: i64 },
    Decimal { low: i64, high: i64 },
    Enum { values: Vec<String> },
    Date { start: NaiveDate, span_days: i64 },
    /// Date column without a configured range.
    Empty,
    Pool {
        semantic_type: SemanticType,
        values: &'a [String],
    },
}

impl<'a> ValueProvider<'a> {
    pub fn resolve(
        ordinal: usize,
        column: &ColumnSpec,
        pools: &'a GenerationPool,
    ) -> Result<Self, GenerationError> {
        match &column.kind {
            ColumnKind::Identifier => Ok(Self::Identifier),
            ColumnKind::Integer { min, max } => {
                let (Some(min), Some(max)) = (*min, *max) else {
                    return Err(GenerationError::contract(
                        &column.name,
                        "integer column requires min and max",
                    ));
                };
                if min > max {
                    return Err(GenerationError::contract(
                        &column.name,
                        format!("integer range [{min}, {max}] is inverted"),
                    ));
                }
                Ok(Self::Integer { min, max })
            }
            ColumnKind::Decimal { min, max } => {
                let (Some(min), Some(max)) = (*min, *max) else {
                    return Err(GenerationError::contract(
                        &column.name,
                        "decimal column requires min and max",
                    ));
                };
                let (low, high) = decimal_scaled_range(min, max).ok_or_else(|| {
                    GenerationError::contract(
                        &column.name,
                        format!("decimal range [{min}, {max}) holds no two-decimal value"),
                    )
                })?;
                Ok(Self::Decimal { low, high })
            }
            ColumnKind::Enum { values } => {
                let values = values.cleaned();
                if values.is_empty() {
                    return Err(GenerationError::contract(
                        &column.name,
                        "enum column has no values",
                    ));
                }
                Ok(Self::Enum { values })
            }
            ColumnKind::Date {
                start_date,
                end_date,
            } => match (start_date, end_date) {
                (Some(start), Some(end)) if start <= end => Ok(Self::Date {
                    start: *start,
                    span_days: (*end - *start).num_days(),
                }),
                (None, None) => Ok(Self::Empty),
                _ => Err(GenerationError::contract(
                    &column.name,
                    "date column requires start_date <= end_date",
                )),
            },
            ColumnKind::PersonName { .. }
            | ColumnKind::Company { .. }
            | ColumnKind::City { .. }
            | ColumnKind::Country { .. }
            | ColumnKind::NamedSequence { .. } => {
                let entry = pools
                    .get(ordinal)
                    .filter(|entry| !entry.is_empty())
                    .ok_or_else(|| {
                        GenerationError::contract(&column.name, "pooled column has no pool")
                    })?;
                Ok(Self::Pool {
                    semantic_type: column.semantic_type(),
                    values: &entry.values,
                })
            }
        }
    }

    /// Identifier used in usage reports.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Identifier => "primitive.uuid.v4",
            Self::Integer { .. } => "primitive.int.range",
            Self::Decimal { .. } => "primitive.decimal.range",
            Self::Enum { .. } => "primitive.enum",
            Self::Date { .. } => "primitive.date.range",
            Self::Empty => "primitive.null",
            Self::Pool { semantic_type, .. } => match semantic_type {
                SemanticType::PersonName => "pool.person_name",
                SemanticType::Company => "pool.company",
                SemanticType::City => "pool.city",
                SemanticType::Country => "pool.country",
                _ => "pool.named_sequence",
            },
        }
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> GeneratedValue {
        match self {
            Self::Identifier => primitives::uuid_v4(rng),
            Self::Integer { min, max } => primitives::int_range(*min, *max, rng),
            Self::Decimal { low, high } => primitives::decimal_scaled(*low, *high, rng),
            Self::Enum { values } => primitives::pick_text(values, rng),
            Self::Date { start, span_days } => primitives::date_range(*start, *span_days, rng),
            Self::Empty => GeneratedValue::Null,
            Self::Pool { values, .. } => primitives::pick_text(values, rng),
        }
    }
}

/// Resolve providers for every column, in column order.
pub fn resolve_providers<'a>(
    columns: &[ColumnSpec],
    pools: &'a GenerationPool,
) -> Result<Vec<ValueProvider<'a>>, GenerationError> {
    columns
        .iter()
        .enumerate()
        .map(|(ordinal, column)| ValueProvider::resolve(ordinal, column, pools))
        .collect()
}
