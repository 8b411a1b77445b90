use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Default number of values in a named-sequence pool.
pub const DEFAULT_SEQUENCE_COUNT: i64 = 5;

/// Separators accepted between enum values: ASCII comma, full-width comma
/// and the full-width enumeration mark.
pub const ENUM_SEPARATORS: &[char] = &[',', '，', '、'];

/// Semantic type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Identifier,
    Enum,
    Date,
    PersonName,
    Company,
    City,
    Country,
    Integer,
    Decimal,
    NamedSequence,
}

impl SemanticType {
    pub const ALL: [SemanticType; 10] = [
        SemanticType::Identifier,
        SemanticType::Enum,
        SemanticType::Date,
        SemanticType::PersonName,
        SemanticType::Company,
        SemanticType::City,
        SemanticType::Country,
        SemanticType::Integer,
        SemanticType::Decimal,
        SemanticType::NamedSequence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Enum => "enum",
            Self::Date => "date",
            Self::PersonName => "person_name",
            Self::Company => "company",
            Self::City => "city",
            Self::Country => "country",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::NamedSequence => "named_sequence",
        }
    }

    /// Types whose values are drawn from a pool materialized once per run.
    pub fn is_pooled(self) -> bool {
        matches!(
            self,
            Self::PersonName | Self::Company | Self::City | Self::Country | Self::NamedSequence
        )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enumerated values as typed by a user (one separated string) or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnumValues {
    Text(String),
    List(Vec<String>),
}

impl EnumValues {
    /// Split, trim and drop empty entries. Order and repeats are preserved.
    pub fn cleaned(&self) -> Vec<String> {
        match self {
            EnumValues::Text(text) => split_enum_values(text),
            EnumValues::List(items) => items
                .iter()
                .flat_map(|item| split_enum_values(item))
                .collect(),
        }
    }
}

/// Split user input on [`ENUM_SEPARATORS`], trimming and dropping empties.
pub fn split_enum_values(input: &str) -> Vec<String> {
    input
        .split(ENUM_SEPARATORS)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Type-specific parameters of a column, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Fresh UUID per row.
    Identifier,
    /// Uniform draw from user supplied values.
    Enum { values: EnumValues },
    /// Uniform draw from an inclusive date range. No range yields empty cells.
    Date {
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "deserialize_date"
        )]
        start_date: Option<NaiveDate>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "deserialize_date"
        )]
        end_date: Option<NaiveDate>,
    },
    PersonName { distinct_count: i64 },
    Company { distinct_count: i64 },
    City { distinct_count: i64 },
    Country { distinct_count: i64 },
    /// Uniform integer in `[min, max]`.
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Uniform decimal in `[min, max)`, two decimal places.
    Decimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Values `<column name>1 ..= <column name>N`.
    NamedSequence {
        #[serde(default = "default_sequence_count")]
        distinct_count: i64,
    },
}

fn default_sequence_count() -> i64 {
    DEFAULT_SEQUENCE_COUNT
}

/// Dates as written in documents: `"2024-01-01"` or a bare TOML date.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Text(String),
    Toml(toml::value::Datetime),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(input) = Option::<DateInput>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match input {
        DateInput::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|err| de::Error::custom(format!("invalid date '{text}': {err}"))),
        DateInput::Toml(datetime) => {
            let date = match (datetime.date, datetime.time) {
                (Some(date), None) => date,
                _ => {
                    return Err(de::Error::custom(format!(
                        "expected a date without time, got {datetime}"
                    )));
                }
            };
            NaiveDate::from_ymd_opt(
                i32::from(date.year),
                u32::from(date.month),
                u32::from(date.day),
            )
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date {datetime}")))
        }
    }
}

/// Decimal places kept by decimal columns.
pub const DECIMAL_SCALE: i32 = 2;

/// Inclusive range of scaled integers `k` such that `min <= k / 10^scale < max`.
///
/// Returns `None` when the bounds are not finite, exceed the exactly
/// representable integer range once scaled, or no such value exists.
pub fn decimal_scaled_range(min: f64, max: f64) -> Option<(i64, i64)> {
    const MAX_EXACT: f64 = 9_007_199_254_740_991.0;

    let factor = 10_f64.powi(DECIMAL_SCALE);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if (min * factor).abs() >= MAX_EXACT || (max * factor).abs() >= MAX_EXACT {
        return None;
    }
    let scaled = |value: i64| value as f64 / factor;

    let mut low = (min * factor).ceil() as i64;
    while scaled(low) < min {
        low += 1;
    }
    while scaled(low - 1) >= min {
        low -= 1;
    }

    let mut high = (max * factor).ceil() as i64;
    while scaled(high) >= max {
        high -= 1;
    }

    (low <= high).then_some((low, high))
}

impl ColumnKind {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            ColumnKind::Identifier => SemanticType::Identifier,
            ColumnKind::Enum { .. } => SemanticType::Enum,
            ColumnKind::Date { .. } => SemanticType::Date,
            ColumnKind::PersonName { .. } => SemanticType::PersonName,
            ColumnKind::Company { .. } => SemanticType::Company,
            ColumnKind::City { .. } => SemanticType::City,
            ColumnKind::Country { .. } => SemanticType::Country,
            ColumnKind::Integer { .. } => SemanticType::Integer,
            ColumnKind::Decimal { .. } => SemanticType::Decimal,
            ColumnKind::NamedSequence { .. } => SemanticType::NamedSequence,
        }
    }

    /// Pool size for pooled kinds, `None` otherwise.
    pub fn distinct_count(&self) -> Option<i64> {
        match self {
            ColumnKind::PersonName { distinct_count }
            | ColumnKind::Company { distinct_count }
            | ColumnKind::City { distinct_count }
            | ColumnKind::Country { distinct_count }
            | ColumnKind::NamedSequence { distinct_count } => Some(*distinct_count),
            _ => None,
        }
    }
}

/// Description of one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSpec {
    /// Header of the output column. Should be unique within a dataset.
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.kind.semantic_type()
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(name, ColumnKind::Identifier)
    }

    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(
            name,
            ColumnKind::Integer {
                min: Some(min),
                max: Some(max),
            },
        )
    }

    pub fn decimal(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(
            name,
            ColumnKind::Decimal {
                min: Some(min),
                max: Some(max),
            },
        )
    }

    pub fn enumeration(name: impl Into<String>, values: impl Into<String>) -> Self {
        Self::new(
            name,
            ColumnKind::Enum {
                values: EnumValues::Text(values.into()),
            },
        )
    }

    pub fn date(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(
            name,
            ColumnKind::Date {
                start_date: Some(start_date),
                end_date: Some(end_date),
            },
        )
    }

    pub fn named_sequence(name: impl Into<String>, distinct_count: i64) -> Self {
        Self::new(name, ColumnKind::NamedSequence { distinct_count })
    }
}
