use std::collections::BTreeMap;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::column::{ColumnKind, ColumnSpec, decimal_scaled_range};
use crate::dataset::DatasetSpec;
use crate::error::{Error, Result};
use crate::report::{ValidationIssue, ValidationReport};

/// Validate every column of a dataset, collecting all issues.
///
/// Generation must not start unless the returned report `is_ok()`.
pub fn validate_columns(columns: &[ColumnSpec]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if columns.is_empty() {
        report.push_warning(
            ValidationIssue::warning("no_columns", "/columns", "dataset has no columns")
                .with_hint("rows will be generated without values"),
        );
    }

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, column) in columns.iter().enumerate() {
        let base_path = format!("/columns/{idx}");

        if column.name.trim().is_empty() {
            report.push_error(
                ValidationIssue::error(
                    "empty_column_name",
                    format!("{base_path}/name"),
                    "column name must not be empty",
                )
                .with_hint("give the column a header"),
            );
        } else if let Some(first) = seen.insert(column.name.as_str(), idx) {
            report.push_warning(
                ValidationIssue::warning(
                    "duplicate_column_name",
                    format!("{base_path}/name"),
                    format!(
                        "column '{}' already declared at /columns/{first}",
                        column.name
                    ),
                )
                .with_column(&column.name)
                .with_hint("duplicate columns are generated independently"),
            );
        }

        validate_column(column, &base_path, &mut report);
    }

    report
}

/// Validate a whole dataset request.
pub fn validate_dataset(dataset: &DatasetSpec) -> ValidationReport {
    let mut report = ValidationReport::default();
    if dataset.name.trim().is_empty() {
        report.push_error(
            ValidationIssue::error("empty_dataset_name", "/name", "dataset name must not be empty")
                .with_hint("set name to the sheet or file name to export"),
        );
    }
    report.merge(validate_columns(&dataset.columns));
    report
}

/// Validate a dataset and turn a failing report into [`Error::InvalidSpec`].
pub fn ensure_valid(dataset: &DatasetSpec) -> Result<ValidationReport> {
    let report = validate_dataset(dataset);
    if report.is_ok() {
        Ok(report)
    } else {
        Err(Error::InvalidSpec(report))
    }
}

/// Validate a raw JSON dataset document against the dataset JSON Schema.
pub fn validate_dataset_json(document: &Value, schema: &Value) -> Result<ValidationReport> {
    let compiled = JSONSchema::compile(schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::error(
                "schema_violation",
                path,
                error.to_string(),
            ));
        }
    }

    Ok(report)
}

fn validate_column(column: &ColumnSpec, base_path: &str, report: &mut ValidationReport) {
    match &column.kind {
        ColumnKind::Identifier => {}
        ColumnKind::Enum { values } => {
            if values.cleaned().is_empty() {
                report.push_error(
                    ValidationIssue::error(
                        "enum_values_empty",
                        format!("{base_path}/values"),
                        "enum column has no values after cleaning",
                    )
                    .with_column(&column.name)
                    .with_hint("separate values with ',', '，' or '、'"),
                );
            }
        }
        ColumnKind::Date {
            start_date,
            end_date,
        } => match (start_date, end_date) {
            (Some(start), Some(end)) if start > end => {
                report.push_error(
                    ValidationIssue::error(
                        "date_range_inverted",
                        format!("{base_path}/start_date"),
                        format!("start_date {start} is after end_date {end}"),
                    )
                    .with_column(&column.name)
                    .with_hint("swap the dates or widen the range"),
                );
            }
            (Some(_), Some(_)) => {}
            (None, None) => {
                report.push_warning(
                    ValidationIssue::warning(
                        "date_range_missing",
                        base_path.to_string(),
                        "date column has no range; its cells will be empty",
                    )
                    .with_column(&column.name)
                    .with_hint("set start_date and end_date"),
                );
            }
            (Some(_), None) | (None, Some(_)) => {
                let missing = if start_date.is_none() {
                    "start_date"
                } else {
                    "end_date"
                };
                report.push_error(
                    ValidationIssue::error(
                        "date_range_incomplete",
                        format!("{base_path}/{missing}"),
                        format!("date range is missing {missing}"),
                    )
                    .with_column(&column.name),
                );
            }
        },
        ColumnKind::Integer { min, max } => match (min, max) {
            (Some(min), Some(max)) => {
                if min >= max {
                    push_inverted_range(report, column, base_path, &min, &max);
                }
            }
            _ => push_missing_bound(report, column, base_path, min.is_none()),
        },
        ColumnKind::Decimal { min, max } => match (min, max) {
            (Some(min), Some(max)) => {
                if !min.is_finite() || !max.is_finite() {
                    report.push_error(
                        ValidationIssue::error(
                            "non_finite_bound",
                            base_path.to_string(),
                            "decimal bounds must be finite numbers",
                        )
                        .with_column(&column.name),
                    );
                } else if min >= max {
                    push_inverted_range(report, column, base_path, &min, &max);
                } else if decimal_scaled_range(*min, *max).is_none() {
                    report.push_error(
                        ValidationIssue::error(
                            "decimal_range_empty",
                            base_path.to_string(),
                            format!("no two-decimal value lies in [{min}, {max})"),
                        )
                        .with_column(&column.name)
                        .with_hint("widen the range or use smaller magnitudes"),
                    );
                }
            }
            _ => push_missing_bound(report, column, base_path, min.is_none()),
        },
        ColumnKind::PersonName { distinct_count }
        | ColumnKind::Company { distinct_count }
        | ColumnKind::City { distinct_count }
        | ColumnKind::Country { distinct_count }
        | ColumnKind::NamedSequence { distinct_count } => {
            if *distinct_count <= 0 {
                report.push_error(
                    ValidationIssue::error(
                        "distinct_count_invalid",
                        format!("{base_path}/distinct_count"),
                        format!("distinct_count must be >= 1, got {distinct_count}"),
                    )
                    .with_column(&column.name),
                );
            }
        }
    }
}

fn push_inverted_range<T: std::fmt::Display>(
    report: &mut ValidationReport,
    column: &ColumnSpec,
    base_path: &str,
    min: &T,
    max: &T,
) {
    report.push_error(
        ValidationIssue::error(
            "range_inverted",
            format!("{base_path}/max"),
            format!("max ({max}) must be greater than min ({min})"),
        )
        .with_column(&column.name)
        .with_hint("raise max or lower min"),
    );
}

fn push_missing_bound(
    report: &mut ValidationReport,
    column: &ColumnSpec,
    base_path: &str,
    min_missing: bool,
) {
    let key = if min_missing { "min" } else { "max" };
    report.push_error(
        ValidationIssue::error(
            "missing_bound",
            format!("{base_path}/{key}"),
            format!("{} column requires '{key}'", column.semantic_type()),
        )
        .with_column(&column.name),
    );
}

fn normalized_json_pointer(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
