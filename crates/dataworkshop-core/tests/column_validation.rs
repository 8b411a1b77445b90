use chrono::NaiveDate;

use dataworkshop_core::{
    ColumnKind, ColumnSpec, DatasetSpec, EnumValues, Error, IssueSeverity, ensure_valid,
    validate_columns, validate_dataset,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

#[test]
fn rejects_integer_range_with_equal_bounds() {
    let report = validate_columns(&[ColumnSpec::integer("age", 10, 10)]);
    assert!(!report.is_ok());
    assert_eq!(report.error_codes(), vec!["range_inverted"]);
    assert_eq!(report.errors[0].path, "/columns/0/max");
    assert_eq!(report.errors[0].column.as_deref(), Some("age"));
}

#[test]
fn rejects_decimal_range_with_inverted_bounds() {
    let report = validate_columns(&[ColumnSpec::decimal("price", 5.5, 1.0)]);
    assert_eq!(report.error_codes(), vec!["range_inverted"]);
}

#[test]
fn rejects_enum_with_only_whitespace() {
    let report = validate_columns(&[ColumnSpec::enumeration("status", "   ")]);
    assert_eq!(report.error_codes(), vec!["enum_values_empty"]);

    let report = validate_columns(&[ColumnSpec::new(
        "status",
        ColumnKind::Enum {
            values: EnumValues::List(vec![" ".to_string(), "、".to_string()]),
        },
    )]);
    assert_eq!(report.error_codes(), vec!["enum_values_empty"]);
}

#[test]
fn rejects_inverted_date_range() {
    let report = validate_columns(&[ColumnSpec::date(
        "signup",
        date(2024, 6, 1),
        date(2024, 1, 1),
    )]);
    assert_eq!(report.error_codes(), vec!["date_range_inverted"]);
}

#[test]
fn accepts_single_day_date_range() {
    let day = date(2024, 2, 29);
    let report = validate_columns(&[ColumnSpec::date("signup", day, day)]);
    assert!(report.is_ok());
    assert!(report.warnings.is_empty());
}

#[test]
fn date_without_range_is_only_a_warning() {
    let report = validate_columns(&[ColumnSpec::new(
        "signup",
        ColumnKind::Date {
            start_date: None,
            end_date: None,
        },
    )]);
    assert!(report.is_ok());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "date_range_missing");
    assert_eq!(report.warnings[0].severity, IssueSeverity::Warning);
}

#[test]
fn rejects_half_open_date_range() {
    let report = validate_columns(&[ColumnSpec::new(
        "signup",
        ColumnKind::Date {
            start_date: Some(date(2024, 1, 1)),
            end_date: None,
        },
    )]);
    assert_eq!(report.error_codes(), vec!["date_range_incomplete"]);
    assert_eq!(report.errors[0].path, "/columns/0/end_date");
}

#[test]
fn rejects_missing_numeric_bound() {
    let report = validate_columns(&[ColumnSpec::new(
        "age",
        ColumnKind::Integer {
            min: None,
            max: Some(3),
        },
    )]);
    assert_eq!(report.error_codes(), vec!["missing_bound"]);
    assert_eq!(report.errors[0].path, "/columns/0/min");
}

#[test]
fn rejects_non_positive_distinct_count() {
    let report = validate_columns(&[
        ColumnSpec::new("owner", ColumnKind::PersonName { distinct_count: 0 }),
        ColumnSpec::named_sequence("Product", -3),
    ]);
    assert_eq!(
        report.error_codes(),
        vec!["distinct_count_invalid", "distinct_count_invalid"]
    );
}

#[test]
fn rejects_decimal_range_without_two_place_values() {
    let report = validate_columns(&[ColumnSpec::decimal("rate", 0.001, 0.004)]);
    assert_eq!(report.error_codes(), vec!["decimal_range_empty"]);

    let report = validate_columns(&[ColumnSpec::decimal("rate", f64::NEG_INFINITY, 1.0)]);
    assert_eq!(report.error_codes(), vec!["non_finite_bound"]);
}

#[test]
fn collects_every_violation_in_one_report() {
    let columns = vec![
        ColumnSpec::integer("age", 65, 18),
        ColumnSpec::enumeration("status", ""),
        ColumnSpec::date("signup", date(2024, 6, 1), date(2024, 1, 1)),
        ColumnSpec::identifier("id"),
    ];
    let report = validate_columns(&columns);
    assert_eq!(
        report.column_errors(),
        vec![
            ("age", "max (18) must be greater than min (65)"),
            ("status", "enum column has no values after cleaning"),
            ("signup", "start_date 2024-06-01 is after end_date 2024-01-01"),
        ]
    );
}

#[test]
fn duplicate_names_are_allowed_with_warning() {
    let report = validate_columns(&[ColumnSpec::identifier("id"), ColumnSpec::identifier("id")]);
    assert!(report.is_ok());
    assert_eq!(report.warnings[0].code, "duplicate_column_name");
    assert_eq!(report.warnings[0].path, "/columns/1/name");
}

#[test]
fn empty_column_name_is_rejected() {
    let report = validate_columns(&[ColumnSpec::identifier("  ")]);
    assert_eq!(report.error_codes(), vec!["empty_column_name"]);
}

#[test]
fn ensure_valid_wraps_failing_report() {
    let dataset = DatasetSpec::new("Fake Data", 10, vec![ColumnSpec::integer("n", 1, 1)]);
    match ensure_valid(&dataset) {
        Err(Error::InvalidSpec(report)) => assert_eq!(report.errors.len(), 1),
        other => panic!("expected invalid spec, got {other:?}"),
    }

    let dataset = DatasetSpec::new("", 10, vec![ColumnSpec::identifier("id")]);
    assert_eq!(validate_dataset(&dataset).error_codes(), vec!["empty_dataset_name"]);
}
