use chrono::NaiveDate;

use dataworkshop_core::{ColumnKind, ColumnSpec, DatasetSpec, EnumValues};
use dataworkshop_generate::{
    GenerateOptions, GeneratedValue, GenerationEngine, GenerationError, GenerationPool,
    generate_rows,
};

fn sample_columns() -> Vec<ColumnSpec> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("start date");
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("end date");
    vec![
        ColumnSpec::identifier("id"),
        ColumnSpec::integer("age", 18, 65),
        ColumnSpec::enumeration("status", "A、B"),
        ColumnSpec::date("signup", start, end),
        ColumnSpec::decimal("balance", 0.0, 1000.0),
        ColumnSpec::new("owner", ColumnKind::PersonName { distinct_count: 10 }),
        ColumnSpec::named_sequence("Product", 5),
    ]
}

fn engine_with_seed(seed: u64) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        ..GenerateOptions::default()
    })
}

#[test]
fn generates_requested_rows_in_column_order() {
    let dataset = DatasetSpec::new("people", 100, sample_columns());
    let result = engine_with_seed(42).run(&dataset).expect("generation");

    let table = &result.table;
    assert_eq!(table.name, "people");
    assert_eq!(table.row_count(), 100);
    assert_eq!(
        table.columns,
        ["id", "age", "status", "signup", "balance", "owner", "Product"]
    );
    assert!(table.rows.iter().all(|row| row.len() == 7));

    for row in 0..table.row_count() {
        let age = table.value(row, "age").and_then(GeneratedValue::as_i64);
        assert!(matches!(age, Some(18..=65)), "age {age:?}");
        let status = table.value(row, "status").and_then(GeneratedValue::as_str);
        assert!(matches!(status, Some("A" | "B")), "status {status:?}");
    }
}

#[test]
fn report_describes_the_run() {
    let dataset = DatasetSpec::new("people", 50, sample_columns());
    let result = engine_with_seed(9).run(&dataset).expect("generation");
    let report = &result.report;

    assert_eq!(report.seed, 9);
    assert_eq!(report.locale, "en_US");
    assert_eq!(report.rows_requested, 50);
    assert_eq!(report.rows_generated, 50);
    assert_eq!(report.columns, 7);
    assert_eq!(report.null_count, 0);
    assert_eq!(report.provider_usage.get("primitive.int.range"), Some(&50));
    assert_eq!(report.provider_usage.get("pool.person_name"), Some(&50));
    assert_eq!(report.pools.len(), 2);
    assert!(report.pools.iter().any(|pool| pool.column == "Product" && pool.size == 5));
    assert!(report.warnings.is_empty());
}

#[test]
fn row_counts_match_for_edge_sizes() {
    for rows in [0_u64, 1, 5_000] {
        let dataset = DatasetSpec::new("sizes", rows, sample_columns());
        let result = engine_with_seed(1).run(&dataset).expect("generation");
        assert_eq!(result.table.row_count() as u64, rows);
    }
}

#[test]
fn no_columns_yields_empty_rows_and_a_warning() {
    let dataset = DatasetSpec::new("empty", 3, Vec::new());
    let result = engine_with_seed(1).run(&dataset).expect("generation");
    assert_eq!(result.table.row_count(), 3);
    assert!(result.table.rows.iter().all(|row| row.is_empty()));
    assert!(result.report.warnings.iter().any(|issue| issue.code == "no_columns"));
}

#[test]
fn same_seed_reproduces_the_table() {
    let dataset = DatasetSpec::new("repeat", 200, sample_columns());
    let first = engine_with_seed(7).run(&dataset).expect("first run");
    let second = engine_with_seed(7).run(&dataset).expect("second run");
    assert_eq!(first.table, second.table);
    assert_eq!(first.pools, second.pools);
    assert_ne!(first.report.run_id, second.report.run_id);

    let other = engine_with_seed(8).run(&dataset).expect("other run");
    assert_ne!(first.table, other.table);
}

#[test]
fn options_override_document_settings() {
    let mut dataset = DatasetSpec::new("override", 5, sample_columns());
    dataset.seed = Some(1);
    dataset.locale = Some("pt_BR".to_string());

    let from_document = GenerationEngine::default().run(&dataset).expect("document run");
    assert_eq!(from_document.report.seed, 1);
    assert_eq!(from_document.report.locale, "pt_BR");

    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(2),
        locale: Some("zh_CN".to_string()),
        run_id: Some("fixed-run".to_string()),
        ..GenerateOptions::default()
    });
    let overridden = engine.run(&dataset).expect("overridden run");
    assert_eq!(overridden.report.seed, 2);
    assert_eq!(overridden.report.locale, "zh_CN");
    assert_eq!(overridden.report.run_id, "fixed-run");
}

#[test]
fn duplicate_column_names_are_generated_independently() {
    let columns = vec![
        ColumnSpec::integer("value", 0, 1_000_000),
        ColumnSpec::integer("value", 0, 1_000_000),
    ];
    let dataset = DatasetSpec::new("dupes", 50, columns);
    let result = engine_with_seed(3).run(&dataset).expect("generation");

    assert_eq!(result.table.column_count(), 2);
    let first: Vec<_> = result.table.column_values(0).collect();
    let second: Vec<_> = result.table.column_values(1).collect();
    assert_ne!(first, second);
    assert!(
        result
            .report
            .warnings
            .iter()
            .any(|issue| issue.code == "duplicate_column_name")
    );
}

#[test]
fn invalid_dataset_generates_nothing() {
    let columns = vec![
        ColumnSpec::integer("age", 65, 18),
        ColumnSpec::enumeration("status", " , 、"),
    ];
    let dataset = DatasetSpec::new("broken", 10, columns);
    let err = engine_with_seed(1).run(&dataset).expect_err("validation must fail");

    let report = match err {
        GenerationError::InvalidSpec(report) => report,
        other => panic!("expected InvalidSpec, got {other:?}"),
    };
    let codes = report.error_codes();
    assert!(codes.contains(&"range_inverted"));
    assert!(codes.contains(&"enum_values_empty"));
}

#[test]
fn strict_mode_rejects_warnings() {
    let columns = vec![ColumnSpec::new(
        "signup",
        ColumnKind::Date {
            start_date: None,
            end_date: None,
        },
    )];
    let dataset = DatasetSpec::new("strict", 4, columns);

    let lenient = engine_with_seed(1).run(&dataset).expect("lenient run");
    assert_eq!(lenient.report.null_count, 4);

    let strict = GenerationEngine::new(GenerateOptions {
        seed: Some(1),
        strict: true,
        ..GenerateOptions::default()
    });
    assert!(matches!(
        strict.run(&dataset),
        Err(GenerationError::InvalidSpec(_))
    ));
}

#[test]
fn unsupported_locale_is_rejected() {
    let mut dataset = DatasetSpec::new("locale", 1, sample_columns());
    dataset.locale = Some("fr_FR".to_string());
    assert!(matches!(
        engine_with_seed(1).run(&dataset),
        Err(GenerationError::UnsupportedLocale(locale)) if locale == "fr_FR"
    ));
}

#[test]
fn unvalidated_columns_surface_contract_violations() {
    let pools = GenerationPool::new();

    let missing_min = ColumnSpec::new(
        "age",
        ColumnKind::Integer {
            min: None,
            max: Some(10),
        },
    );
    let err = generate_rows(&[missing_min], &pools, 1, 0).expect_err("missing min");
    assert!(matches!(err, GenerationError::ContractViolation { ref column, .. } if column == "age"));

    let empty_enum = ColumnSpec::new(
        "status",
        ColumnKind::Enum {
            values: EnumValues::List(vec![" ".to_string()]),
        },
    );
    assert!(generate_rows(&[empty_enum], &pools, 1, 0).is_err());

    let unpooled = ColumnSpec::named_sequence("Product", 5);
    let err = generate_rows(&[unpooled], &pools, 1, 0).expect_err("missing pool");
    assert!(matches!(err, GenerationError::ContractViolation { .. }));
}
