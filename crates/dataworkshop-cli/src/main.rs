mod registry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dataworkshop_core::{
    ColumnSpec, DEFAULT_SEQUENCE_COUNT, DatasetSpec, DocumentFormat, Error as CoreError,
    ValidationReport, dataset_json_schema, validate_dataset_json,
};
use dataworkshop_generate::{
    ConflictPolicy, DirectorySink, GenerateOptions, GenerationEngine, GenerationError,
    OutputFormat, SinkError, TableSink,
};
use registry::{
    RunContext, RunOptions, init_run_logging, init_stderr_logging, start_run, write_bytes_atomic,
    write_report,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Generation(#[from] GenerationError),
    #[error("export failed: {0}")]
    Sink(#[from] SinkError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid dataset: {0}")]
    InvalidSpec(ValidationReport),
    #[error("refusing to overwrite {0} (pass --force)")]
    Exists(PathBuf),
}

#[derive(Parser, Debug)]
#[command(name = "dataworkshop", version, about = "Synthetic dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset and export it.
    Generate(GenerateArgs),
    /// Check a dataset document without generating anything.
    Validate(ValidateArgs),
    /// Print the JSON Schema of dataset documents.
    Schema(SchemaArgs),
    /// Write a starter dataset document.
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Dataset document (.toml or .json).
    #[arg(long, value_name = "FILE")]
    spec: PathBuf,
    /// Override the number of rows.
    #[arg(long)]
    rows: Option<u64>,
    /// Override the seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the locale (en_US, pt_BR, zh_CN).
    #[arg(long)]
    locale: Option<String>,
    /// Export format.
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
    /// Export directory; defaults to the run directory.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Replace an existing export file.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
    /// Treat validation warnings as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long, value_name = "FILE")]
    spec: PathBuf,
    /// Treat validation warnings as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InitArgs {
    #[arg(long, default_value = "dataset.toml")]
    out: PathBuf,
    /// Number of starter columns.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=20))]
    columns: u16,
    /// Replace an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Xlsx,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Xlsx => OutputFormat::Xlsx,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Schema(args) => run_schema(args),
        Command::Init(args) => run_init(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        spec,
        rows,
        seed,
        locale,
        format,
        out,
        run_dir,
        overwrite,
        strict,
    } = args;

    let mut dataset = load_dataset(&spec)?;
    if let Some(rows) = rows {
        dataset.rows = rows;
    }

    let run_id = Uuid::new_v4().to_string();
    let format = OutputFormat::from(format);
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        run_dir,
        options: RunOptions {
            spec_path: spec,
            rows,
            seed,
            locale: locale.clone(),
            format,
            out: out.clone(),
            overwrite,
            strict,
        },
        dataset,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, spec = %run_ctx.options.spec_path.display());

    let engine = GenerationEngine::new(GenerateOptions {
        locale,
        seed,
        strict,
        run_id: Some(run_id.clone()),
    });
    let dataset = &run_ctx.dataset;
    let result = match engine.run(dataset) {
        Ok(result) => result,
        Err(GenerationError::InvalidSpec(report)) => {
            print_issues(&report);
            tracing::info!(event = "run_failed", reason = "invalid_spec");
            return Err(CliError::InvalidSpec(report));
        }
        Err(err) => return Err(err.into()),
    };
    for issue in &result.report.warnings {
        eprintln!("warning: {issue}");
    }

    let conflict = if overwrite {
        ConflictPolicy::Overwrite
    } else {
        ConflictPolicy::Fail
    };
    let out_dir = out.unwrap_or_else(|| run_paths.root.clone());
    let mut sink = DirectorySink::new(out_dir, format).with_conflict_policy(conflict);
    let written = sink.write_table(&result.table, &dataset.name)?;
    tracing::info!(event = "export_written", path = %written.location, bytes = written.bytes);

    write_report(&run_paths, &result.report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    println!(
        "generated {} rows x {} columns (seed {}) -> {}",
        result.report.rows_generated, result.report.columns, result.report.seed, written.location
    );
    println!("run_dir={}", run_paths.root.display());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    init_stderr_logging()?;

    let mut report = ValidationReport::default();
    if matches!(DocumentFormat::from_path(&args.spec)?, DocumentFormat::Json) {
        let raw = std::fs::read_to_string(&args.spec).map_err(CoreError::from)?;
        let document: serde_json::Value = serde_json::from_str(&raw)?;
        report.merge(validate_dataset_json(&document, &dataset_json_schema()?)?);
        if !report.is_ok() {
            print_issues(&report);
            return Err(CliError::InvalidSpec(report));
        }
    }

    let dataset = load_dataset(&args.spec)?;
    let engine = GenerationEngine::new(GenerateOptions {
        strict: args.strict,
        ..GenerateOptions::default()
    });
    report.merge(engine.validate(&dataset));
    print_issues(&report);

    if report.is_ok() {
        println!(
            "{}: ok ({} columns, {} warning(s))",
            args.spec.display(),
            dataset.columns.len(),
            report.warnings.len()
        );
        Ok(())
    } else {
        Err(CliError::InvalidSpec(report))
    }
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = serde_json::to_string_pretty(&dataset_json_schema()?)?;
    match args.out {
        Some(path) => {
            write_bytes_atomic(&path, schema.as_bytes())?;
            println!("schema written to {}", path.display());
        }
        None => println!("{schema}"),
    }
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), CliError> {
    if args.out.exists() && !args.force {
        return Err(CliError::Exists(args.out));
    }

    let dataset = starter_dataset(args.columns);
    let content = dataset.to_toml_string()?;
    write_bytes_atomic(&args.out, content.as_bytes())?;
    println!("wrote {} with {} columns", args.out.display(), args.columns);
    Ok(())
}

fn starter_dataset(columns: u16) -> DatasetSpec {
    let columns = (1..=columns)
        .map(|idx| ColumnSpec::named_sequence(format!("Column {idx}"), DEFAULT_SEQUENCE_COUNT))
        .collect();
    DatasetSpec {
        columns,
        ..DatasetSpec::default()
    }
}

fn load_dataset(path: &Path) -> Result<DatasetSpec, CliError> {
    Ok(DatasetSpec::from_path(path)?)
}

fn print_issues(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error: {issue}");
    }
    for issue in &report.warnings {
        eprintln!("warning: {issue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_dataset_round_trips_through_toml() {
        let dataset = starter_dataset(3);
        let toml = dataset.to_toml_string().expect("serialize");
        let parsed = DatasetSpec::from_toml_str(&toml).expect("parse");
        assert_eq!(parsed, dataset);
        assert_eq!(parsed.columns[2].name, "Column 3");
        assert!(dataworkshop_core::validate_dataset(&parsed).is_ok());
    }

    #[test]
    fn cli_parses_generate_overrides() {
        let cli = Cli::try_parse_from([
            "dataworkshop",
            "generate",
            "--spec",
            "d.toml",
            "--rows",
            "10",
            "--format",
            "json",
            "--overwrite",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.rows, Some(10));
        assert!(matches!(args.format, FormatArg::Json));
        assert!(args.overwrite);
        assert_eq!(args.run_dir, PathBuf::from("runs"));
    }

    #[test]
    fn cli_accepts_workbook_format() {
        let cli = Cli::try_parse_from([
            "dataworkshop",
            "generate",
            "--spec",
            "d.toml",
            "--format",
            "xlsx",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(OutputFormat::from(args.format), OutputFormat::Xlsx);
    }

    #[test]
    fn init_rejects_too_many_columns() {
        assert!(Cli::try_parse_from(["dataworkshop", "init", "--columns", "21"]).is_err());
    }
}
