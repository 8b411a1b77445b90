use std::env;
use std::path::PathBuf;

use dataworkshop_core::DatasetSpec;
use dataworkshop_generate::{
    DirectorySink, GenerateOptions, GenerationEngine, OutputFormat, TableSink,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut spec_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from("out");
    let mut options = GenerateOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--spec" => spec_path = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from).ok_or("missing --out value")?,
            "--seed" => options.seed = args.next().map(|v| v.parse()).transpose()?,
            "--locale" => options.locale = args.next(),
            _ => {
                if spec_path.is_none() {
                    spec_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let spec_path = spec_path.ok_or("missing --spec path")?;
    let dataset = DatasetSpec::from_path(&spec_path)?;

    let engine = GenerationEngine::new(options);
    let result = engine.run(&dataset)?;

    let mut sink = DirectorySink::new(&out_dir, OutputFormat::Csv);
    let written = sink.write_table(&result.table, &dataset.name)?;

    println!("rows={} path={}", written.rows, written.location);
    Ok(())
}
