//! Row generation engine for dataworkshop.
//!
//! This crate turns a validated list of column specifications into a table of
//! synthetic rows: it materializes per-run value pools, resolves one value
//! provider per column, and fills rows from seeded RNGs so runs are
//! reproducible.

pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod generators;
pub mod model;
pub mod output;
pub mod pool;
pub mod seed;
pub mod sink;
pub mod table;

pub use engine::{GenerationEngine, GenerationResult, generate_rows};
pub use errors::GenerationError;
pub use generators::{GeneratedValue, ValueProvider};
pub use model::{GenerateOptions, GenerationReport, PoolReport};
pub use output::OutputFormat;
pub use pool::{GenerationPool, PoolEntry, materialize_pools};
pub use sink::{ConflictPolicy, DirectorySink, SinkError, TableRef, TableSink};
pub use table::{GeneratedRow, GeneratedTable};
