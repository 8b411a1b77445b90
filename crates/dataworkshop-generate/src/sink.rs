//! Destinations for generated tables.

use std::fs::{self, File, OpenOptions, create_dir_all};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::output::OutputFormat;
use crate::output::csv::write_csv_to;
use crate::output::json::write_json_to;
use crate::output::xlsx::write_xlsx_to;
use crate::table::GeneratedTable;

/// Errors raised while handing a table to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("target '{0}' already exists")]
    AlreadyExists(String),
    #[error("invalid table name '{0}'")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Where a sink stored a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    pub location: String,
    pub rows: u64,
    pub bytes: u64,
}

/// A collaborator that persists generated tables.
///
/// Sinks own their naming and collision rules.
pub trait TableSink {
    fn write_table(&mut self, table: &GeneratedTable, name: &str) -> Result<TableRef, SinkError>;
}

/// What a sink does when the target already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    #[default]
    Fail,
    Overwrite,
}

/// Writes each table to `<dir>/<name>.<ext>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    format: OutputFormat,
    conflict: ConflictPolicy,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            conflict: ConflictPolicy::default(),
        }
    }

    pub fn with_conflict_policy(mut self, conflict: ConflictPolicy) -> Self {
        self.conflict = conflict;
        self
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(name), self.format.extension()))
    }

    /// Run `write` against a sibling temp file and move the result into
    /// place only once it succeeded. The target never holds a partial table,
    /// and the temp file is removed on failure.
    fn commit<F>(&self, path: &Path, write: F) -> Result<u64, SinkError>
    where
        F: FnOnce(File) -> Result<u64, SinkError>,
    {
        let tmp_path = temp_path(path);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;

        let result = write(file).and_then(|bytes| {
            self.publish(&tmp_path, path)?;
            Ok(bytes)
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn publish(&self, tmp_path: &Path, path: &Path) -> Result<(), SinkError> {
        match self.conflict {
            ConflictPolicy::Overwrite => fs::rename(tmp_path, path)?,
            // hard_link never replaces an existing target.
            ConflictPolicy::Fail => match fs::hard_link(tmp_path, path) {
                Ok(()) => {
                    let _ = fs::remove_file(tmp_path);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(already_exists(path));
                }
                Err(_) => {
                    if path.exists() {
                        return Err(already_exists(path));
                    }
                    fs::rename(tmp_path, path)?;
                }
            },
        }
        Ok(())
    }
}

impl TableSink for DirectorySink {
    fn write_table(&mut self, table: &GeneratedTable, name: &str) -> Result<TableRef, SinkError> {
        if file_stem(name).is_empty() {
            return Err(SinkError::InvalidName(name.to_string()));
        }
        create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        if self.conflict == ConflictPolicy::Fail && path.exists() {
            return Err(already_exists(&path));
        }

        let format = self.format;
        let bytes = self.commit(&path, |file| match format {
            OutputFormat::Csv => Ok(write_csv_to(file, table)?),
            OutputFormat::Json => Ok(write_json_to(file, table)?),
            OutputFormat::Xlsx => Ok(write_xlsx_to(file, table)?),
        })?;

        info!(
            table = %name,
            path = %path.display(),
            format = format.extension(),
            rows = table.row_count(),
            bytes,
            "table written"
        );

        Ok(TableRef {
            name: name.to_string(),
            location: path.display().to_string(),
            rows: table.row_count() as u64,
            bytes,
        })
    }
}

fn already_exists(path: &Path) -> SinkError {
    SinkError::AlreadyExists(path.display().to_string())
}

/// Hidden sibling of `path`, unique per write.
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}

/// File-system safe stem: path separators and control characters become `_`.
fn file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|ch| {
            let reserved = matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
            if reserved || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("dataworkshop_commit_{}", uuid::Uuid::new_v4()))
    }

    fn table() -> GeneratedTable {
        let mut table = GeneratedTable::new(vec!["n".to_string()]);
        table.rows.push(crate::table::GeneratedRow {
            values: vec![crate::generators::GeneratedValue::Int(7)],
        });
        table
    }

    #[test]
    fn stem_replaces_path_separators() {
        assert_eq!(file_stem(" Fake Data "), "Fake Data");
        assert_eq!(file_stem("a/b\\c"), "a_b_c");
        assert_eq!(file_stem("   "), "");
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let dir = temp_dir();
        create_dir_all(&dir).expect("create dir");
        let mut sink = DirectorySink::new(&dir, OutputFormat::Csv);
        let path = sink.path_for("Fake Data");

        let err = sink
            .commit(&path, |mut file| {
                std::io::Write::write_all(&mut file, b"n\n1\n")?;
                Err(SinkError::Io(io::Error::other("disk full")))
            })
            .expect_err("writer fails");
        assert!(matches!(err, SinkError::Io(_)));
        assert!(!path.exists());
        let leftovers = fs::read_dir(&dir).expect("read dir").count();
        assert_eq!(leftovers, 0);

        let written = sink.write_table(&table(), "Fake Data").expect("retry succeeds");
        assert_eq!(written.rows, 1);
        let content = fs::read_to_string(&path).expect("read");
        assert_eq!(content.lines().collect::<Vec<_>>(), ["n", "7"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn fail_policy_keeps_existing_target_untouched() {
        let dir = temp_dir();
        create_dir_all(&dir).expect("create dir");
        let sink = DirectorySink::new(&dir, OutputFormat::Csv);
        let path = sink.path_for("Fake Data");
        fs::write(&path, "original").expect("seed target");

        let err = sink
            .commit(&path, |mut file| {
                std::io::Write::write_all(&mut file, b"replacement")?;
                Ok(11)
            })
            .expect_err("target exists");
        assert!(matches!(err, SinkError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(&path).expect("read"), "original");
        assert_eq!(fs::read_dir(&dir).expect("read dir").count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
