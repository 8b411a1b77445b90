use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::table::GeneratedTable;

/// Write a table as a pretty JSON array of `{column: value}` records.
pub fn write_table_json(path: &Path, table: &GeneratedTable) -> Result<u64, serde_json::Error> {
    let file = File::create(path).map_err(serde_json::Error::io)?;
    write_json_to(file, table)
}

/// Write JSON records into any writer, returning the number of bytes written.
pub fn write_json_to<W: Write>(inner: W, table: &GeneratedTable) -> Result<u64, serde_json::Error> {
    let data = serde_json::to_vec_pretty(&table.records())?;
    let mut writer = BufWriter::new(inner);
    writer.write_all(&data).map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(data.len() as u64)
}
