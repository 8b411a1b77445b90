use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::table::GeneratedTable;

/// Write a table as CSV: a header row in column order, then one record per row.
pub fn write_table_csv(path: &Path, table: &GeneratedTable) -> Result<u64, csv::Error> {
    let file = File::create(path).map_err(csv::Error::from)?;
    write_csv_to(file, table)
}

/// Write CSV into any writer, returning the number of bytes written.
pub fn write_csv_to<W: Write>(inner: W, table: &GeneratedTable) -> Result<u64, csv::Error> {
    let counting = CountingWriter::new(BufWriter::new(inner));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let record: Vec<String> = row.values.iter().map(|value| value.to_csv()).collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let mut counting = writer.into_inner().map_err(|err| err.into_error())?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
