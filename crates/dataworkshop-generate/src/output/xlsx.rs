use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};

use dataworkshop_core::DEFAULT_DATASET_NAME;

use crate::generators::GeneratedValue;
use crate::table::GeneratedTable;

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Write a table as an `.xlsx` workbook: one sheet named after the table,
/// a header row in column order, then one row per generated row.
pub fn write_table_xlsx(path: &Path, table: &GeneratedTable) -> Result<u64, XlsxError> {
    let file = File::create(path).map_err(XlsxError::IoError)?;
    write_xlsx_to(file, table)
}

/// Write the workbook into any writer, returning the number of bytes written.
pub fn write_xlsx_to<W: Write>(mut inner: W, table: &GeneratedTable) -> Result<u64, XlsxError> {
    let data = workbook_bytes(table)?;
    inner.write_all(&data).map_err(XlsxError::IoError)?;
    inner.flush().map_err(XlsxError::IoError)?;
    Ok(data.len() as u64)
}

fn workbook_bytes(table: &GeneratedTable) -> Result<Vec<u8>, XlsxError> {
    let header_format = Format::new().set_bold();
    let decimal_format = Format::new().set_num_format("0.00");
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&table.name))?;

    for (idx, column) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(idx)?, column, &header_format)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in row.values.iter().enumerate() {
            let col = column_index(col)?;
            match value {
                GeneratedValue::Null => {}
                GeneratedValue::Int(value) => {
                    worksheet.write_number(row_num, col, *value as f64)?;
                }
                GeneratedValue::Float(value) => {
                    worksheet.write_number_with_format(row_num, col, *value, &decimal_format)?;
                }
                GeneratedValue::Text(value) | GeneratedValue::Uuid(value) => {
                    worksheet.write_string(row_num, col, value)?;
                }
                GeneratedValue::Date(day) => match excel_date(*day) {
                    Some(date) => {
                        worksheet.write_datetime_with_format(row_num, col, &date, &date_format)?;
                    }
                    // Outside the workbook calendar; keep the ISO text.
                    None => {
                        worksheet.write_string(row_num, col, value.to_csv())?;
                    }
                },
            }
        }
    }

    workbook.save_to_buffer()
}

fn column_index(idx: usize) -> Result<u16, XlsxError> {
    u16::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn excel_date(day: chrono::NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(day.year()).ok()?;
    ExcelDateTime::from_ymd(year, day.month() as u8, day.day() as u8).ok()
}

/// Sheet name for a dataset: reserved characters become `_`, leading and
/// trailing apostrophes are dropped, and the result is cut to
/// [`MAX_SHEET_NAME_LEN`] characters.
pub fn sheet_name(dataset: &str) -> String {
    let cleaned: String = dataset
        .trim()
        .trim_matches('\'')
        .chars()
        .map(|ch| match ch {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            ch if ch.is_control() => '_',
            ch => ch,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_end_matches('\'').trim();
    if cleaned.is_empty() {
        DEFAULT_DATASET_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_sanitized_and_truncated() {
        assert_eq!(sheet_name("Fake Data"), "Fake Data");
        assert_eq!(sheet_name("sales/2024:Q1"), "sales_2024_Q1");
        assert_eq!(sheet_name("'quoted'"), "quoted");
        assert_eq!(sheet_name("   "), "Fake Data");
        assert_eq!(sheet_name(&"销".repeat(40)).chars().count(), MAX_SHEET_NAME_LEN);
    }
}
