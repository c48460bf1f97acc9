//! CSV interchange.
//!
//! Reading scans every row to infer one type per column (integer, float or
//! string). The usual spreadsheet markers for missing data (`NA`, `NaN`,
//! `null`, ...) read as missing, as do empty fields.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use polars::prelude::*;

use crate::error::Result;

const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn read_options() -> CsvReadOptions {
    let markers: Vec<PlSmallStr> = NA_MARKERS.iter().copied().map(PlSmallStr::from_static).collect();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|parse| parse.with_null_values(Some(NullValues::AllColumns(markers.clone()))))
}

/// Reads a headed CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_options().into_reader_with_file_handle(file).finish()?;
    tracing::debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "read csv"
    );
    Ok(table)
}

/// Reads headed CSV held in memory.
pub fn read_csv_from(data: impl Into<Vec<u8>>) -> Result<DataFrame> {
    let cursor = Cursor::new(data.into());
    Ok(read_options().into_reader_with_file_handle(cursor).finish()?)
}

/// Writes a table as headed CSV to a file, creating or truncating it.
pub fn write_csv(table: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_csv_to(table, File::create(path)?)?;
    tracing::debug!(path = %path.display(), rows = table.height(), "wrote csv");
    Ok(())
}

/// Writes a table as headed CSV. Missing cells are written as empty fields
/// and dates as `YYYY-MM-DD`.
pub fn write_csv_to<W: Write>(table: &DataFrame, writer: W) -> Result<()> {
    let mut table = table.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut table)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::column_names;

    #[test]
    fn infers_column_types() {
        let table = read_csv_from("year,text,score\n2020,tool tool,1.5\n2021,,2\n").unwrap();
        assert_eq!(column_names(&table), vec!["year", "text", "score"]);
        assert_eq!(table.column("year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.column("text").unwrap().dtype(), &DataType::String);
        assert_eq!(table.column("score").unwrap().dtype(), &DataType::Float64);

        let text = table.column("text").unwrap().as_materialized_series();
        let text: Vec<Option<&str>> = text.str().unwrap().into_iter().collect();
        assert_eq!(text, vec![Some("tool tool"), None]);
    }

    #[test]
    fn na_markers_read_as_null() {
        let table = read_csv_from("text\nNA\nnan\nok\n").unwrap();
        let text = table.column("text").unwrap().as_materialized_series();
        let text: Vec<Option<&str>> = text.str().unwrap().into_iter().collect();
        assert_eq!(text, vec![None, None, Some("ok")]);
    }

    #[test]
    fn writes_missing_as_empty() {
        let table = df!(
            "term" => [Some("tool"), None],
            "counts" => [2i64, 5]
        )
        .unwrap();
        let mut out = Vec::new();
        write_csv_to(&table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "term,counts\ntool,2\n,5\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_csv(dir.path().join("absent.csv")),
            Err(crate::TallyError::Io(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let table = df!(
            "year" => [2020i64],
            "text" => ["a, quoted \"cell\""]
        )
        .unwrap();
        write_csv(&table, &path).unwrap();
        assert!(read_csv(&path).unwrap().equals_missing(&table));
    }
}
