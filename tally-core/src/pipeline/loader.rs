//! Corpus loading and filtering.
//!
//! ## What It Does
//!
//! Reads the corpus CSV, drops every row whose text is missing and derives
//! `cleaned_<date_column>`: January 1 of the year in `date_column`, as a
//! date column.
//!
//! The year cell's text form gets `-01-01` appended and must then parse as
//! `YYYY-MM-DD`. Integer years and integral float years (`2020.0`, as a
//! column with gaps reads) both work. Anything else fails the whole load,
//! a missing year included; dates of dropped rows are never looked at.
//!
//! ## Usage
//!
//! ```no_run
//! use tally_core::pipeline::load_corpus;
//!
//! let corpus = load_corpus("corpus.csv", "text", "year").unwrap();
//! assert!(corpus.column("cleaned_year").is_ok());
//! ```

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{Result, TallyError};
use crate::frame::{as_text, read_csv, series};

/// Name of the derived date column for `date_column`.
#[inline]
pub fn cleaned_date_column(date_column: &str) -> String {
    format!("cleaned_{date_column}")
}

/// Reads a CSV corpus and prepares it with [`prepare_corpus`].
pub fn load_corpus(path: impl AsRef<Path>, text_column: &str, date_column: &str) -> Result<DataFrame> {
    let table = read_csv(path)?;
    prepare_corpus(table, text_column, date_column)
}

/// Drops rows with a missing text and derives `cleaned_<date_column>`.
pub fn prepare_corpus(table: DataFrame, text_column: &str, date_column: &str) -> Result<DataFrame> {
    let mask = series(&table, text_column)?.is_not_null();
    series(&table, date_column)?;
    let mut kept = table.filter(&mask)?;
    tracing::debug!(
        read = table.height(),
        kept = kept.height(),
        "filtered documents without text"
    );

    let dates = year_strings(series(&kept, date_column)?)?
        .into_iter()
        .map(|year| year_start(date_column, year.unwrap_or_default()))
        .collect::<Result<Vec<_>>>()?;
    let name = cleaned_date_column(date_column);
    kept.with_column(DateChunked::from_naive_date(name.into(), dates).into_series())?;
    Ok(kept)
}

/// Text form of each year cell.
fn year_strings(years: &Series) -> Result<Vec<Option<String>>> {
    if years.dtype().is_float() {
        let floats = years.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .map(|v| {
                v.map(|v| {
                    if v.fract() == 0.0 {
                        format!("{}", v as i64)
                    } else {
                        v.to_string()
                    }
                })
            })
            .collect());
    }
    let text = as_text(years)?;
    Ok(text.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
}

fn year_start(column: &str, value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{value}-01-01"), "%Y-%m-%d").map_err(|source| {
        TallyError::DateParse {
            column: column.to_owned(),
            value,
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::column_names;

    fn corpus() -> DataFrame {
        df!(
            "text" => [Some("tool"), None, Some("method")],
            "year" => ["2020", "1999", "2021"]
        )
        .unwrap()
    }

    fn dates(table: &DataFrame, name: &str) -> Vec<Option<String>> {
        let text = as_text(series(table, name).unwrap()).unwrap();
        text.str().unwrap().into_iter().map(|v| v.map(str::to_owned)).collect()
    }

    #[test]
    fn filters_and_derives_dates() {
        let table = prepare_corpus(corpus(), "text", "year").unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(column_names(&table), vec!["text", "year", "cleaned_year"]);
        assert_eq!(table.column("cleaned_year").unwrap().dtype(), &DataType::Date);
        assert_eq!(
            dates(&table, "cleaned_year"),
            vec![Some("2020-01-01".to_owned()), Some("2021-01-01".to_owned())]
        );
    }

    #[test]
    fn integer_and_integral_float_years_parse() {
        let ints = df!("text" => ["x"], "year" => [2020i64]).unwrap();
        let floats = df!("text" => ["x"], "year" => [Some(2020.0f64)]).unwrap();
        for table in [ints, floats] {
            let table = prepare_corpus(table, "text", "year").unwrap();
            assert_eq!(dates(&table, "cleaned_year"), vec![Some("2020-01-01".to_owned())]);
        }
    }

    #[test]
    fn dates_of_dropped_rows_are_not_parsed() {
        let table = df!(
            "text" => [None, Some("x")],
            "year" => ["garbage", "2000"]
        )
        .unwrap();
        assert_eq!(prepare_corpus(table, "text", "year").unwrap().height(), 1);
    }

    #[test]
    fn malformed_date_is_fatal() {
        let cases = [
            df!("text" => ["x"], "year" => ["circa 2020"]).unwrap(),
            df!("text" => ["x"], "year" => [2020.5f64]).unwrap(),
            df!("text" => ["x"], "year" => [None::<i64>]).unwrap(),
        ];
        for table in cases {
            let err = prepare_corpus(table, "text", "year").unwrap_err();
            assert!(matches!(err, TallyError::DateParse { column, .. } if column == "year"));
        }
    }

    #[test]
    fn full_dates_do_not_parse() {
        let table = df!("text" => ["x"], "year" => ["2020-05-03"]).unwrap();
        assert!(prepare_corpus(table, "text", "year").is_err());
    }

    #[test]
    fn missing_columns_are_errors() {
        assert!(matches!(
            prepare_corpus(corpus(), "body", "year"),
            Err(TallyError::MissingColumn { .. })
        ));
        assert!(matches!(
            prepare_corpus(corpus(), "text", "date"),
            Err(TallyError::MissingColumn { .. })
        ));
    }

    #[test]
    fn loads_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        std::fs::write(&path, "text,year\ntool tool,2020\n,2020\nmethod,2021\n").unwrap();
        let table = load_corpus(&path, "text", "year").unwrap();
        assert_eq!(table.height(), 2);
        assert!(table.column("cleaned_year").is_ok());
    }
}
