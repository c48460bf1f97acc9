//! Dataframe helpers shared by the pipeline stages.
//!
//! Tables are `polars` [`DataFrame`]s. This module adds the few checks the
//! pipeline needs on top of them:
//!
//! - **Lookup**: [`series`] resolves a column or reports it as missing by name
//! - **Text view**: [`as_text`] renders any column as strings for counting
//! - **Sum guard**: [`ensure_summable`] rejects non-numeric metrics and
//!   integer sums that would leave `i64`
//! - **Interchange**: CSV read with `pandas`-style missing markers, CSV write

mod csv_io;

use polars::prelude::*;

use crate::error::{Result, TallyError};

pub use csv_io::{read_csv, read_csv_from, write_csv, write_csv_to};

/// Returns the column `name` of `table` as a series.
#[inline]
pub fn series<'a>(table: &'a DataFrame, name: &str) -> Result<&'a Series> {
    table
        .column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| TallyError::missing(name))
}

/// Column names in table order.
pub fn column_names(table: &DataFrame) -> Vec<&str> {
    table.get_columns().iter().map(|c| c.name().as_str()).collect()
}

/// Casts `series` to strings. Numbers render in their shortest form.
#[inline]
pub fn as_text(series: &Series) -> Result<Series> {
    Ok(series.cast(&DataType::String)?)
}

/// Checks that `column` can be summed.
///
/// The column must be numeric (or entirely missing). For an integer column
/// the sum of absolute values must stay below `i64::MAX`, which bounds
/// every partial sum a grouping can form.
pub fn ensure_summable(table: &DataFrame, column: &str) -> Result<()> {
    let values = series(table, column)?;
    let dtype = values.dtype();
    if dtype.is_float() || matches!(dtype, DataType::Null) {
        return Ok(());
    }
    if !dtype.is_integer() {
        let text = as_text(values)?;
        let value = text.str()?.into_iter().flatten().next().unwrap_or_default().to_owned();
        return Err(TallyError::NonNumeric {
            column: column.to_owned(),
            value,
        });
    }

    let floats = values.cast(&DataType::Float64)?;
    let magnitude: f64 = floats.f64()?.into_iter().flatten().map(f64::abs).sum();
    if magnitude >= i64::MAX as f64 {
        return Err(TallyError::Overflow {
            column: column.to_owned(),
        });
    }
    Ok(())
}
