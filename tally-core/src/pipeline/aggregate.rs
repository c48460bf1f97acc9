//! Aggregation of the long term table into (date, term) rows.
//!
//! ## What It Does
//!
//! Sums the three per-document metrics over every (date, term) pair:
//!
//! - `counts`: occurrences of the term in that year
//! - `scaled_counts`: sum of per-document `counts / total_tokens`, as a
//!   percentage
//! - `total_tokens`: tokens of the documents that contributed a row
//!
//! then renames the date column to `date` and stamps the provenance
//! columns on every row. Rows whose date or term is missing are left out.
//! The output is sorted by date, then term.
//!
//! [`to_wide`] spreads one of the metrics into a date × term grid for
//! charting.

use polars::prelude::pivot::pivot_stable;
use polars::prelude::*;

use crate::error::Result;
use crate::frame::{ensure_summable, series};
use crate::pipeline::enrich::TOTAL_TOKENS;
use crate::pipeline::reshape::{COUNTS, SCALED_COUNTS};

/// Output name of the grouping date column.
pub const DATE: &str = "date";
/// Constant provenance column: where the corpus comes from.
pub const DATA_ORIGIN: &str = "data_origin";
/// Constant provenance column: human-readable dataset title.
pub const TITLE: &str = "title";

/// Sums `counts`, `scaled_counts` and `total_tokens` per
/// (`date_column`, `term_type`) group.
///
/// The result has one row per distinct key present in `long`, with columns
/// `date, <term_type>, counts, scaled_counts, total_tokens, data_origin,
/// title`. Integer sums stay integers; a sum that would overflow is an
/// error.
pub fn aggregate(
    long: &DataFrame,
    date_column: &str,
    term_type: &str,
    data_origin: &str,
    title: &str,
) -> Result<DataFrame> {
    series(long, date_column)?;
    series(long, term_type)?;
    for metric in [COUNTS, SCALED_COUNTS, TOTAL_TOKENS] {
        ensure_summable(long, metric)?;
    }

    let grouped = long
        .clone()
        .lazy()
        .filter(col(date_column).is_not_null().and(col(term_type).is_not_null()))
        .group_by([col(date_column), col(term_type)])
        .agg([
            col(COUNTS).sum(),
            col(SCALED_COUNTS).sum(),
            col(TOTAL_TOKENS).sum(),
        ])
        .select([
            col(date_column).alias(DATE),
            col(term_type),
            col(COUNTS),
            (col(SCALED_COUNTS).cast(DataType::Float64) * lit(100.0)).alias(SCALED_COUNTS),
            col(TOTAL_TOKENS),
            lit(data_origin).alias(DATA_ORIGIN),
            lit(title).alias(TITLE),
        ])
        .sort([DATE, term_type], SortMultipleOptions::default())
        .collect()?;

    tracing::debug!(groups = grouped.height(), "aggregated term counts");
    Ok(grouped)
}

/// Spreads one aggregate metric into a date × term grid for charting.
///
/// Rows are dates in aggregate order, columns are terms in sorted order;
/// combinations absent from the aggregate are left empty.
pub fn to_wide(aggregate: &DataFrame, term_type: &str, metric: &str) -> Result<DataFrame> {
    series(aggregate, term_type)?;
    series(aggregate, metric)?;
    Ok(pivot_stable(
        aggregate,
        [term_type],
        Some([DATE]),
        Some([metric]),
        true,
        None,
        None,
    )?)
}
