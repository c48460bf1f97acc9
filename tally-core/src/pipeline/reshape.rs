//! Term reshaping: joined-term merge, unpivot and case canonicalization.
//!
//! ## What It Does
//!
//! Turns the wide per-document frame (one column per term) into the long
//! frame the aggregator groups:
//!
//! ```text
//! doc  total_tokens  tool  method        doc  total_tokens  term    counts  scaled_counts
//! 1    4             2     0        ->   1    4             tool    2       0.5
//! 2    1             0     1             2    1             tool    0       0.0
//!                                        1    4             method  0       0.0
//!                                        2    1             method  1       1.0
//! ```
//!
//! Rows come term by term, each block in document order. Before the
//! unpivot a singular and plural term column can be merged into one
//! ([`merge_joined_term`]); after it the term labels can be put back into
//! the vocabulary's casing ([`canonicalize_terms`]).

use polars::prelude::*;
use tally_types::Vocabulary;

use crate::error::{Result, TallyError};
use crate::frame::{column_names, series};
use crate::pipeline::enrich::TOTAL_TOKENS;

/// Raw occurrence count column of the long table.
pub const COUNTS: &str = "counts";
/// `counts / total_tokens` column of the long table.
pub const SCALED_COUNTS: &str = "scaled_counts";

/// Coalesces `key` and its plural `key + "s"` into one column named `key`.
///
/// Wherever the `key` cell is present it wins, otherwise the plural cell is
/// used. Both source columns are dropped and the merged column is appended
/// at the end of the table.
pub fn merge_joined_term(table: DataFrame, key: &str) -> Result<DataFrame> {
    let plural = format!("{key}s");
    series(&table, key)?;
    series(&table, &plural)?;

    let mut exprs: Vec<Expr> = column_names(&table)
        .into_iter()
        .filter(|name| *name != key && *name != plural)
        .map(col)
        .collect();
    exprs.push(
        when(col(key).is_not_null())
            .then(col(key))
            .otherwise(col(plural.as_str()))
            .alias(key),
    );
    let merged = table.lazy().select(exprs).collect()?;
    tracing::debug!(key, plural, "merged joined term columns");
    Ok(merged)
}

/// Unpivots `term_columns` into `<term_type>` / `counts` and adds
/// `scaled_counts`.
///
/// Every other column is carried along as an identifier. The scaled count
/// is a float division by `total_tokens`; a missing count or total gives a
/// missing scaled count, and a zero total is logged and yields a non-finite
/// value.
pub fn melt_terms(table: &DataFrame, term_columns: &[&str], term_type: &str) -> Result<DataFrame> {
    let totals = series(table, TOTAL_TOKENS)?;
    if !(totals.dtype().is_integer() || totals.dtype().is_float()) {
        return Err(TallyError::NonNumeric {
            column: TOTAL_TOKENS.to_owned(),
            value: totals.dtype().to_string(),
        });
    }
    for term in term_columns {
        series(table, term)?;
    }
    let index: Vec<&str> = column_names(table)
        .into_iter()
        .filter(|name| !term_columns.contains(name))
        .collect();

    let mut long = if term_columns.is_empty() {
        let mut empty = table.clear();
        empty.hstack_mut(&[
            Series::new_empty(term_type.into(), &DataType::String).into_column(),
            Series::new_empty(COUNTS.into(), &DataType::Int64).into_column(),
        ])?;
        empty
    } else {
        let mut long = table.unpivot(term_columns.iter().copied(), index)?;
        long.rename("variable", term_type.into())?;
        long.rename("value", COUNTS.into())?;
        // polars 0.46 `rename` leaves the cached schema stale; drop it so lazy plans see the new names.
        long.clear_schema();
        long
    };

    let zero_totals = series(&long, TOTAL_TOKENS)?
        .equal(0)?
        .into_iter()
        .filter(|hit| *hit == Some(true))
        .count();
    if zero_totals > 0 {
        tracing::warn!(rows = zero_totals, "zero total_tokens; scaled counts are not finite");
    }

    long = long
        .lazy()
        .with_column(
            (col(COUNTS).cast(DataType::Float64) / col(TOTAL_TOKENS).cast(DataType::Float64))
                .alias(SCALED_COUNTS),
        )
        .collect()?;
    Ok(long)
}

/// Restores the vocabulary's casing in the `term_type` column.
///
/// Each cell equal to the lowercase form of a term is replaced by that
/// term; other cells are left alone.
pub fn canonicalize_terms(table: &mut DataFrame, term_type: &str, vocabulary: &Vocabulary) -> Result<()> {
    let mapping = vocabulary.canonical_case_map();
    let mut replaced = 0usize;
    let terms: Vec<Option<String>> = series(table, term_type)?
        .str()?
        .into_iter()
        .map(|cell| {
            cell.map(|term| match mapping.get(term) {
                Some(canonical) => {
                    if term != canonical.as_str() {
                        replaced += 1;
                    }
                    canonical.clone()
                }
                None => term.to_owned(),
            })
        })
        .collect();
    table.with_column(Series::new(term_type.into(), terms))?;
    tracing::debug!(replaced, "canonicalized term casing");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(table: &DataFrame, name: &str) -> Vec<Option<String>> {
        series(table, name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect()
    }

    fn floats(table: &DataFrame, name: &str) -> Vec<Option<f64>> {
        series(table, name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn merge_prefers_singular_values() {
        let table = df!(
            "doc" => [1i64, 2],
            "tool" => [None, Some("R")],
            "tools" => [Some("Python"), None]
        )
        .unwrap();
        let merged = merge_joined_term(table, "tool").unwrap();
        assert_eq!(column_names(&merged), vec!["doc", "tool"]);
        assert_eq!(
            strs(&merged, "tool"),
            vec![Some("Python".to_owned()), Some("R".to_owned())]
        );
    }

    #[test]
    fn merge_requires_both_columns() {
        let table = df!("tool" => [1i64]).unwrap();
        assert!(matches!(
            merge_joined_term(table, "tool"),
            Err(TallyError::MissingColumn { column }) if column == "tools"
        ));
    }

    fn counted() -> DataFrame {
        df!(
            "doc" => [1i64, 2],
            TOTAL_TOKENS => [4i64, 1],
            "tool" => [2i64, 0],
            "method" => [0i64, 1]
        )
        .unwrap()
    }

    #[test]
    fn melt_scales_by_token_total() {
        let long = melt_terms(&counted(), &["tool", "method"], "tool_type").unwrap();
        assert_eq!(
            column_names(&long),
            vec!["doc", TOTAL_TOKENS, "tool_type", COUNTS, SCALED_COUNTS]
        );
        assert_eq!(
            strs(&long, "tool_type"),
            ["tool", "tool", "method", "method"].map(|t| Some(t.to_owned()))
        );
        assert_eq!(
            floats(&long, SCALED_COUNTS),
            vec![Some(0.5), Some(0.0), Some(0.0), Some(1.0)]
        );
    }

    #[test]
    fn missing_count_gives_missing_scale() {
        let table = df!(TOTAL_TOKENS => [2i64], "tool" => [None::<i64>]).unwrap();
        let long = melt_terms(&table, &["tool"], "term").unwrap();
        assert_eq!(floats(&long, SCALED_COUNTS), vec![None]);
    }

    #[test]
    fn zero_total_gives_non_finite_scale() {
        let table = df!(TOTAL_TOKENS => [0i64], "tool" => [1i64]).unwrap();
        let long = melt_terms(&table, &["tool"], "term").unwrap();
        assert!(floats(&long, SCALED_COUNTS)[0].is_some_and(f64::is_infinite));
    }

    #[test]
    fn no_terms_gives_empty_long_table() {
        let long = melt_terms(&counted(), &[], "term").unwrap();
        assert_eq!(long.height(), 0);
        assert_eq!(
            column_names(&long),
            vec!["doc", TOTAL_TOKENS, "tool", "method", "term", COUNTS, SCALED_COUNTS]
        );
    }

    #[test]
    fn melt_requires_total_tokens() {
        let table = df!("tool" => [1i64]).unwrap();
        assert!(matches!(
            melt_terms(&table, &["tool"], "term"),
            Err(TallyError::MissingColumn { .. })
        ));
    }

    #[test]
    fn canonicalize_restores_casing() {
        let mut long = df!("term" => ["python", "tool", "Method"]).unwrap();
        let vocab = Vocabulary::new(["Python", "method"]);
        canonicalize_terms(&mut long, "term", &vocab).unwrap();
        assert_eq!(
            strs(&long, "term"),
            ["Python", "tool", "Method"].map(|t| Some(t.to_owned()))
        );
    }
}
