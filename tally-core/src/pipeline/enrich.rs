//! Document enrichment: normalized text, token totals and term counts.
//!
//! ## What It Does
//!
//! Adds the derived per-document columns the later stages read, then
//! appends the vocabulary counts:
//!
//! ```text
//! text --normalize--> lower_text --tokenize--> tokenized_text --split ' '--> total_tokens
//! lower_text --count--> one column per term
//! ```
//!
//! A derived column the caller already supplies is kept as it is and not
//! recomputed, so precomputed `total_tokens` or `tokenized_text` must agree
//! with `lower_text`. When `total_tokens` is present, `tokenized_text` is
//! not derived at all.
//!
//! The token total is the number of pieces the tokenized text splits into
//! on single spaces. An empty document therefore has one token.

use memchr::memchr_iter;
use polars::prelude::*;

use crate::analyzer::{TermVectorizer, TextNormalizer};
use crate::error::{Result, TallyError};
use crate::frame::{as_text, series};
use crate::pipeline::counter::count_term_frequencies;

/// Lowercased text column.
pub const LOWER_TEXT: &str = "lower_text";
/// Space-joined word tokens of [`LOWER_TEXT`].
pub const TOKENIZED_TEXT: &str = "tokenized_text";
/// Number of space-separated pieces of [`TOKENIZED_TEXT`].
pub const TOTAL_TOKENS: &str = "total_tokens";

/// Adds `lower_text`, `tokenized_text` and `total_tokens` where absent, then
/// appends one count column per vocabulary term.
///
/// A term column whose name is already taken by the table is an error.
pub fn enrich_documents(
    mut table: DataFrame,
    text_column: &str,
    normalizer: &TextNormalizer,
    vectorizer: &TermVectorizer,
) -> Result<DataFrame> {
    if table.column(LOWER_TEXT).is_err() {
        let text = as_text(series(&table, text_column)?)?;
        let mut buf = String::new();
        let lowered: Vec<Option<String>> = text
            .str()?
            .into_iter()
            .map(|cell| {
                cell.map(|s| {
                    normalizer.normalize_into(s, &mut buf);
                    buf.clone()
                })
            })
            .collect();
        table.with_column(Series::new(LOWER_TEXT.into(), lowered))?;
    }

    if table.column(TOTAL_TOKENS).is_err() {
        if table.column(TOKENIZED_TEXT).is_err() {
            let tokenizer = vectorizer.tokenizer();
            let lower = as_text(series(&table, LOWER_TEXT)?)?;
            let tokenized: Vec<Option<String>> = lower
                .str()?
                .into_iter()
                .map(|cell| cell.map(|s| tokenizer.tokenized(s)))
                .collect();
            table.with_column(Series::new(TOKENIZED_TEXT.into(), tokenized))?;
        }

        let tokenized = as_text(series(&table, TOKENIZED_TEXT)?)?;
        let totals: Vec<Option<i64>> = tokenized
            .str()?
            .into_iter()
            .map(|cell| cell.map(space_split_len))
            .collect();
        table.with_column(Series::new(TOTAL_TOKENS.into(), totals))?;
    }

    let counts = count_term_frequencies(&table, LOWER_TEXT, vectorizer)?;
    if let Some(taken) = counts
        .get_columns()
        .iter()
        .find(|c| table.column(c.name().as_str()).is_ok())
    {
        return Err(TallyError::DuplicateColumn {
            column: taken.name().to_string(),
        });
    }
    tracing::debug!(
        rows = table.height(),
        terms = counts.width(),
        "attached term counts"
    );
    table.hstack_mut(counts.get_columns())?;
    Ok(table)
}

/// Pieces of `s` split on every single space, empty pieces included.
#[inline]
fn space_split_len(s: &str) -> i64 {
    memchr_iter(b' ', s.as_bytes()).count() as i64 + 1
}
