//! Per-document vocabulary counts.
//!
//! ## What It Does
//!
//! Turns one text column into a frame of term counts: one `Int64` column
//! per vocabulary term, named by the term as given, in vocabulary order,
//! with one row per input row.
//!
//! - Plain terms count word n-grams of the normalized text
//! - Terms with a period count as literal substrings
//! - A missing text counts as zero occurrences of everything
//!
//! Duplicate terms would produce two columns with the same name, so they
//! are rejected up front.
//!
//! ## Usage
//!
//! ```
//! use polars::prelude::*;
//! use tally_core::analyzer::TermVectorizer;
//! use tally_core::pipeline::count_term_frequencies;
//! use tally_types::{NgramRange, Vocabulary};
//!
//! let docs = df!("lower_text" => ["the tool is a tool"]).unwrap();
//! let vectorizer = TermVectorizer::new(Vocabulary::new(["tool", "is a"]), NgramRange::default());
//! let counts = count_term_frequencies(&docs, "lower_text", &vectorizer).unwrap();
//! assert_eq!(counts.width(), 2);
//! ```

use polars::prelude::*;
use rustc_hash::FxHashSet;

use crate::analyzer::TermVectorizer;
use crate::error::{Result, TallyError};
use crate::frame::{as_text, series};

/// Counts every vocabulary term in `text_column`, one row per input row.
///
/// An empty vocabulary gives a frame without columns.
pub fn count_term_frequencies(
    table: &DataFrame,
    text_column: &str,
    vectorizer: &TermVectorizer,
) -> Result<DataFrame> {
    let vocabulary = vectorizer.vocabulary();
    let mut seen = FxHashSet::default();
    if let Some(dup) = vocabulary.terms().iter().find(|t| !seen.insert(t.as_str())) {
        return Err(TallyError::Config(format!("duplicate term '{dup}' in vocabulary")));
    }

    let texts = as_text(series(table, text_column)?)?;
    let n_terms = vocabulary.len();
    let mut columns: Vec<Vec<i64>> = (0..n_terms)
        .map(|_| Vec::with_capacity(table.height()))
        .collect();
    let mut counts = vec![0u32; n_terms];

    for text in texts.str()? {
        vectorizer.count_into(text.unwrap_or_default(), &mut counts);
        for (column, &n) in columns.iter_mut().zip(&counts) {
            column.push(i64::from(n));
        }
    }

    let columns = vocabulary
        .terms()
        .iter()
        .zip(columns)
        .map(|(term, values)| Series::new(term.as_str().into(), values).into_column())
        .collect();
    Ok(DataFrame::new(columns)?)
}
