//! Term-frequency pipeline.
//!
//! A single batch pass over one corpus file:
//!
//! ```text
//! load_corpus -> enrich_documents -> [merge_joined_term] -> melt_terms
//!             -> [canonicalize_terms] -> aggregate
//! ```
//!
//! Each stage takes the previous stage's `polars` [`DataFrame`] and returns
//! a new one. [`process_data`] runs the whole pass from a CSV path;
//! [`process_table`] starts from a frame already in memory.

pub mod aggregate;
pub mod counter;
pub mod enrich;
pub mod loader;
pub mod reshape;

mod stats;

use std::path::PathBuf;
use std::time::Instant;

use polars::prelude::DataFrame;
use tally_types::{NgramRange, Vocabulary};

use crate::analyzer::{NormalizerConfig, TermVectorizer, TextNormalizer};
use crate::error::Result;
use crate::frame::read_csv;

pub use aggregate::{aggregate, to_wide};
pub use counter::count_term_frequencies;
pub use enrich::enrich_documents;
pub use loader::{cleaned_date_column, load_corpus, prepare_corpus};
pub use reshape::{canonicalize_terms, melt_terms, merge_joined_term};
pub use stats::PipelineStats;

/// Parameters of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Corpus CSV file.
    pub input: PathBuf,
    /// Column holding the document text.
    pub text_column: String,
    /// Column holding the document year.
    pub date_column: String,
    /// Terms to count, in output order.
    pub vocabulary: Vocabulary,
    /// Value of the `data_origin` output column.
    pub data_origin: String,
    /// Value of the `title` output column.
    pub title: String,
    /// Name of the output column holding the term.
    pub term_type: String,
    /// Restore the vocabulary's casing in the term column.
    pub term_mapping: bool,
    /// Term whose singular and plural columns are merged before melting.
    pub joined_term: Option<String>,
    /// Word n-gram lengths plain terms are matched against.
    pub ngram_range: NgramRange,
    /// How `lower_text` is derived from the text column.
    pub normalizer: NormalizerConfig,
}

impl PipelineOptions {
    /// Options with the default analyzer and no merge or case mapping.
    pub fn new(
        input: impl Into<PathBuf>,
        text_column: impl Into<String>,
        date_column: impl Into<String>,
        vocabulary: Vocabulary,
        term_type: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            text_column: text_column.into(),
            date_column: date_column.into(),
            vocabulary,
            data_origin: String::new(),
            title: String::new(),
            term_type: term_type.into(),
            term_mapping: false,
            joined_term: None,
            ngram_range: NgramRange::default(),
            normalizer: NormalizerConfig::default(),
        }
    }

    /// Sets the provenance columns.
    pub fn with_provenance(mut self, data_origin: impl Into<String>, title: impl Into<String>) -> Self {
        self.data_origin = data_origin.into();
        self.title = title.into();
        self
    }
}

/// Runs the pipeline over the CSV file named by `options.input`.
pub fn process_data(options: &PipelineOptions) -> Result<(DataFrame, PipelineStats)> {
    let table = read_csv(&options.input)?;
    tracing::info!(
        input = %options.input.display(),
        rows = table.height(),
        "loaded corpus"
    );
    process_table(table, options)
}

/// Runs the pipeline over an in-memory corpus table.
pub fn process_table(table: DataFrame, options: &PipelineOptions) -> Result<(DataFrame, PipelineStats)> {
    let start = Instant::now();
    let documents_read = table.height();

    let corpus = prepare_corpus(table, &options.text_column, &options.date_column)?;
    let documents_kept = corpus.height();
    tracing::info!(
        kept = documents_kept,
        dropped = documents_read - documents_kept,
        "filtered corpus"
    );

    let normalizer = TextNormalizer::new(options.normalizer);
    let vectorizer =
        TermVectorizer::with_normalizer(options.vocabulary.clone(), options.ngram_range, normalizer);
    tracing::debug!(vocabulary = %options.vocabulary, "counting terms");
    let mut combined = enrich_documents(corpus, &options.text_column, &normalizer, &vectorizer)?;

    let mut term_columns: Vec<&str> = options.vocabulary.terms().iter().map(String::as_str).collect();
    if let Some(key) = options.joined_term.as_deref() {
        combined = merge_joined_term(combined, key)?;
        let plural = format!("{key}s");
        term_columns.retain(|t| *t != key && *t != plural);
        term_columns.push(key);
    }

    let mut long = melt_terms(&combined, &term_columns, &options.term_type)?;
    if options.term_mapping {
        canonicalize_terms(&mut long, &options.term_type, &options.vocabulary)?;
    }

    let date_column = cleaned_date_column(&options.date_column);
    let out = aggregate(
        &long,
        &date_column,
        &options.term_type,
        &options.data_origin,
        &options.title,
    )?;

    let stats = PipelineStats {
        documents_read,
        documents_kept,
        terms: term_columns.len(),
        long_rows: long.height(),
        aggregate_rows: out.height(),
        elapsed: start.elapsed(),
    };
    tracing::info!(%stats, "pipeline finished");
    Ok((out, stats))
}
