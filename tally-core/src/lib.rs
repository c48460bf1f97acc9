//! Term-frequency statistics over a text corpus, and notebook tooling for
//! the article that presents them.
//!
//! The [`pipeline`] turns a CSV corpus and a fixed vocabulary into one row
//! per (year, term) with raw counts, length-normalized frequencies and
//! token totals, ready for charting. It is built from the [`analyzer`]
//! (normalize, tokenize, count) on top of `polars` data frames; [`frame`]
//! holds the shared column lookups and CSV interchange.
//! The [`notebook`] module tags figure cells with their sources and
//! anonymizes author names in the article notebook.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod notebook;
pub mod pipeline;

pub use config::{AnalyzerConfig, NotebookConfig, RunConfig};
pub use error::{Result, TallyError};
pub use polars::prelude::DataFrame;
pub use pipeline::{process_data, process_table, PipelineOptions, PipelineStats};
