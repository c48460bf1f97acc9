//! TOML configuration for the `tally` commands.
//!
//! A run configuration names the corpus, its columns and the vocabulary:
//!
//! ```toml
//! input = "data/conference_abstracts.csv"
//! text_column = "full_text"
//! date_column = "conference_year"
//! terms = ["tool", "tools", "method", "e.g."]
//! data_origin = "Conference abstracts"
//! title = "Conference abstracts by year"
//! term_type = "tool_term"
//! term_mapping = true
//! joined_term = "tool"
//! output = "out/tool_counts.csv"
//! wide = true
//!
//! [analyzer]
//! ngram_range = [1, 2]
//! strip_diacritics = false
//! ```
//!
//! Relative `input` and `output` paths are resolved against the directory
//! of the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_types::{NgramRange, Vocabulary};

use crate::analyzer::NormalizerConfig;
use crate::error::{Result, TallyError};
use crate::notebook::AnonymizeRule;
use crate::pipeline::PipelineOptions;

/// Text analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Shortest and longest word n-gram counted, inclusive.
    pub ngram_range: [usize; 2],
    /// Fold Latin diacritics off the lowercased text.
    pub strip_diacritics: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let range = NgramRange::default();
        Self {
            ngram_range: [range.min, range.max],
            strip_diacritics: false,
        }
    }
}

impl AnalyzerConfig {
    /// The validated n-gram range.
    pub fn ngram_range(&self) -> Result<NgramRange> {
        let [min, max] = self.ngram_range;
        NgramRange::new(min, max).ok_or_else(|| {
            TallyError::Config(format!(
                "analyzer.ngram_range must satisfy 1 <= min <= max, got [{min}, {max}]"
            ))
        })
    }
}

/// One term-frequency run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Corpus CSV file.
    pub input: PathBuf,
    /// Column holding the document text.
    pub text_column: String,
    /// Column holding the document year.
    pub date_column: String,
    /// Terms to count.
    pub terms: Vocabulary,
    /// Value of the `data_origin` output column.
    #[serde(default)]
    pub data_origin: String,
    /// Value of the `title` output column.
    #[serde(default)]
    pub title: String,
    /// Name of the output term column.
    pub term_type: String,
    /// Restore the terms' casing in the output.
    #[serde(default)]
    pub term_mapping: bool,
    /// Term whose singular and plural counts are merged.
    #[serde(default)]
    pub joined_term: Option<String>,
    /// Aggregate CSV destination; standard output when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Also write a date by term grid of `counts` next to `output`.
    #[serde(default)]
    pub wide: bool,
    /// Text analysis settings.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl RunConfig {
    /// Parses and validates a configuration.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, resolving relative paths against its
    /// directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        if let Some(base) = path.parent() {
            config.input = base.join(&config.input);
            config.output = config.output.map(|out| base.join(out));
        }
        tracing::debug!(path = %path.display(), terms = %config.terms, "loaded run config");
        Ok(config)
    }

    /// Checks the fields serde cannot.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("text_column", &self.text_column),
            ("date_column", &self.date_column),
            ("term_type", &self.term_type),
        ] {
            if value.trim().is_empty() {
                return Err(TallyError::Config(format!("{field} must not be empty")));
            }
        }
        if let Some(term) = &self.joined_term {
            if term.is_empty() {
                return Err(TallyError::Config("joined_term must not be empty".to_owned()));
            }
        }
        self.analyzer.ngram_range()?;
        Ok(())
    }

    /// Call parameters for [`crate::pipeline::process_data`].
    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        Ok(PipelineOptions {
            input: self.input.clone(),
            text_column: self.text_column.clone(),
            date_column: self.date_column.clone(),
            vocabulary: self.terms.clone(),
            data_origin: self.data_origin.clone(),
            title: self.title.clone(),
            term_type: self.term_type.clone(),
            term_mapping: self.term_mapping,
            joined_term: self.joined_term.clone(),
            ngram_range: self.analyzer.ngram_range()?,
            normalizer: NormalizerConfig {
                collapse_whitespace: false,
                strip_diacritics: self.analyzer.strip_diacritics,
            },
        })
    }

    /// Path of the wide grid written beside `output`, if any.
    pub fn wide_output(&self) -> Option<PathBuf> {
        let output = self.output.as_ref().filter(|_| self.wide)?;
        let stem = output.file_stem()?.to_string_lossy();
        Some(output.with_file_name(format!("{stem}_wide.csv")))
    }
}

/// Anonymization rules for `tally anonymize`.
///
/// ```toml
/// [[anonymize]]
/// pattern = '\.\s*Smith and Jones'
/// replacement = ". The Authors"
///
/// [[anonymize]]
/// pattern = "Smith"
/// replacement = "Author1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotebookConfig {
    /// Substitutions, applied in file order.
    pub anonymize: Vec<AnonymizeRule>,
}

impl NotebookConfig {
    /// Parses a rules file.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads a rules file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
