//! Core types shared by the tally term-frequency tools.
//!
//! This crate provides the small value types shared by the analyzer, the
//! configuration layer and the pipeline in `tally-core`:
//!
//! - **Vocabulary**: [`Vocabulary`] is the fixed, ordered term list a run counts
//! - **Term kinds**: [`TermKind`] decides whether a term is matched as words or
//!   as a literal substring
//! - **N-gram range**: [`NgramRange`] bounds the word n-grams a term can match

#![warn(missing_docs)]

use core::fmt;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How a vocabulary term is counted in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Matched against word tokens and their n-grams.
    Token,
    /// Matched as a literal substring of the text.
    ///
    /// Used for terms containing a period (`e.g.`, `node.js`), which a word
    /// tokenizer would split apart.
    Literal,
}

impl TermKind {
    /// Classifies a term.
    #[inline]
    pub fn of(term: &str) -> Self {
        if term.contains('.') {
            TermKind::Literal
        } else {
            TermKind::Token
        }
    }
}

/// Inclusive range of n-gram lengths a vectorizer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange {
    /// Shortest n-gram, in words.
    pub min: usize,
    /// Longest n-gram, in words.
    pub max: usize,
}

impl Default for NgramRange {
    fn default() -> Self {
        Self { min: 1, max: 2 }
    }
}

impl NgramRange {
    /// Creates a range, returning `None` unless `1 <= min <= max`.
    pub const fn new(min: usize, max: usize) -> Option<Self> {
        if min >= 1 && min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Returns `true` if an n-gram of `n` words is counted.
    #[inline(always)]
    pub const fn contains(self, n: usize) -> bool {
        n >= self.min && n <= self.max
    }
}

/// Fixed, ordered list of terms counted over a corpus.
///
/// The list is supplied by the caller and never derived from the corpus.
/// Terms keep the casing they were given; they are matched against
/// lowercased text by their lowercase form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    /// Creates a vocabulary from terms, preserving their order.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Terms in caller order.
    #[inline(always)]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if there are no terms.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates `(term, kind)` pairs in caller order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TermKind)> + '_ {
        self.terms.iter().map(|t| (t.as_str(), TermKind::of(t)))
    }

    /// Maps each term's lowercase form to the term as given.
    ///
    /// When two terms share a lowercase form the later one wins.
    pub fn canonical_case_map(&self) -> HashMap<String, String> {
        self.terms
            .iter()
            .map(|t| (t.to_lowercase(), t.clone()))
            .collect()
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} terms", self.terms.len())?;
        let literal = self
            .iter()
            .filter(|(_, kind)| *kind == TermKind::Literal)
            .count();
        if literal > 0 {
            write!(f, " ({literal} literal)")?;
        }
        Ok(())
    }
}
