//! Rule-driven text substitution over notebook cells.

use std::borrow::Cow;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notebook::model::{CellType, Notebook};

/// One substitution: every match of `pattern` becomes `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizeRule {
    /// Regular expression to find.
    pub pattern: String,
    /// Literal replacement text; `$` has no special meaning.
    pub replacement: String,
}

impl AnonymizeRule {
    /// Creates a rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Compiled, ordered substitution rules.
///
/// Rules run in sequence, each over the output of the previous one, so a
/// longer phrase must come before the names it contains.
///
/// # Example
///
/// ```
/// use tally_core::notebook::{AnonymizeRule, Anonymizer};
///
/// let anonymizer = Anonymizer::new(&[
///     AnonymizeRule::new(r"\.\s*Smith and Jones", ". The Authors"),
///     AnonymizeRule::new("Smith and Jones", "the authors"),
///     AnonymizeRule::new("Smith", "Author1"),
/// ])
/// .unwrap();
///
/// assert_eq!(
///     anonymizer.apply("As shown.  Smith and Jones argue, Smith (2020)"),
///     "As shown. The Authors argue, Author1 (2020)"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Anonymizer {
    rules: Vec<(Regex, String)>,
}

impl Anonymizer {
    /// Compiles `rules`, failing on the first invalid pattern.
    pub fn new(rules: &[AnonymizeRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| Ok((Regex::new(&rule.pattern)?, rule.replacement.clone())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule in order to `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let mut out = Cow::Borrowed(text);
        for (pattern, replacement) in &self.rules {
            let replaced = match pattern.replace_all(&out, NoExpand(replacement)) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                out = Cow::Owned(s);
            }
        }
        out
    }

    /// Rewrites the source of every markdown and code cell. Returns the
    /// number of cells changed.
    pub fn anonymize(&self, notebook: &mut Notebook) -> usize {
        let mut changed = 0;
        for cell in &mut notebook.cells {
            if !matches!(cell.cell_type, CellType::Markdown | CellType::Code) {
                continue;
            }
            let rewritten = match self.apply(&cell.source) {
                Cow::Owned(text) => Some(text),
                Cow::Borrowed(_) => None,
            };
            if let Some(text) = rewritten {
                cell.source = text;
                changed += 1;
            }
        }
        tracing::debug!(changed, rules = self.rules.len(), "anonymized notebook");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::model::Cell;
    use serde_json::Map;

    fn anonymizer() -> Anonymizer {
        Anonymizer::new(&[
            AnonymizeRule::new(r"\.\s*Rivera and Chen", ". The Authors"),
            AnonymizeRule::new("Rivera and Chen", "the authors"),
            AnonymizeRule::new("Rivera", "Author1"),
            AnonymizeRule::new("Chen", "Author2"),
        ])
        .unwrap()
    }

    #[test]
    fn rules_apply_in_order() {
        let a = anonymizer();
        assert_eq!(
            a.apply("Done.   Rivera and Chen show that Rivera and Chen disagree with Chen."),
            "Done. The Authors show that the authors disagree with Author2."
        );
    }

    #[test]
    fn untouched_text_is_borrowed() {
        assert!(matches!(anonymizer().apply("nothing here"), Cow::Borrowed(_)));
    }

    #[test]
    fn replacement_is_literal() {
        let a = Anonymizer::new(&[AnonymizeRule::new("(name)", "$1 cost $5")]).unwrap();
        assert_eq!(a.apply("name"), "$1 cost $5");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(Anonymizer::new(&[AnonymizeRule::new("(", "x")]).is_err());
    }

    #[test]
    fn only_markdown_and_code_cells_change() {
        let mut nb = Notebook {
            cells: vec![
                Cell::new(CellType::Markdown, "by Rivera"),
                Cell::new(CellType::Code, "author = 'Chen'"),
                Cell::new(CellType::Raw, "Rivera"),
                Cell::new(CellType::Markdown, "no names"),
            ],
            extra: Map::new(),
        };
        assert_eq!(anonymizer().anonymize(&mut nb), 2);
        assert_eq!(nb.cells[0].source, "by Author1");
        assert_eq!(nb.cells[1].source, "author = 'Author2'");
        assert_eq!(nb.cells[2].source, "Rivera");
    }
}
