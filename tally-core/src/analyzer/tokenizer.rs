//! Streaming word tokenizer.
//!
//! Splits lowercased text into word tokens for n-gram counting. A token is a
//! maximal run of word characters (Unicode alphanumerics and `_`); every
//! other character, punctuation included, separates tokens. This is why
//! terms containing a period cannot be counted from tokens and are matched
//! as literals instead.
//!
//! ```ignore
//! "the tool, is a tool" -> ("the", 0) ("tool", 1) ("is", 2) ("a", 3) ("tool", 4)
//! ```
//!
//! Tokens are slices of the input; nothing is allocated per token.

/// Streaming tokenizer emitting word tokens with their positions.
///
/// # Example
///
/// ```
/// use tally_core::analyzer::tokenizer::Tokenizer;
///
/// let mut tokens = Vec::new();
/// Tokenizer::default().tokenize("see e.g. above", |text, pos| tokens.push((text, pos)));
///
/// assert_eq!(tokens, vec![("see", 0), ("e", 1), ("g", 2), ("above", 3)]);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Tokenizer {
    min_chars: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Tokenizer {
    /// Creates a tokenizer that drops tokens shorter than `min_chars`
    /// characters. Positions count only emitted tokens.
    #[inline]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Tokenizes `text` and emits `(token, position)` left to right.
    pub fn tokenize<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(&'t str, u32),
    {
        let mut pos = 0u32;
        let mut start: Option<usize> = None;
        let mut chars_in_run = 0usize;

        for (i, c) in text.char_indices() {
            if is_word_char(c) {
                if start.is_none() {
                    start = Some(i);
                    chars_in_run = 0;
                }
                chars_in_run += 1;
            } else if let Some(s) = start.take() {
                if chars_in_run >= self.min_chars {
                    emit(&text[s..i], pos);
                    pos = pos.saturating_add(1);
                }
            }
        }

        if let Some(s) = start {
            if chars_in_run >= self.min_chars {
                emit(&text[s..], pos);
            }
        }
    }

    /// Returns the tokens of `text` joined by single spaces.
    ///
    /// This is the `tokenized_text` representation document token totals
    /// are derived from.
    pub fn tokenized(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.tokenize(text, |token, pos| {
            if pos > 0 {
                out.push(' ');
            }
            out.push_str(token);
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(&str, u32)> {
        let mut out = Vec::new();
        Tokenizer::default().tokenize(input, |text, pos| out.push((text, pos)));
        out
    }

    #[test]
    fn splits_on_whitespace() {
        let out = collect("hello world");
        assert_eq!(out, vec![("hello", 0), ("world", 1)]);
    }

    #[test]
    fn splits_on_punctuation() {
        let out = collect("tool, tools; (digital-humanities)");
        let words: Vec<&str> = out.iter().map(|(t, _)| *t).collect();
        assert_eq!(words, vec!["tool", "tools", "digital", "humanities"]);
    }

    #[test]
    fn positions_are_sequential() {
        let out = collect("  the quick  brown fox ");
        assert_eq!(out.len(), 4);
        for (i, (_, pos)) in out.iter().enumerate() {
            assert_eq!(*pos, i as u32);
        }
    }

    #[test]
    fn empty_emits_nothing() {
        assert!(collect("").is_empty());
        assert!(collect(" ,.; ").is_empty());
    }

    #[test]
    fn single_char_tokens_kept_by_default() {
        assert_eq!(collect("is a"), vec![("is", 0), ("a", 1)]);
    }

    #[test]
    fn min_chars_drops_short_tokens() {
        let mut out = Vec::new();
        Tokenizer::new(2).tokenize("is a tool", |t, p| out.push((t, p)));
        assert_eq!(out, vec![("is", 0), ("tool", 1)]);
    }

    #[test]
    fn underscores_and_digits_are_word_chars() {
        assert_eq!(collect("snake_case r2d2"), vec![("snake_case", 0), ("r2d2", 1)]);
    }

    #[test]
    fn unicode_words() {
        assert_eq!(collect("café über"), vec![("café", 0), ("über", 1)]);
    }

    #[test]
    fn tokens_are_slices_of_input() {
        let input = String::from("hello world");
        let base = input.as_ptr() as usize;
        let end = base + input.len();

        Tokenizer::default().tokenize(&input, |text, _| {
            let ptr = text.as_ptr() as usize;
            assert!(ptr >= base && ptr < end);
        });
    }

    #[test]
    fn tokenized_joins_with_single_spaces() {
        let t = Tokenizer::default();
        assert_eq!(t.tokenized("the  tool,is\ta tool."), "the tool is a tool");
        assert_eq!(t.tokenized(""), "");
    }
}
