//! Text normalization.
//!
//! Produces the `lower_text` representation every later stage counts
//! against. By default this is plain Unicode lowercasing, so literal
//! substring counts over the normalized text agree with counts over the
//! source text read case-insensitively.

#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\t' | b'\r')
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Collapse runs of ASCII whitespace into one space and drop trailing
    /// whitespace.
    pub collapse_whitespace: bool,
    /// Fold diacritical marks off Latin characters ("café" becomes "cafe").
    pub strip_diacritics: bool,
}

/// Lowercasing text normalizer.
///
/// ASCII input takes a byte-wise path; anything else goes through
/// `char::to_lowercase`, so expanding lowercase forms (`İ`) stay valid UTF-8.
///
/// # Examples
///
/// ```
/// use tally_core::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("The Tool"), "the tool");
///
/// let folding = TextNormalizer::new(NormalizerConfig {
///     collapse_whitespace: true,
///     strip_diacritics: true,
/// });
/// assert_eq!(folding.normalize("Café   Müller "), "cafe muller");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[inline(always)]
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes text into an existing buffer, clearing it first.
    ///
    /// Reuses the buffer's capacity if sufficient.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let collapse = self.config.collapse_whitespace;
        let strip = self.config.strip_diacritics;
        let mut prev_space = false;

        for ch in input.chars() {
            if ch.is_ascii() {
                let b = ch as u8;
                if collapse && is_ascii_ws(b) {
                    if !prev_space {
                        out.push(' ');
                        prev_space = true;
                    }
                    continue;
                }
                out.push(b.to_ascii_lowercase() as char);
                prev_space = false;
                continue;
            }

            for lowered in ch.to_lowercase() {
                if strip {
                    if let Some(folded) = fold_latin(lowered) {
                        out.push(folded);
                    }
                } else {
                    out.push(lowered);
                }
            }
            prev_space = false;
        }

        if collapse && prev_space {
            out.pop();
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Folds a lowercase Latin character to its unaccented base letter.
///
/// Returns `None` for combining marks, which are dropped.
#[inline]
fn fold_latin(c: char) -> Option<char> {
    if ('\u{0300}'..='\u{036F}').contains(&c) {
        return None;
    }

    let base = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' | 'æ' => 'a',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'ð' | 'đ' | 'ď' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' | 'ĺ' => 'l',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' | 'ŏ' | 'ő' | 'œ' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' | 'ß' => 's',
        'ť' | 'ţ' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ž' | 'ż' => 'z',
        _ => c,
    };
    Some(base)
}
