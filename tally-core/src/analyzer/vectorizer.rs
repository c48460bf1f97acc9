//! Fixed-vocabulary term counting.
//!
//! [`TermVectorizer`] counts, for one document, how often every vocabulary
//! term occurs. Plain terms are matched against word n-grams of the
//! document (unigrams and bigrams by default); terms containing a period
//! are counted as literal, non-overlapping substrings because the
//! tokenizer would split them apart.
//!
//! Text handed to the vectorizer is expected to be normalized already (the
//! enricher's `lower_text`). Terms go through the same [`TextNormalizer`]
//! when the vectorizer is built, so folding options apply to both sides.

use memchr::memmem;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tally_types::{NgramRange, TermKind, Vocabulary};

use crate::analyzer::normalizer::TextNormalizer;
use crate::analyzer::tokenizer::Tokenizer;

/// Term indices sharing one match key. Almost always a single term.
type TermSlots = SmallVec<[usize; 1]>;

/// Counts vocabulary terms in lowercased documents.
///
/// # Example
///
/// ```
/// use tally_core::analyzer::vectorizer::TermVectorizer;
/// use tally_types::{NgramRange, Vocabulary};
///
/// let vocab = Vocabulary::new(["tool", "is a", "e.g."]);
/// let vectorizer = TermVectorizer::new(vocab, NgramRange::default());
///
/// assert_eq!(vectorizer.count("the tool is a tool"), vec![2, 1, 0]);
/// assert_eq!(vectorizer.count("see e.g. above e.g. again"), vec![0, 0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct TermVectorizer {
    vocabulary: Vocabulary,
    ngram_range: NgramRange,
    tokenizer: Tokenizer,
    ngrams: FxHashMap<String, TermSlots>,
    literals: Vec<(usize, String)>,
}

impl TermVectorizer {
    /// Builds a vectorizer with the default normalizer and tokenizer.
    pub fn new(vocabulary: Vocabulary, ngram_range: NgramRange) -> Self {
        Self::with_analyzers(vocabulary, ngram_range, TextNormalizer::default(), Tokenizer::default())
    }

    /// Builds a vectorizer whose terms are normalized by `normalizer`.
    ///
    /// Pass the normalizer that produced the documents' text.
    pub fn with_normalizer(
        vocabulary: Vocabulary,
        ngram_range: NgramRange,
        normalizer: TextNormalizer,
    ) -> Self {
        Self::with_analyzers(vocabulary, ngram_range, normalizer, Tokenizer::default())
    }

    /// Builds a vectorizer from explicit analyzer parts.
    ///
    /// A token term is keyed by its own normalized tokens joined with single
    /// spaces, so `"Digital-Humanities"` matches the bigram
    /// `digital humanities`.
    pub fn with_analyzers(
        vocabulary: Vocabulary,
        ngram_range: NgramRange,
        normalizer: TextNormalizer,
        tokenizer: Tokenizer,
    ) -> Self {
        let mut ngrams: FxHashMap<String, TermSlots> = FxHashMap::default();
        let mut literals = Vec::new();

        for (idx, (term, kind)) in vocabulary.iter().enumerate() {
            let normalized = normalizer.normalize(term);
            match kind {
                TermKind::Literal => literals.push((idx, normalized)),
                TermKind::Token => {
                    let key = tokenizer.tokenized(&normalized);
                    let words = if key.is_empty() {
                        0
                    } else {
                        key.split(' ').count()
                    };
                    if !ngram_range.contains(words) {
                        tracing::warn!(
                            term,
                            words,
                            min = ngram_range.min,
                            max = ngram_range.max,
                            "term can never match; its count will always be zero"
                        );
                        continue;
                    }
                    ngrams.entry(key).or_default().push(idx);
                }
            }
        }

        Self {
            vocabulary,
            ngram_range,
            tokenizer,
            ngrams,
            literals,
        }
    }

    /// The vocabulary being counted, in output order.
    #[inline(always)]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The tokenizer documents and terms are split with.
    #[inline(always)]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Counts every term in `text`, writing into `counts`.
    ///
    /// `counts` must hold one slot per vocabulary term; it is zeroed first.
    pub fn count_into(&self, text: &str, counts: &mut [u32]) {
        debug_assert_eq!(counts.len(), self.vocabulary.len());
        counts.fill(0);

        if !self.ngrams.is_empty() {
            self.count_ngrams(text, counts);
        }

        for (idx, literal) in &self.literals {
            counts[*idx] = memmem::find_iter(text.as_bytes(), literal.as_bytes()).count() as u32;
        }
    }

    /// Counts every term in `text`.
    pub fn count(&self, text: &str) -> Vec<u32> {
        let mut counts = vec![0u32; self.vocabulary.len()];
        self.count_into(text, &mut counts);
        counts
    }

    fn count_ngrams(&self, text: &str, counts: &mut [u32]) {
        let NgramRange { min, max } = self.ngram_range;
        let mut window: SmallVec<[&str; 4]> = SmallVec::new();
        let mut key = String::with_capacity(64);

        self.tokenizer.tokenize(text, |token, _| {
            if window.len() == max {
                window.remove(0);
            }
            window.push(token);

            // Every n-gram ending at this token, shortest first.
            for n in min..=window.len() {
                key.clear();
                for (i, word) in window[window.len() - n..].iter().enumerate() {
                    if i > 0 {
                        key.push(' ');
                    }
                    key.push_str(word);
                }
                if let Some(slots) = self.ngrams.get(key.as_str()) {
                    for &idx in slots {
                        counts[idx] += 1;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(terms: &[&str]) -> TermVectorizer {
        TermVectorizer::new(Vocabulary::new(terms.iter().copied()), NgramRange::default())
    }

    #[test]
    fn counts_unigrams() {
        let v = vectorizer(&["tool", "method"]);
        assert_eq!(v.count("tool tool"), vec![2, 0]);
        assert_eq!(v.count("method"), vec![0, 1]);
    }

    #[test]
    fn counts_bigrams() {
        let v = vectorizer(&["tool", "is a"]);
        assert_eq!(v.count("the tool is a tool"), vec![2, 1]);
    }

    #[test]
    fn bigrams_do_not_cross_missing_words() {
        let v = vectorizer(&["digital humanities"]);
        assert_eq!(v.count("digital and humanities"), vec![0]);
        assert_eq!(v.count("digital, humanities"), vec![1]);
    }

    #[test]
    fn literal_terms_count_substrings() {
        let v = vectorizer(&["e.g."]);
        let text = "see e.g. above e.g. again";
        assert_eq!(v.count(text), vec![2]);
        assert_eq!(v.count(text)[0] as usize, text.matches("e.g.").count());
    }

    #[test]
    fn literal_terms_are_not_regexes() {
        let v = vectorizer(&["e.g."]);
        assert_eq!(v.count("eagle"), vec![0]);
    }

    #[test]
    fn literal_counts_do_not_overlap() {
        let v = vectorizer(&["a.a"]);
        assert_eq!(v.count("a.a.a"), vec![1]);
    }

    #[test]
    fn terms_match_case_insensitively() {
        let v = vectorizer(&["Python", "R", "Node.JS"]);
        assert_eq!(v.count("python and r and node.js"), vec![1, 1, 1]);
    }

    #[test]
    fn hyphenated_terms_match_their_tokens() {
        let v = vectorizer(&["close-reading"]);
        assert_eq!(v.count("close reading is close-reading"), vec![2]);
    }

    #[test]
    fn duplicate_terms_each_get_counts() {
        let v = vectorizer(&["tool", "Tool"]);
        assert_eq!(v.count("tool"), vec![1, 1]);
    }

    #[test]
    fn long_terms_outside_range_stay_zero() {
        let v = vectorizer(&["text mining tool"]);
        assert_eq!(v.count("text mining tool"), vec![0]);

        let trigrams = TermVectorizer::new(
            Vocabulary::new(["text mining tool"]),
            NgramRange::new(1, 3).unwrap(),
        );
        assert_eq!(trigrams.count("a text mining tool"), vec![1]);
    }

    #[test]
    fn min_range_skips_unigrams() {
        let v = TermVectorizer::new(
            Vocabulary::new(["tool", "the tool"]),
            NgramRange::new(2, 2).unwrap(),
        );
        assert_eq!(v.count("the tool"), vec![0, 1]);
    }

    #[test]
    fn terms_are_folded_like_documents() {
        use crate::analyzer::normalizer::NormalizerConfig;

        let normalizer = TextNormalizer::new(NormalizerConfig {
            strip_diacritics: true,
            ..NormalizerConfig::default()
        });
        let v = TermVectorizer::with_normalizer(
            Vocabulary::new(["Café", "café."]),
            NgramRange::default(),
            normalizer,
        );
        let text = normalizer.normalize("Café culture and the café.");
        assert_eq!(v.count(&text), vec![2, 1]);
    }

    #[test]
    fn empty_vocabulary() {
        let v = vectorizer(&[]);
        assert!(v.count("anything at all").is_empty());
    }

    #[test]
    fn empty_text() {
        let v = vectorizer(&["tool", "e.g."]);
        assert_eq!(v.count(""), vec![0, 0]);
    }

    #[test]
    fn count_into_resets_slots() {
        let v = vectorizer(&["tool"]);
        let mut counts = vec![7u32];
        v.count_into("no match", &mut counts);
        assert_eq!(counts, vec![0]);
    }
}
