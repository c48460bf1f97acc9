//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Lowercases raw text into `lower_text`
//! - **Tokenizer**: Splits lowercased text into word tokens
//! - **Vectorizer**: Counts a fixed vocabulary over tokens, n-grams and literals

pub mod normalizer;
pub mod tokenizer;
pub mod vectorizer;

pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
pub use vectorizer::TermVectorizer;
