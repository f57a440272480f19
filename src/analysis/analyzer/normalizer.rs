//! SMS text normalizer.
//!
//! Cleans a raw message before feature extraction:
//!
//! 1. lowercase every character
//! 2. remove the 32 ASCII punctuation characters
//! 3. split on whitespace, drop stop words, rejoin with single spaces
//!
//! Token order is preserved. Empty input, or input made only of punctuation
//! and stop words, normalizes to the empty string.
//!
//! # Examples
//!
//! ```
//! use scamcheck::analysis::analyzer::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new();
//! let cleaned = normalizer.normalize("WIN a FREE prize!!! call now").unwrap();
//! assert_eq!(cleaned, "win free prize call");
//! ```

use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::punctuation::PunctuationCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Analyzer that turns a raw SMS into its normalized form.
#[derive(Clone)]
pub struct TextNormalizer {
    inner: PipelineAnalyzer,
    stop_filter: StopFilter,
}

impl TextNormalizer {
    /// Create a normalizer with the built-in English stop words.
    pub fn new() -> Self {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Create a normalizer with a custom stop filter.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PunctuationCharFilter::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter.clone()))
            .with_name("sms_normalizer");

        TextNormalizer {
            inner: analyzer,
            stop_filter,
        }
    }

    /// Create a normalizer whose stop words come from a cached corpus file.
    pub fn from_stopword_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_stop_filter(StopFilter::from_file(path)?))
    }

    /// Normalize a message into lowercase, punctuation-free, stopword-free text.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let tokens: Vec<String> = self
            .analyze(text)?
            .filter(|token| !token.is_stopped())
            .map(|token| token.text)
            .collect();
        let normalized = tokens.join(" ");
        debug!(
            "Normalized {} chars into {} tokens",
            text.chars().count(),
            tokens.len()
        );
        Ok(normalized)
    }

    /// Get the stop filter used by this normalizer.
    pub fn stop_filter(&self) -> &StopFilter {
        &self.stop_filter
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for TextNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "sms_normalizer"
    }
}

impl Debug for TextNormalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("inner", &self.inner)
            .field("stop_words", &self.stop_filter.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::char_filter::punctuation::ASCII_PUNCTUATION;

    #[test]
    fn test_normalize_scenarios() {
        let normalizer = TextNormalizer::new();

        assert_eq!(
            normalizer.normalize("WIN a FREE prize!!! call now").unwrap(),
            "win free prize call"
        );
        assert_eq!(
            normalizer
                .normalize("Hey, are we still meeting for lunch?")
                .unwrap(),
            "hey still meeting lunch"
        );
    }

    #[test]
    fn test_normalize_empty_and_degenerate() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("").unwrap(), "");
        assert_eq!(normalizer.normalize("   \n\t").unwrap(), "");
        assert_eq!(normalizer.normalize("?!... ,,,").unwrap(), "");
        assert_eq!(normalizer.normalize("The AND of it, is it?").unwrap(), "");
        assert_eq!(normalizer.normalize(ASCII_PUNCTUATION).unwrap(), "");
    }

    #[test]
    fn test_punctuation_joins_words() {
        let normalizer = TextNormalizer::new();

        // Punctuation is deleted before splitting, so contractions collapse
        assert_eq!(normalizer.normalize("Don't DELAY").unwrap(), "dont delay");
        assert_eq!(
            normalizer.normalize("Txt STOP to 87021.  £1.50/msg").unwrap(),
            "txt stop 87021 £150msg"
        );
    }

    #[test]
    fn test_custom_stop_filter() {
        let normalizer = TextNormalizer::with_stop_filter(StopFilter::from_words(vec!["urgent"]));

        assert_eq!(
            normalizer.normalize("URGENT: the prize is yours").unwrap(),
            "the prize is yours"
        );
        assert_eq!(normalizer.stop_filter().len(), 1);
    }

    #[test]
    fn test_marked_stop_words_are_dropped() {
        let normalizer =
            TextNormalizer::with_stop_filter(StopFilter::new().remove_stopped(false));

        assert_eq!(
            normalizer.normalize("WIN a FREE prize!!! call now").unwrap(),
            "win free prize call"
        );
        assert_eq!(normalizer.normalize("the and of").unwrap(), "");
    }

    #[test]
    fn test_analyzer_name() {
        assert_eq!(TextNormalizer::new().name(), "sms_normalizer");
    }
}
