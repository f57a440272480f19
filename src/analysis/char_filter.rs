//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw text before it reaches the tokenizer, so
//! they can remove or rewrite characters that would otherwise end up inside
//! tokens.
//!
//! # Available Filters
//!
//! - [`punctuation::PunctuationCharFilter`] - Removes ASCII punctuation
//!
//! # Examples
//!
//! ```
//! use scamcheck::analysis::char_filter::CharFilter;
//! use scamcheck::analysis::char_filter::punctuation::PunctuationCharFilter;
//!
//! let filter = PunctuationCharFilter::new();
//! assert_eq!(filter.filter("free!!! call-now"), "free callnow");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the filtered text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod punctuation;
