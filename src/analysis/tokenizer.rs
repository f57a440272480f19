//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split text into [`Token`](crate::analysis::token::Token)s and
//! are the first token-level stage of an analysis pipeline.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`regex::RegexTokenizer`] - Extracts regex matches as tokens
//!
//! # Examples
//!
//! ```
//! use scamcheck::analysis::tokenizer::Tokenizer;
//! use scamcheck::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("call  now").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a tokenizer can live inside the shared
/// checker context.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod whitespace;
