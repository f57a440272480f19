//! Text analysis: char filters, tokenizers, token filters and analyzers.
//!
//! The [`TextNormalizer`](analyzer::TextNormalizer) built from these parts is
//! the cleaning step applied to every message before vectorization.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, TextNormalizer};
pub use token::{Token, TokenStream};
