//! # scamcheck
//!
//! Classifies SMS messages as scam or not.
//!
//! ## Features
//!
//! - Text normalization pipeline (punctuation removal, lowercasing, stop words)
//! - TF-IDF features with naive Bayes or linear classifiers
//! - Versioned JSON and bincode artifacts
//! - Training and evaluation on labeled corpora
//! - Command line interface

pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod ml;

pub mod prelude {
    pub use crate::analysis::{Analyzer, TextNormalizer};
    pub use crate::config::CheckerConfig;
    pub use crate::context::{CheckOutcome, CheckerContext};
    pub use crate::error::{Result, ScamCheckError};
    pub use crate::gate::{EMPTY_INPUT_PROMPT, GateState};
    pub use crate::ml::{ClassifierPipeline, Label};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
