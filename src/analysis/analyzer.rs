//! Analyzer implementations that combine tokenizers and filters.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod normalizer;
pub mod pipeline;

pub use analyzer::Analyzer;
pub use normalizer::TextNormalizer;
pub use pipeline::PipelineAnalyzer;
