//! Spam classification: feature extraction, models and training.
//!
//! # Architecture
//!
//! - [`Vectorizer`](vectorizer::Vectorizer) trait: text → [`SparseVector`](vector::SparseVector)
//! - [`Classifier`](classifier::Classifier) trait: vectors → raw class codes
//! - [`ClassifierPipeline`](pipeline::ClassifierPipeline): both halves composed,
//!   decoding codes into [`Label`](label::Label)s
//! - [`training`]: fitting and evaluating the models
//!
//! # Example
//!
//! ```rust
//! use scamcheck::analysis::TextNormalizer;
//! use scamcheck::ml::label::Label;
//! use scamcheck::ml::training::{self, TrainingParams, TrainingSample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples = vec![
//!     TrainingSample::new("You WON a free prize, call now", Label::Scam),
//!     TrainingSample::new("See you at lunch", Label::LikelyNotScam),
//! ];
//!
//! let normalizer = TextNormalizer::new();
//! let model = training::train(&samples, &normalizer, &TrainingParams::default())?;
//! let pipeline = model.pipeline()?;
//!
//! let label = pipeline.classify(&normalizer.normalize("free prize!!!")?)?;
//! assert_eq!(label, Label::Scam);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod label;
pub mod pipeline;
pub mod training;
pub mod vector;
pub mod vectorizer;

pub use classifier::{Classifier, ClassifierModel, LinearModel, MultinomialNb};
pub use label::Label;
pub use pipeline::ClassifierPipeline;
pub use vector::SparseVector;
pub use vectorizer::{Norm, TfIdfParams, TfIdfVectorizer, Vectorizer};
