//! The immutable checker context shared by every submission.
//!
//! A [`CheckerContext`] is loaded once at startup and then only read, so it can
//! be wrapped in an `Arc` and handed to as many threads as needed.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use scamcheck::analysis::TextNormalizer;
//! use scamcheck::context::{CheckOutcome, CheckerContext};
//! use scamcheck::ml::label::Label;
//! use scamcheck::ml::training::{self, TrainingParams, TrainingSample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples = vec![
//!     TrainingSample::new("You WON a free prize, call now", Label::Scam),
//!     TrainingSample::new("See you at lunch", Label::LikelyNotScam),
//! ];
//! let normalizer = TextNormalizer::new();
//! let model = training::train(&samples, &normalizer, &TrainingParams::default())?;
//! let context = CheckerContext::new(normalizer, model.pipeline()?);
//!
//! assert_eq!(context.check("")?, CheckOutcome::Prompt);
//! assert_eq!(context.check("FREE prize!")?.label(), Some(Label::Scam));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::analysis::analyzer::normalizer::TextNormalizer;
use crate::artifact::load_artifact;
use crate::config::CheckerConfig;
use crate::error::{Result, ScamCheckError};
use crate::gate::{EMPTY_INPUT_PROMPT, GateState};
use crate::ml::classifier::{Classifier, ClassifierModel};
use crate::ml::label::Label;
use crate::ml::pipeline::ClassifierPipeline;
use crate::ml::vectorizer::TfIdfVectorizer;

/// What the user sees after one submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The submission was empty; no classification took place.
    Prompt,
    /// The submission was normalized and classified.
    Classified { normalized: String, label: Label },
}

impl CheckOutcome {
    pub fn label(&self) -> Option<Label> {
        match self {
            CheckOutcome::Prompt => None,
            CheckOutcome::Classified { label, .. } => Some(*label),
        }
    }

    pub fn normalized(&self) -> Option<&str> {
        match self {
            CheckOutcome::Prompt => None,
            CheckOutcome::Classified { normalized, .. } => Some(normalized),
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Prompt => f.write_str(EMPTY_INPUT_PROMPT),
            CheckOutcome::Classified { label, .. } => write!(f, "Result: {label}"),
        }
    }
}

impl Serialize for CheckOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CheckOutcome::Prompt => {
                let mut state = serializer.serialize_struct("CheckOutcome", 2)?;
                state.serialize_field("status", "prompt")?;
                state.serialize_field("message", EMPTY_INPUT_PROMPT)?;
                state.end()
            }
            CheckOutcome::Classified { normalized, label } => {
                let mut state = serializer.serialize_struct("CheckOutcome", 5)?;
                state.serialize_field("status", "classified")?;
                state.serialize_field("normalized", normalized)?;
                state.serialize_field("label", label)?;
                state.serialize_field("is_scam", &label.is_scam())?;
                state.serialize_field("message", &self.to_string())?;
                state.end()
            }
        }
    }
}

/// Normalizer and classifier pipeline, loaded once.
#[derive(Clone, Debug)]
pub struct CheckerContext {
    normalizer: TextNormalizer,
    pipeline: ClassifierPipeline,
}

impl CheckerContext {
    pub fn new(normalizer: TextNormalizer, pipeline: ClassifierPipeline) -> Self {
        CheckerContext {
            normalizer,
            pipeline,
        }
    }

    /// Load the stop words and both artifacts named by `config`.
    ///
    /// Any missing, corrupt or mismatched file is an error; nothing is
    /// retried.
    pub fn load(config: &CheckerConfig) -> Result<Self> {
        let normalizer = match &config.stopwords_path {
            Some(path) => TextNormalizer::from_stopword_file(path)?,
            None => TextNormalizer::new(),
        };

        let vectorizer = load_artifact::<TfIdfVectorizer, _>(&config.vectorizer_path)?.payload;
        if !vectorizer.is_fitted() {
            return Err(ScamCheckError::artifact(format!(
                "Vectorizer in {} has an empty vocabulary",
                config.vectorizer_path.display()
            )));
        }

        let classifier = load_artifact::<ClassifierModel, _>(&config.model_path)?.payload;
        classifier.validate()?;

        info!(
            "Loaded {} classifier over {} features",
            classifier.name(),
            vectorizer.vocabulary_size()
        );

        let pipeline = ClassifierPipeline::new(Arc::new(vectorizer), Arc::new(classifier))?;
        Ok(Self::new(normalizer, pipeline))
    }

    /// Gate, normalize and classify one submission.
    pub fn check(&self, raw: &str) -> Result<CheckOutcome> {
        if !GateState::evaluate(raw).is_ready() {
            debug!("Empty submission; prompting for input");
            return Ok(CheckOutcome::Prompt);
        }

        let normalized = self.normalizer.normalize(raw)?;
        let label = self.pipeline.classify(&normalized)?;
        Ok(CheckOutcome::Classified { normalized, label })
    }

    /// Check many submissions, preserving their order.
    ///
    /// Normalization runs in parallel and every non-empty submission is
    /// classified in a single batch.
    pub fn check_batch<S: AsRef<str> + Sync>(&self, raw: &[S]) -> Result<Vec<CheckOutcome>> {
        let normalized = raw
            .par_iter()
            .map(|text| {
                let text = text.as_ref();
                if GateState::evaluate(text).is_ready() {
                    self.normalizer.normalize(text).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect::<Result<Vec<Option<String>>>>()?;

        let ready: Vec<&str> = normalized.iter().flatten().map(String::as_str).collect();
        let mut labels = self.pipeline.classify_batch(&ready)?.into_iter();

        let mut outcomes = Vec::with_capacity(normalized.len());
        for entry in normalized {
            let outcome = match entry {
                Some(normalized) => {
                    let label = labels.next().ok_or_else(|| {
                        ScamCheckError::model("Classifier returned too few predictions")
                    })?;
                    CheckOutcome::Classified { normalized, label }
                }
                None => CheckOutcome::Prompt,
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn pipeline(&self) -> &ClassifierPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::LinearModel;
    use crate::ml::vectorizer::TfIdfParams;

    fn context() -> CheckerContext {
        let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
        vectorizer.fit(&["free prize", "lunch today"]).unwrap();
        // Vocabulary: free, lunch, prize, today
        let classifier = LinearModel::new(vec![0, 1], vec![1.0, -1.0, 1.0, -1.0], 0.0).unwrap();
        let pipeline =
            ClassifierPipeline::new(Arc::new(vectorizer), Arc::new(classifier)).unwrap();
        CheckerContext::new(TextNormalizer::new(), pipeline)
    }

    #[test]
    fn test_check() {
        let context = context();

        assert_eq!(context.check("").unwrap(), CheckOutcome::Prompt);

        let outcome = context.check("A FREE prize!").unwrap();
        assert_eq!(outcome.normalized(), Some("free prize"));
        assert_eq!(outcome.label(), Some(Label::Scam));
        assert_eq!(outcome.to_string(), "Result: Scam");

        let outcome = context.check("Lunch today?").unwrap();
        assert_eq!(outcome.to_string(), "Result: Likely Not a Scam");

        // Whitespace passes the gate and becomes an empty document
        let outcome = context.check("   ").unwrap();
        assert_eq!(outcome.normalized(), Some(""));
        assert_eq!(outcome.label(), Some(Label::LikelyNotScam));
    }

    #[test]
    fn test_check_batch_preserves_order() {
        let context = context();
        let outcomes = context
            .check_batch(&["free prize", "", "lunch today", "prize!!"])
            .unwrap();

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].label(), Some(Label::Scam));
        assert_eq!(outcomes[1], CheckOutcome::Prompt);
        assert_eq!(outcomes[2].label(), Some(Label::LikelyNotScam));
        assert_eq!(outcomes[3].label(), Some(Label::Scam));

        for (outcome, raw) in outcomes.iter().zip(["free prize", "", "lunch today", "prize!!"]) {
            assert_eq!(outcome, &context.check(raw).unwrap());
        }
    }

    #[test]
    fn test_outcome_json() {
        let prompt = serde_json::to_value(CheckOutcome::Prompt).unwrap();
        assert_eq!(prompt["status"], "prompt");
        assert_eq!(prompt["message"], "Please enter an SMS!");

        let classified = serde_json::to_value(CheckOutcome::Classified {
            normalized: "free prize".to_string(),
            label: Label::Scam,
        })
        .unwrap();
        assert_eq!(classified["status"], "classified");
        assert_eq!(classified["label"], "spam");
        assert_eq!(classified["is_scam"], true);
        assert_eq!(classified["message"], "Result: Scam");
    }
}
