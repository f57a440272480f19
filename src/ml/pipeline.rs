//! Classifier pipeline: normalized text → feature vector → label.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::debug;

use crate::error::{Result, ScamCheckError};
use crate::ml::classifier::Classifier;
use crate::ml::label::Label;
use crate::ml::vectorizer::Vectorizer;

/// Composes a fitted vectorizer with a fitted classifier.
///
/// Both halves are immutable after construction, so one pipeline can be shared
/// across threads without locking.
#[derive(Clone)]
pub struct ClassifierPipeline {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn Classifier>,
}

impl ClassifierPipeline {
    /// Create a pipeline, rejecting a classifier whose feature count differs
    /// from the vectorizer's dimension.
    pub fn new(vectorizer: Arc<dyn Vectorizer>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(ScamCheckError::artifact(format!(
                "Incompatible artifacts: {} vectorizer produces {} features but {} classifier expects {}",
                vectorizer.name(),
                vectorizer.dimension(),
                classifier.name(),
                classifier.n_features()
            )));
        }

        Ok(ClassifierPipeline {
            vectorizer,
            classifier,
        })
    }

    /// Classify one normalized message.
    pub fn classify(&self, normalized: &str) -> Result<Label> {
        let features = self.vectorizer.transform(&[normalized])?;
        let predictions = self.classifier.predict(&features)?;
        let code = predictions
            .first()
            .copied()
            .ok_or_else(|| ScamCheckError::model("Classifier returned no prediction"))?;

        let label = Label::from_prediction(code);
        debug!(
            "Classified message with {} active features as {label} (code {code})",
            features[0].nnz()
        );
        Ok(label)
    }

    /// Classify a batch of normalized messages, preserving order.
    pub fn classify_batch(&self, normalized: &[&str]) -> Result<Vec<Label>> {
        let features = self.vectorizer.transform(normalized)?;
        let predictions = self.classifier.predict(&features)?;
        if predictions.len() != normalized.len() {
            return Err(ScamCheckError::model(format!(
                "Classifier returned {} predictions for {} messages",
                predictions.len(),
                normalized.len()
            )));
        }
        Ok(predictions.into_iter().map(Label::from_prediction).collect())
    }

    /// The vectorizer half of the pipeline.
    pub fn vectorizer(&self) -> &Arc<dyn Vectorizer> {
        &self.vectorizer
    }

    /// The classifier half of the pipeline.
    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }
}

impl Debug for ClassifierPipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierPipeline")
            .field("vectorizer", &self.vectorizer.name())
            .field("dimension", &self.vectorizer.dimension())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::LinearModel;
    use crate::ml::vectorizer::{TfIdfParams, TfIdfVectorizer};

    fn fitted_vectorizer() -> TfIdfVectorizer {
        let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
        vectorizer.fit(&["free prize", "lunch today"]).unwrap();
        vectorizer
    }

    #[test]
    fn test_classify() {
        let vectorizer = fitted_vectorizer();
        // Vocabulary: free, lunch, prize, today
        let classifier = LinearModel::new(vec![0, 1], vec![1.0, -1.0, 1.0, -1.0], 0.0).unwrap();
        let pipeline =
            ClassifierPipeline::new(Arc::new(vectorizer), Arc::new(classifier)).unwrap();

        assert_eq!(pipeline.classify("free prize").unwrap(), Label::Scam);
        assert_eq!(pipeline.classify("lunch today").unwrap(), Label::LikelyNotScam);
        assert_eq!(pipeline.classify("").unwrap(), Label::LikelyNotScam);

        let labels = pipeline
            .classify_batch(&["prize", "today", "free lunch prize"])
            .unwrap();
        assert_eq!(labels, vec![Label::Scam, Label::LikelyNotScam, Label::Scam]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let classifier = LinearModel::new(vec![0, 1], vec![1.0, -1.0], 0.0).unwrap();
        let result = ClassifierPipeline::new(Arc::new(fitted_vectorizer()), Arc::new(classifier));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_standard_codes_are_not_spam() {
        let classifier = LinearModel::new(vec![-1, 7], vec![1.0; 4], 0.0).unwrap();
        let pipeline =
            ClassifierPipeline::new(Arc::new(fitted_vectorizer()), Arc::new(classifier)).unwrap();

        assert_eq!(pipeline.classify("free").unwrap(), Label::LikelyNotScam);
        assert_eq!(pipeline.classify("").unwrap(), Label::LikelyNotScam);
    }
}
