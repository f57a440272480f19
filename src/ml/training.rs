//! Training and evaluation of the spam classifier.
//!
//! Training texts go through the same [`TextNormalizer`] used at inference
//! time before the TF-IDF vectorizer and the naive Bayes model are fitted.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::normalizer::TextNormalizer;
use crate::error::{Result, ScamCheckError};
use crate::ml::classifier::{ClassifierModel, MultinomialNb};
use crate::ml::label::Label;
use crate::ml::pipeline::ClassifierPipeline;
use crate::ml::vectorizer::{TfIdfParams, TfIdfVectorizer};

/// One labeled message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Raw message text.
    pub text: String,
    /// Expected label (`"spam"` or `"ham"`).
    pub label: Label,
}

impl TrainingSample {
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        TrainingSample {
            text: text.into(),
            label,
        }
    }
}

/// Load training samples from a JSON array or a JSON Lines file.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingSample>> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_training_data(&content)
}

/// Parse training samples from JSON array or JSON Lines text.
pub fn parse_training_data(content: &str) -> Result<Vec<TrainingSample>> {
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(content)?);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_num, line)| {
            serde_json::from_str(line).map_err(|e| {
                ScamCheckError::training(format!("Invalid sample on line {}: {e}", line_num + 1))
            })
        })
        .collect()
}

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Vectorizer settings.
    pub tfidf: TfIdfParams,
    /// Naive Bayes smoothing.
    pub alpha: f64,
    /// Fraction of samples held out for evaluation, in `[0, 1)`.
    pub test_ratio: f64,
    /// Seed for the hold-out shuffle.
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        TrainingParams {
            tfidf: TfIdfParams::default(),
            alpha: 1.0,
            test_ratio: 0.0,
            seed: 42,
        }
    }
}

/// Confusion counts with spam as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl EvaluationReport {
    /// Record one prediction against its expected label.
    pub fn record(&mut self, expected: Label, predicted: Label) {
        match (expected.is_scam(), predicted.is_scam()) {
            (true, true) => self.true_positives += 1,
            (false, true) => self.false_positives += 1,
            (false, false) => self.true_negatives += 1,
            (true, false) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// Harmonic mean of precision and recall; zero when both are zero.
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Output of [`train`].
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub vectorizer: TfIdfVectorizer,
    pub classifier: ClassifierModel,
    /// Number of samples the model was fitted on.
    pub train_size: usize,
    /// Metrics on the held-out split, when one was requested.
    pub evaluation: Option<EvaluationReport>,
}

impl TrainedModel {
    /// Assemble an inference pipeline from the fitted parts.
    pub fn pipeline(&self) -> Result<ClassifierPipeline> {
        ClassifierPipeline::new(
            Arc::new(self.vectorizer.clone()),
            Arc::new(self.classifier.clone()),
        )
    }
}

/// Fit a vectorizer and a naive Bayes classifier on labeled samples.
pub fn train(
    samples: &[TrainingSample],
    normalizer: &TextNormalizer,
    params: &TrainingParams,
) -> Result<TrainedModel> {
    if samples.is_empty() {
        return Err(ScamCheckError::training("Training samples cannot be empty"));
    }
    if !(0.0..1.0).contains(&params.test_ratio) {
        return Err(ScamCheckError::invalid_argument(format!(
            "Test ratio must be in [0, 1), got {}",
            params.test_ratio
        )));
    }

    let mut order: Vec<usize> = (0..samples.len()).collect();
    let test_len = (samples.len() as f64 * params.test_ratio).round() as usize;
    if test_len > 0 {
        let mut rng = StdRng::seed_from_u64(params.seed);
        order.shuffle(&mut rng);
    }
    if test_len >= samples.len() {
        return Err(ScamCheckError::training(
            "Test split leaves no samples for training",
        ));
    }
    let (test_indices, train_indices) = order.split_at(test_len);

    let mut documents = Vec::with_capacity(train_indices.len());
    let mut labels = Vec::with_capacity(train_indices.len());
    for &index in train_indices {
        documents.push(normalizer.normalize(&samples[index].text)?);
        labels.push(samples[index].label.code());
    }

    let mut vectorizer = TfIdfVectorizer::new(params.tfidf.clone())?;
    let features = vectorizer.fit_transform(&documents)?;
    let classifier: ClassifierModel = MultinomialNb::fit(&features, &labels, params.alpha)?.into();

    let mut model = TrainedModel {
        vectorizer,
        classifier,
        train_size: train_indices.len(),
        evaluation: None,
    };

    if !test_indices.is_empty() {
        let held_out: Vec<TrainingSample> = test_indices
            .iter()
            .map(|&index| samples[index].clone())
            .collect();
        let report = evaluate(&model.pipeline()?, normalizer, &held_out)?;
        info!(
            "Held-out accuracy {:.3} on {} samples",
            report.accuracy(),
            report.total()
        );
        model.evaluation = Some(report);
    }

    Ok(model)
}

/// Score a pipeline against labeled samples.
pub fn evaluate(
    pipeline: &ClassifierPipeline,
    normalizer: &TextNormalizer,
    samples: &[TrainingSample],
) -> Result<EvaluationReport> {
    let normalized = samples
        .iter()
        .map(|sample| normalizer.normalize(&sample.text))
        .collect::<Result<Vec<String>>>()?;
    let refs: Vec<&str> = normalized.iter().map(String::as_str).collect();
    let predictions = pipeline.classify_batch(&refs)?;

    let mut report = EvaluationReport::default();
    for (sample, predicted) in samples.iter().zip(predictions) {
        report.record(sample.label, predicted);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<TrainingSample> {
        vec![
            TrainingSample::new("WINNER!! You have won a free prize, call now", Label::Scam),
            TrainingSample::new("Claim your cash prize today, txt WIN", Label::Scam),
            TrainingSample::new("Free entry to win a holiday! Call 0800", Label::Scam),
            TrainingSample::new("URGENT your account won a cash reward", Label::Scam),
            TrainingSample::new("Are we still meeting for lunch?", Label::LikelyNotScam),
            TrainingSample::new("Hey, see you at home tonight", Label::LikelyNotScam),
            TrainingSample::new("Can you pick up milk on the way", Label::LikelyNotScam),
            TrainingSample::new("Lunch tomorrow? Meeting ran late", Label::LikelyNotScam),
        ]
    }

    #[test]
    fn test_train_and_predict() {
        let normalizer = TextNormalizer::new();
        let model = train(&corpus(), &normalizer, &TrainingParams::default()).unwrap();
        assert_eq!(model.train_size, 8);
        assert!(model.evaluation.is_none());

        let pipeline = model.pipeline().unwrap();
        let spam = normalizer.normalize("Win a free cash prize").unwrap();
        let ham = normalizer.normalize("lunch meeting tonight?").unwrap();
        assert_eq!(pipeline.classify(&spam).unwrap(), Label::Scam);
        assert_eq!(pipeline.classify(&ham).unwrap(), Label::LikelyNotScam);

        let report = evaluate(&pipeline, &normalizer, &corpus()).unwrap();
        assert_eq!(report.total(), 8);
        assert_eq!(report.accuracy(), 1.0);
    }

    #[test]
    fn test_train_with_holdout_is_deterministic() {
        let normalizer = TextNormalizer::new();
        let mut samples = corpus();
        samples.extend(corpus());
        let params = TrainingParams {
            test_ratio: 0.25,
            seed: 7,
            ..TrainingParams::default()
        };

        let first = train(&samples, &normalizer, &params).unwrap();
        let second = train(&samples, &normalizer, &params).unwrap();
        assert_eq!(first.train_size, 12);
        assert_eq!(first.evaluation.unwrap().total(), 4);
        assert_eq!(first.evaluation, second.evaluation);
        assert_eq!(first.classifier, second.classifier);
    }

    #[test]
    fn test_train_errors() {
        let normalizer = TextNormalizer::new();
        let params = TrainingParams::default();

        assert!(train(&[], &normalizer, &params).is_err());

        let one_class = vec![TrainingSample::new("free prize", Label::Scam)];
        assert!(train(&one_class, &normalizer, &params).is_err());

        let bad_ratio = TrainingParams {
            test_ratio: 1.0,
            ..TrainingParams::default()
        };
        assert!(matches!(
            train(&corpus(), &normalizer, &bad_ratio),
            Err(ScamCheckError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_report_metrics() {
        let mut report = EvaluationReport::default();
        report.record(Label::Scam, Label::Scam);
        report.record(Label::Scam, Label::LikelyNotScam);
        report.record(Label::LikelyNotScam, Label::Scam);
        report.record(Label::LikelyNotScam, Label::LikelyNotScam);

        assert_eq!(report.total(), 4);
        assert_eq!(report.accuracy(), 0.5);
        assert_eq!(report.precision(), 0.5);
        assert_eq!(report.recall(), 0.5);
        assert_eq!(report.f1(), 0.5);
        assert_eq!(EvaluationReport::default().f1(), 0.0);
    }

    #[test]
    fn test_parse_training_data() {
        let array = r#"[{"text": "free prize", "label": "spam"}, {"text": "hi", "label": "ham"}]"#;
        let samples = parse_training_data(array).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, Label::Scam);

        let lines = "{\"text\": \"free prize\", \"label\": \"spam\"}\n\n{\"text\": \"hi\", \"label\": \"ham\"}\n";
        assert_eq!(parse_training_data(lines).unwrap(), samples);

        let broken = "{\"text\": \"ok\", \"label\": \"ham\"}\n{\"text\": \"x\", \"label\": \"maybe\"}";
        let error = parse_training_data(broken).unwrap_err();
        assert!(error.to_string().contains("line 2"));
    }
}
