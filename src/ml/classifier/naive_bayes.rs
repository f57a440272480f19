//! Multinomial naive Bayes.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{Result, ScamCheckError};
use crate::ml::vector::SparseVector;

/// Multinomial naive Bayes over non-negative (tf-idf or count) features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Additive smoothing parameter.
    alpha: f64,
    /// Class codes in ascending order.
    classes: Vec<i64>,
    /// `ln P(class)` per class.
    class_log_prior: Vec<f64>,
    /// `ln P(feature | class)`, one row per class.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Fit the model on feature vectors and their class codes.
    ///
    /// At least two distinct classes are required.
    pub fn fit(features: &[SparseVector], labels: &[i64], alpha: f64) -> Result<Self> {
        if features.is_empty() {
            return Err(ScamCheckError::training("No training vectors"));
        }
        if features.len() != labels.len() {
            return Err(ScamCheckError::training(format!(
                "Got {} vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ScamCheckError::training(format!(
                "Smoothing alpha must be positive, got {alpha}"
            )));
        }

        let n_features = features[0].dimension();
        if features.iter().any(|v| v.dimension() != n_features) {
            return Err(ScamCheckError::training(
                "Training vectors have inconsistent dimensions",
            ));
        }

        let mut class_counts: BTreeMap<i64, usize> = BTreeMap::new();
        for &label in labels {
            *class_counts.entry(label).or_insert(0) += 1;
        }
        if class_counts.len() < 2 {
            return Err(ScamCheckError::training(
                "Training data must contain at least two classes",
            ));
        }

        let classes: Vec<i64> = class_counts.keys().copied().collect();
        let class_index: BTreeMap<i64, usize> = classes
            .iter()
            .enumerate()
            .map(|(index, &class)| (class, index))
            .collect();

        let mut feature_counts = vec![vec![0.0; n_features]; classes.len()];
        for (vector, label) in features.iter().zip(labels) {
            let row = &mut feature_counts[class_index[label]];
            for (index, value) in vector.iter() {
                if value < 0.0 {
                    return Err(ScamCheckError::training(
                        "Multinomial naive Bayes requires non-negative features",
                    ));
                }
                row[index] += value;
            }
        }

        let n_samples = labels.len() as f64;
        let class_log_prior: Vec<f64> = class_counts
            .values()
            .map(|&count| (count as f64).ln() - n_samples.ln())
            .collect();

        let feature_log_prob: Vec<Vec<f64>> = feature_counts
            .into_iter()
            .map(|row| {
                let total: f64 = row.iter().sum::<f64>() + alpha * n_features as f64;
                let log_total = total.ln();
                row.into_iter()
                    .map(|count| (count + alpha).ln() - log_total)
                    .collect::<Vec<f64>>()
            })
            .collect();

        info!(
            "Fitted multinomial naive Bayes on {} samples, {} features, classes {:?}",
            labels.len(),
            n_features,
            classes
        );

        Ok(MultinomialNb {
            alpha,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Check that the parameter shapes agree with each other.
    pub fn validate(&self) -> Result<()> {
        if self.classes.len() < 2 {
            return Err(ScamCheckError::model(
                "Naive Bayes model needs at least two classes",
            ));
        }
        if self.class_log_prior.len() != self.classes.len()
            || self.feature_log_prob.len() != self.classes.len()
        {
            return Err(ScamCheckError::model(
                "Naive Bayes parameters do not match the number of classes",
            ));
        }
        let n_features = self.n_features();
        if self
            .feature_log_prob
            .iter()
            .any(|row| row.len() != n_features)
        {
            return Err(ScamCheckError::model(
                "Naive Bayes feature rows have inconsistent lengths",
            ));
        }
        Ok(())
    }

    /// Smoothing parameter the model was fitted with.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Joint log likelihood `ln P(class) + Σ x_j ln P(j | class)` per class.
    pub fn joint_log_likelihood(&self, vector: &SparseVector) -> Result<Vec<f64>> {
        if vector.dimension() != self.n_features() {
            return Err(ScamCheckError::model(format!(
                "Expected {} features, got {}",
                self.n_features(),
                vector.dimension()
            )));
        }

        Ok(self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| prior + vector.dot(log_prob))
            .collect())
    }
}

impl Classifier for MultinomialNb {
    fn predict(&self, batch: &[SparseVector]) -> Result<Vec<i64>> {
        batch
            .iter()
            .map(|vector| {
                let jll = self.joint_log_likelihood(vector)?;
                // First maximum wins ties
                let best = jll
                    .iter()
                    .enumerate()
                    .fold(0, |best, (index, score)| {
                        if *score > jll[best] { index } else { best }
                    });
                Ok(self.classes[best])
            })
            .collect()
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn name(&self) -> &'static str {
        "multinomial_nb"
    }
}
