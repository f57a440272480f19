//! Binary linear classifier.

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::error::{Result, ScamCheckError};
use crate::ml::vector::SparseVector;

/// Binary linear model: predicts `classes[1]` when `w·x + b > 0`.
///
/// Covers the weights exported from logistic regression and linear SVMs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    classes: Vec<i64>,
    coef: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Create a model from its exported parameters.
    pub fn new(classes: Vec<i64>, coef: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = LinearModel {
            classes,
            coef,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check that the parameters describe a binary model.
    pub fn validate(&self) -> Result<()> {
        if self.classes.len() != 2 {
            return Err(ScamCheckError::model(format!(
                "Linear model must have exactly two classes, got {}",
                self.classes.len()
            )));
        }
        if self.coef.is_empty() {
            return Err(ScamCheckError::model("Linear model has no coefficients"));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err(ScamCheckError::model(
                "Linear model parameters must be finite",
            ));
        }
        Ok(())
    }

    /// Signed distance `w·x + b`.
    pub fn decision_function(&self, vector: &SparseVector) -> Result<f64> {
        if vector.dimension() != self.coef.len() {
            return Err(ScamCheckError::model(format!(
                "Expected {} features, got {}",
                self.coef.len(),
                vector.dimension()
            )));
        }
        Ok(vector.dot(&self.coef) + self.intercept)
    }
}

impl Classifier for LinearModel {
    fn predict(&self, batch: &[SparseVector]) -> Result<Vec<i64>> {
        batch
            .iter()
            .map(|vector| {
                let score = self.decision_function(vector)?;
                Ok(if score > 0.0 {
                    self.classes[1]
                } else {
                    self.classes[0]
                })
            })
            .collect()
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
