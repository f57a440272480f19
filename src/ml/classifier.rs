//! Classifier trait and the serializable model types behind it.
//!
//! - [`naive_bayes::MultinomialNb`]: multinomial naive Bayes, trainable here
//! - [`linear::LinearModel`]: binary linear decision function, for exported
//!   logistic regression or linear SVM weights
//! - [`ClassifierModel`]: the enum stored in classifier artifacts

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::vector::SparseVector;

pub mod linear;
pub mod naive_bayes;

pub use linear::LinearModel;
pub use naive_bayes::MultinomialNb;

/// Binary classifier contract.
///
/// Implementations return the raw class code for each input vector; decoding
/// into a [`Label`](crate::ml::label::Label) happens at the pipeline boundary.
pub trait Classifier: Send + Sync {
    /// Predict a class code for every feature vector of the batch.
    fn predict(&self, batch: &[SparseVector]) -> Result<Vec<i64>>;

    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    /// Class codes the model can emit.
    fn classes(&self) -> &[i64];

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &'static str;
}

/// A classifier stored in an artifact file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierModel {
    MultinomialNb(MultinomialNb),
    Linear(LinearModel),
}

impl ClassifierModel {
    /// Check internal shape consistency of deserialized parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            ClassifierModel::MultinomialNb(model) => model.validate(),
            ClassifierModel::Linear(model) => model.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::MultinomialNb(model) => model,
            ClassifierModel::Linear(model) => model,
        }
    }
}

impl From<MultinomialNb> for ClassifierModel {
    fn from(model: MultinomialNb) -> Self {
        ClassifierModel::MultinomialNb(model)
    }
}

impl From<LinearModel> for ClassifierModel {
    fn from(model: LinearModel) -> Self {
        ClassifierModel::Linear(model)
    }
}

impl Classifier for ClassifierModel {
    fn predict(&self, batch: &[SparseVector]) -> Result<Vec<i64>> {
        self.inner().predict(batch)
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner().classes()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_serde_tag() {
        let model: ClassifierModel = LinearModel::new(vec![0, 1], vec![1.0, -1.0], 0.0)
            .unwrap()
            .into();

        let json = serde_json::to_value(&model).unwrap();
        assert!(json.get("linear").is_some());

        let restored: ClassifierModel = serde_json::from_value(json).unwrap();
        assert_eq!(restored, model);
        assert_eq!(restored.name(), "linear");
        assert_eq!(restored.n_features(), 2);
        assert_eq!(restored.classes(), &[0, 1]);
    }
}
