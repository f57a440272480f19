//! TF-IDF vectorizer for text feature extraction.
//!
//! Weighting:
//!
//! - tokens are runs of two or more word characters
//! - `idf = ln((1 + n) / (1 + df)) + 1` with smoothing, `ln(n / df) + 1` without
//! - raw counts, or `1 + ln(tf)` when sublinear tf is enabled
//! - rows are L2-normalized by default
//! - vocabulary indices follow sorted term order

use std::collections::{BTreeMap, HashSet};
use std::fmt::{Debug, Formatter};

use ahash::AHashMap;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::regex::{DEFAULT_TOKEN_PATTERN, RegexTokenizer};
use crate::error::{Result, ScamCheckError};
use crate::ml::vector::SparseVector;

/// Text-to-vector transformer contract.
pub trait Vectorizer: Send + Sync {
    /// Transform a batch of documents into feature vectors, one per document.
    fn transform(&self, batch: &[&str]) -> Result<Vec<SparseVector>>;

    /// Dimension of the produced vectors (the vocabulary size).
    fn dimension(&self) -> usize;

    /// Get the name of this vectorizer for debugging and logging.
    fn name(&self) -> &'static str;
}

/// Row normalization applied after tf-idf weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    /// Divide by the sum of absolute values.
    L1,
    /// Divide by the Euclidean norm.
    #[default]
    L2,
    /// Leave rows unnormalized.
    None,
}

/// Hyperparameters of the TF-IDF vectorizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfIdfParams {
    /// Regex that extracts terms from a document.
    pub token_pattern: String,
    /// Replace tf with `1 + ln(tf)`.
    pub sublinear_tf: bool,
    /// Add one to document frequencies, as if an extra document held every term.
    pub smooth_idf: bool,
    /// Row normalization.
    pub norm: Norm,
    /// Ignore terms that appear in fewer documents than this.
    pub min_df: usize,
}

impl Default for TfIdfParams {
    fn default() -> Self {
        TfIdfParams {
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            sublinear_tf: false,
            smooth_idf: true,
            norm: Norm::L2,
            min_df: 1,
        }
    }
}

/// TF-IDF vectorizer for text feature extraction.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "TfIdfState", into = "TfIdfState")]
pub struct TfIdfVectorizer {
    params: TfIdfParams,
    /// Vocabulary: term -> feature index.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
    /// Number of documents seen during fitting.
    n_documents: usize,
    tokenizer: RegexTokenizer,
}

/// Serialized form of [`TfIdfVectorizer`].
#[derive(Serialize, Deserialize)]
struct TfIdfState {
    params: TfIdfParams,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("params", &self.params)
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(params: TfIdfParams) -> Result<Self> {
        let tokenizer = RegexTokenizer::with_pattern(&params.token_pattern)?;
        Ok(TfIdfVectorizer {
            params,
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            tokenizer,
        })
    }

    /// Fit the vocabulary and idf weights on training documents.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(ScamCheckError::training(
                "Cannot fit a vectorizer on zero documents",
            ));
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique_terms: HashSet<&str> = self.tokenizer.terms(doc.as_ref()).collect();
            for term in unique_terms {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        let min_df = self.params.min_df.max(1);
        let kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= min_df)
            .collect();

        if kept.is_empty() {
            return Err(ScamCheckError::training(
                "Empty vocabulary; the documents may only contain stop words",
            ));
        }

        let n = documents.len() as f64;
        let smooth = if self.params.smooth_idf { 1.0 } else { 0.0 };

        let mut vocabulary = AHashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((n + smooth) / (df as f64 + smooth)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        info!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            vocabulary.len(),
            documents.len()
        );

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = documents.len();
        Ok(())
    }

    /// Fit on the documents and return their feature vectors.
    pub fn fit_transform<S: AsRef<str> + Sync>(
        &mut self,
        documents: &[S],
    ) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        let fitted = &*self;
        Ok(documents
            .par_iter()
            .map(|doc| fitted.transform_one(doc.as_ref()))
            .collect())
    }

    /// Transform a single document into a TF-IDF feature vector.
    ///
    /// Terms outside the vocabulary are ignored; a document without known
    /// terms yields the zero vector.
    pub fn transform_one(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.tokenizer.terms(document) {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.params.sublinear_tf {
                    1.0 + tf.ln()
                } else {
                    tf
                };
                (index, tf * self.idf[index])
            })
            .collect();

        // Indices come from the vocabulary, so they are always in bounds.
        let mut vector = SparseVector::from_entries(self.idf.len(), entries)
            .unwrap_or_else(|_| SparseVector::zeros(self.idf.len()));

        let norm = match self.params.norm {
            Norm::L1 => vector.l1_norm(),
            Norm::L2 => vector.l2_norm(),
            Norm::None => 1.0,
        };
        if norm > 0.0 && norm != 1.0 {
            vector.scale(1.0 / norm);
        }

        vector
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Idf weight of a term, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.feature_index(term).map(|index| self.idf[index])
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Hyperparameters of this vectorizer.
    pub fn params(&self) -> &TfIdfParams {
        &self.params
    }

    /// Whether [`fit`](Self::fit) has been run (or a fitted state loaded).
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn transform(&self, batch: &[&str]) -> Result<Vec<SparseVector>> {
        if !self.is_fitted() {
            return Err(ScamCheckError::model("TF-IDF vectorizer is not fitted"));
        }
        Ok(batch.par_iter().map(|doc| self.transform_one(doc)).collect())
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

impl TryFrom<TfIdfState> for TfIdfVectorizer {
    type Error = ScamCheckError;

    fn try_from(state: TfIdfState) -> Result<Self> {
        if state.vocabulary.len() != state.idf.len() {
            return Err(ScamCheckError::artifact(format!(
                "Vocabulary has {} terms but idf has {} weights",
                state.vocabulary.len(),
                state.idf.len()
            )));
        }

        let mut seen = vec![false; state.idf.len()];
        for (term, &index) in &state.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(ScamCheckError::artifact(format!(
                        "Invalid or duplicate feature index {index} for term '{term}'"
                    )));
                }
            }
        }

        let mut vectorizer = TfIdfVectorizer::new(state.params)?;
        vectorizer.vocabulary = state.vocabulary.into_iter().collect();
        vectorizer.idf = state.idf;
        vectorizer.n_documents = state.n_documents;
        Ok(vectorizer)
    }
}

impl From<TfIdfVectorizer> for TfIdfState {
    fn from(vectorizer: TfIdfVectorizer) -> Self {
        TfIdfState {
            params: vectorizer.params,
            vocabulary: vectorizer.vocabulary.into_iter().collect(),
            idf: vectorizer.idf,
            n_documents: vectorizer.n_documents,
        }
    }
}
