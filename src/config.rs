//! Startup configuration: where the artifacts and stop words live.

use std::env;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// File name of the classifier artifact next to the executable.
pub const DEFAULT_MODEL_FILE: &str = "spam_model.json";

/// File name of the vectorizer artifact next to the executable.
pub const DEFAULT_VECTORIZER_FILE: &str = "tfidf_vectorizer.json";

/// Paths read once when a [`CheckerContext`](crate::context::CheckerContext)
/// is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Classifier artifact.
    pub model_path: PathBuf,
    /// Vectorizer artifact.
    pub vectorizer_path: PathBuf,
    /// Stop word file, one word per line. The built-in English list is used
    /// when unset.
    pub stopwords_path: Option<PathBuf>,
}

impl CheckerConfig {
    /// Configuration with both artifacts under `dir` using the default names.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        CheckerConfig {
            model_path: dir.join(DEFAULT_MODEL_FILE),
            vectorizer_path: dir.join(DEFAULT_VECTORIZER_FILE),
            stopwords_path: None,
        }
    }

    /// Configuration with artifacts next to the running executable.
    ///
    /// Falls back to the current directory when the executable path cannot
    /// be determined.
    pub fn relative_to_executable() -> Self {
        let dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        match dir {
            Some(dir) => Self::in_dir(dir),
            None => {
                warn!("Cannot determine executable directory; looking for artifacts in .");
                Self::in_dir(".")
            }
        }
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_vectorizer_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.vectorizer_path = path.into();
        self
    }

    pub fn with_stopwords_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stopwords_path = Some(path.into());
        self
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self::relative_to_executable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir() {
        let config = CheckerConfig::in_dir("/opt/scamcheck");
        assert_eq!(
            config.model_path,
            PathBuf::from("/opt/scamcheck/spam_model.json")
        );
        assert_eq!(
            config.vectorizer_path,
            PathBuf::from("/opt/scamcheck/tfidf_vectorizer.json")
        );
        assert!(config.stopwords_path.is_none());
    }

    #[test]
    fn test_builders() {
        let config = CheckerConfig::in_dir(".")
            .with_model_path("model.bin")
            .with_vectorizer_path("vec.bin")
            .with_stopwords_path("stopwords/english");

        assert_eq!(config.model_path, PathBuf::from("model.bin"));
        assert_eq!(config.vectorizer_path, PathBuf::from("vec.bin"));
        assert_eq!(
            config.stopwords_path,
            Some(PathBuf::from("stopwords/english"))
        );
    }

    #[test]
    fn test_default_is_next_to_executable() {
        let config = CheckerConfig::default();
        assert!(config.model_path.ends_with(DEFAULT_MODEL_FILE));
        assert!(config.vectorizer_path.ends_with(DEFAULT_VECTORIZER_FILE));
    }
}
