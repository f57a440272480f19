//! Artifact files holding the fitted vectorizer and classifier.
//!
//! Every artifact is wrapped in an [`ArtifactEnvelope`] that records what it
//! contains, so a vectorizer file passed where a model is expected is rejected
//! before its payload is decoded. The encoding follows the file extension:
//! `.json` uses serde_json, `.bin` uses bincode.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScamCheckError};
use crate::ml::classifier::ClassifierModel;
use crate::ml::vectorizer::TfIdfVectorizer;

/// Version of the envelope layout written by this crate.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// What an artifact file contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Vectorizer,
    Classifier,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Vectorizer => f.write_str("vectorizer"),
            ArtifactKind::Classifier => f.write_str("classifier"),
        }
    }
}

/// On-disk encoding of an artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactEncoding {
    #[default]
    Json,
    Bincode,
}

impl ArtifactEncoding {
    /// Pick the encoding from a file extension (`json` or `bin`).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ArtifactEncoding::Json),
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Ok(ArtifactEncoding::Bincode),
            _ => Err(ScamCheckError::invalid_argument(format!(
                "Cannot infer artifact encoding of {}; use a .json or .bin extension",
                path.display()
            ))),
        }
    }

    /// File extension written for this encoding.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactEncoding::Json => "json",
            ArtifactEncoding::Bincode => "bin",
        }
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(match self {
            ArtifactEncoding::Json => serde_json::to_vec_pretty(value)?,
            ArtifactEncoding::Bincode => bincode::serialize(value)?,
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(match self {
            ArtifactEncoding::Json => serde_json::from_slice(bytes)?,
            ArtifactEncoding::Bincode => bincode::deserialize(bytes)?,
        })
    }
}

/// Typed wrapper around an artifact payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactEnvelope<T> {
    pub kind: ArtifactKind,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    /// Name and version of the program that wrote the artifact.
    pub generator: String,
    pub payload: T,
}

/// Envelope fields that precede the payload; decoded first to check
/// compatibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub kind: ArtifactKind,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub generator: String,
}

/// Payload types that can be stored in an artifact file.
pub trait Artifact: Serialize + DeserializeOwned {
    const KIND: ArtifactKind;
}

impl Artifact for TfIdfVectorizer {
    const KIND: ArtifactKind = ArtifactKind::Vectorizer;
}

impl Artifact for ClassifierModel {
    const KIND: ArtifactKind = ArtifactKind::Classifier;
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        ScamCheckError::artifact(format!("Failed to read artifact {}: {e}", path.display()))
    })
}

/// Read only the header of an artifact file.
pub fn read_artifact_header<P: AsRef<Path>>(path: P) -> Result<ArtifactHeader> {
    let path = path.as_ref();
    let encoding = ArtifactEncoding::from_path(path)?;
    let bytes = read_bytes(path)?;
    encoding.decode(&bytes).map_err(|e| {
        ScamCheckError::artifact(format!(
            "Corrupt artifact header in {}: {e}",
            path.display()
        ))
    })
}

/// Write a payload to `path`, wrapped in a fresh envelope.
pub fn save_artifact<T: Artifact, P: AsRef<Path>>(path: P, payload: &T) -> Result<()> {
    let path = path.as_ref();
    let encoding = ArtifactEncoding::from_path(path)?;
    let envelope = ArtifactEnvelope {
        kind: T::KIND,
        format_version: ARTIFACT_FORMAT_VERSION,
        created_at: Utc::now(),
        generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        payload,
    };

    fs::write(path, encoding.encode(&envelope)?)?;
    info!("Saved {} artifact to {}", T::KIND, path.display());
    Ok(())
}

/// Load and check an artifact of the expected kind.
///
/// Missing files, kind mismatches, unsupported format versions and
/// undecodable payloads are reported as artifact errors. An unknown file
/// extension is an invalid argument.
pub fn load_artifact<T: Artifact, P: AsRef<Path>>(path: P) -> Result<ArtifactEnvelope<T>> {
    let path = path.as_ref();
    let encoding = ArtifactEncoding::from_path(path)?;
    let bytes = read_bytes(path)?;

    let header: ArtifactHeader = encoding.decode(&bytes).map_err(|e| {
        ScamCheckError::artifact(format!(
            "Corrupt artifact header in {}: {e}",
            path.display()
        ))
    })?;
    if header.kind != T::KIND {
        return Err(ScamCheckError::artifact(format!(
            "Incompatible artifact {}: expected a {} but found a {}",
            path.display(),
            T::KIND,
            header.kind
        )));
    }
    if header.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ScamCheckError::artifact(format!(
            "Incompatible artifact {}: format version {} is not supported (expected {})",
            path.display(),
            header.format_version,
            ARTIFACT_FORMAT_VERSION
        )));
    }

    let envelope: ArtifactEnvelope<T> = encoding.decode(&bytes).map_err(|e| {
        ScamCheckError::artifact(format!(
            "Corrupt {} payload in {}: {e}",
            T::KIND,
            path.display()
        ))
    })?;

    info!(
        "Loaded {} artifact from {} (created {} by {})",
        T::KIND,
        path.display(),
        envelope.created_at.to_rfc3339(),
        envelope.generator
    );
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::ml::classifier::LinearModel;
    use crate::ml::vectorizer::TfIdfParams;

    fn vectorizer() -> TfIdfVectorizer {
        let mut vectorizer = TfIdfVectorizer::new(TfIdfParams::default()).unwrap();
        vectorizer.fit(&["free prize", "lunch today"]).unwrap();
        vectorizer
    }

    #[test]
    fn test_encoding_from_path() {
        assert_eq!(
            ArtifactEncoding::from_path(Path::new("model.json")).unwrap(),
            ArtifactEncoding::Json
        );
        assert_eq!(
            ArtifactEncoding::from_path(Path::new("model.BIN")).unwrap(),
            ArtifactEncoding::Bincode
        );
        assert!(matches!(
            ArtifactEncoding::from_path(Path::new("model.pkl")),
            Err(ScamCheckError::InvalidArgument(_))
        ));
        assert!(ArtifactEncoding::from_path(Path::new("model")).is_err());
    }

    #[test]
    fn test_save_and_load_both_encodings() {
        let dir = TempDir::new().unwrap();
        let original = vectorizer();

        for name in ["vectorizer.json", "vectorizer.bin"] {
            let path = dir.path().join(name);
            save_artifact(&path, &original).unwrap();

            let envelope = load_artifact::<TfIdfVectorizer, _>(&path).unwrap();
            assert_eq!(envelope.kind, ArtifactKind::Vectorizer);
            assert_eq!(envelope.format_version, ARTIFACT_FORMAT_VERSION);
            assert_eq!(
                envelope.payload.transform_one("free lunch"),
                original.transform_one("free lunch")
            );

            let header = read_artifact_header(&path).unwrap();
            assert_eq!(header.kind, ArtifactKind::Vectorizer);
        }
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tfidf_vectorizer.json");
        save_artifact(&path, &vectorizer()).unwrap();

        let error = load_artifact::<ClassifierModel, _>(&path).unwrap_err();
        assert!(error.to_string().contains("expected a classifier"));

        let model: ClassifierModel = LinearModel::new(vec![0, 1], vec![1.0], 0.0).unwrap().into();
        let model_path = dir.path().join("spam_model.bin");
        save_artifact(&model_path, &model).unwrap();
        assert!(load_artifact::<TfIdfVectorizer, _>(&model_path).is_err());
        assert_eq!(
            load_artifact::<ClassifierModel, _>(&model_path).unwrap().payload,
            model
        );
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = TempDir::new().unwrap();
        assert!(load_artifact::<ClassifierModel, _>(dir.path().join("missing.json")).is_err());

        let path = dir.path().join("corrupt.json");
        fs::write(&path, b"{ not json").unwrap();
        assert!(load_artifact::<ClassifierModel, _>(&path).is_err());

        let path = dir.path().join("future.json");
        fs::write(
            &path,
            br#"{"kind":"classifier","format_version":99,"created_at":"2024-01-01T00:00:00Z","generator":"x","payload":null}"#,
        )
        .unwrap();
        let error = load_artifact::<ClassifierModel, _>(&path).unwrap_err();
        assert!(error.to_string().contains("format version 99"));
    }
}
