//! Output formatting for CLI commands.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifact::{ArtifactEncoding, ArtifactKind};
use crate::cli::args::{OutputFormat, ScamCheckArgs};
use crate::context::CheckOutcome;
use crate::error::Result;
use crate::ml::training::EvaluationReport;

/// Result of the `check` command.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    #[serde(flatten)]
    pub outcome: CheckOutcome,
    #[serde(skip)]
    pub show_normalized: bool,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_normalized
            && let Some(normalized) = self.outcome.normalized()
        {
            writeln!(f, "Normalized: {normalized}")?;
        }
        write!(f, "{}", self.outcome)
    }
}

/// Result of the `normalize` command.
#[derive(Debug, Serialize)]
pub struct NormalizeResult {
    pub input: String,
    pub normalized: String,
}

impl fmt::Display for NormalizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// One line of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub line: usize,
    pub text: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Result of the `batch` command.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub scam: usize,
    pub duration_ms: u64,
    pub results: Vec<BatchEntry>,
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.results {
            writeln!(f, "{:>5}  {}  {}", entry.line, entry.outcome, entry.text)?;
        }
        write!(
            f,
            "{} of {} messages flagged as scam ({} ms)",
            self.scam, self.total, self.duration_ms
        )
    }
}

/// Confusion counts with derived metrics.
#[derive(Debug, Serialize)]
pub struct MetricsResult {
    #[serde(flatten)]
    pub counts: EvaluationReport,
    pub total: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl From<EvaluationReport> for MetricsResult {
    fn from(report: EvaluationReport) -> Self {
        MetricsResult {
            counts: report,
            total: report.total(),
            accuracy: report.accuracy(),
            precision: report.precision(),
            recall: report.recall(),
            f1: report.f1(),
        }
    }
}

impl fmt::Display for MetricsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples:   {}", self.total)?;
        writeln!(f, "Accuracy:  {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall:    {:.4}", self.recall)?;
        writeln!(f, "F1:        {:.4}", self.f1)?;
        write!(
            f,
            "Confusion: tp={} fp={} tn={} fn={}",
            self.counts.true_positives,
            self.counts.false_positives,
            self.counts.true_negatives,
            self.counts.false_negatives
        )
    }
}

/// Result of the `train` command.
#[derive(Debug, Serialize)]
pub struct TrainingResult {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub encoding: ArtifactEncoding,
    pub train_size: usize,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
    pub evaluation: Option<MetricsResult>,
}

impl fmt::Display for TrainingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} messages, {} features ({} ms)",
            self.train_size, self.vocabulary_size, self.duration_ms
        )?;
        writeln!(f, "Model:      {}", self.model_path.display())?;
        write!(f, "Vectorizer: {}", self.vectorizer_path.display())?;
        if let Some(metrics) = &self.evaluation {
            write!(f, "\n\nHeld-out evaluation\n{metrics}")?;
        }
        Ok(())
    }
}

/// Metadata of one artifact file.
#[derive(Debug, Serialize)]
pub struct ArtifactInfo {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub generator: String,
    pub details: String,
}

impl fmt::Display for ArtifactInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.path.display(), self.kind)?;
        writeln!(f, "  format version: {}", self.format_version)?;
        writeln!(f, "  created:        {}", self.created_at.to_rfc3339())?;
        writeln!(f, "  generator:      {}", self.generator)?;
        write!(f, "  details:        {}", self.details)
    }
}

/// Result of the `inspect` command.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    pub vectorizer: ArtifactInfo,
    pub classifier: ArtifactInfo,
    pub compatible: bool,
}

impl fmt::Display for InspectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.vectorizer)?;
        writeln!(f, "{}", self.classifier)?;
        write!(
            f,
            "Compatible: {}",
            if self.compatible { "yes" } else { "no" }
        )
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(result: &T, args: &ScamCheckArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            println!("{result}");
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ScamCheckArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
