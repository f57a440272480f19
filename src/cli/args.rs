//! Command line argument parsing for the scamcheck CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::CheckerConfig;

/// scamcheck - Tell whether an SMS looks like a scam
#[derive(Parser, Debug, Clone)]
#[command(name = "scamcheck")]
#[command(about = "Classify SMS messages as scam or not")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ScamCheckArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ScamCheckArgs {
    /// Get the effective verbosity level (0=error, 1=warn, 2=info, 3+=debug).
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify one message (read from stdin when TEXT is omitted)
    Check(CheckArgs),

    /// Prompt for messages until end of input
    Interactive(InteractiveArgs),

    /// Classify every line of a file
    Batch(BatchArgs),

    /// Print the normalized form of a message
    Normalize(NormalizeArgs),

    /// Fit a vectorizer and classifier on labeled messages
    Train(TrainArgs),

    /// Score the loaded artifacts against labeled messages
    Evaluate(EvaluateArgs),

    /// Show metadata of the artifact files
    Inspect(InspectArgs),
}

/// Locations of the artifacts, shared by every command that loads them
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Directory holding spam_model.json and tfidf_vectorizer.json
    /// (defaults to the executable's directory)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Classifier artifact path
    #[arg(long, value_name = "PATH", env = "SCAMCHECK_MODEL")]
    pub model: Option<PathBuf>,

    /// Vectorizer artifact path
    #[arg(long, value_name = "PATH", env = "SCAMCHECK_VECTORIZER")]
    pub vectorizer: Option<PathBuf>,

    #[command(flatten)]
    pub stopwords: StopwordArgs,
}

impl ArtifactArgs {
    /// Resolve the effective configuration; explicit paths win over the
    /// directory.
    pub fn to_config(&self) -> CheckerConfig {
        let mut config = match &self.artifact_dir {
            Some(dir) => CheckerConfig::in_dir(dir),
            None => CheckerConfig::default(),
        };
        if let Some(path) = &self.model {
            config = config.with_model_path(path);
        }
        if let Some(path) = &self.vectorizer {
            config = config.with_vectorizer_path(path);
        }
        if let Some(path) = &self.stopwords.stopwords {
            config = config.with_stopwords_path(path);
        }
        config
    }
}

/// Stop word source
#[derive(Args, Debug, Clone, Default)]
pub struct StopwordArgs {
    /// Stop word file, one word per line (defaults to the built-in English list)
    #[arg(long, value_name = "PATH", env = "SCAMCHECK_STOPWORDS")]
    pub stopwords: Option<PathBuf>,
}

/// Arguments for checking one message
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Also print the normalized message
    #[arg(long)]
    pub show_normalized: bool,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Arguments for the interactive prompt
#[derive(Parser, Debug, Clone)]
pub struct InteractiveArgs {
    /// Also print the normalized message
    #[arg(long)]
    pub show_normalized: bool,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Arguments for batch classification
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File with one message per line
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Arguments for normalization
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub stopwords: StopwordArgs,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled messages (JSON array or JSON Lines of {"text", "label"})
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Directory the artifacts are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Naive Bayes smoothing
    #[arg(long, default_value = "1.0")]
    pub alpha: f64,

    /// Ignore terms found in fewer documents than this
    #[arg(long, default_value = "1")]
    pub min_df: usize,

    /// Use 1 + ln(tf) instead of raw term counts
    #[arg(long)]
    pub sublinear_tf: bool,

    /// Fraction of samples held out for evaluation
    #[arg(long, default_value = "0.0")]
    pub test_ratio: f64,

    /// Seed for the hold-out split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Write bincode (.bin) artifacts instead of JSON
    #[arg(long)]
    pub binary: bool,

    #[command(flatten)]
    pub stopwords: StopwordArgs,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Labeled messages (JSON array or JSON Lines of {"text", "label"})
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Arguments for inspecting artifacts
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_check_command() {
        let args = ScamCheckArgs::try_parse_from([
            "scamcheck",
            "check",
            "WIN a FREE prize!!!",
            "--show-normalized",
            "--model",
            "/tmp/model.bin",
        ])
        .unwrap();

        if let Command::Check(check_args) = args.command {
            assert_eq!(check_args.text.as_deref(), Some("WIN a FREE prize!!!"));
            assert!(check_args.show_normalized);
            assert_eq!(
                check_args.artifacts.model,
                Some(PathBuf::from("/tmp/model.bin"))
            );
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_check_without_text() {
        let args = ScamCheckArgs::try_parse_from(["scamcheck", "check"]).unwrap();
        if let Command::Check(check_args) = args.command {
            assert!(check_args.text.is_none());
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_train_command() {
        let args = ScamCheckArgs::try_parse_from([
            "scamcheck",
            "train",
            "sms.jsonl",
            "-o",
            "artifacts",
            "--alpha",
            "0.5",
            "--test-ratio",
            "0.2",
            "--binary",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.data, PathBuf::from("sms.jsonl"));
            assert_eq!(train_args.output_dir, PathBuf::from("artifacts"));
            assert_eq!(train_args.alpha, 0.5);
            assert_eq!(train_args.min_df, 1);
            assert_eq!(train_args.test_ratio, 0.2);
            assert_eq!(train_args.seed, 42);
            assert!(train_args.binary);
            assert!(!train_args.sublinear_tf);
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_artifact_config() {
        let artifacts = ArtifactArgs {
            artifact_dir: Some(PathBuf::from("/srv/models")),
            vectorizer: Some(PathBuf::from("/other/vec.bin")),
            ..ArtifactArgs::default()
        };
        let config = artifacts.to_config();

        assert_eq!(
            config.model_path,
            PathBuf::from("/srv/models/spam_model.json")
        );
        assert_eq!(config.vectorizer_path, PathBuf::from("/other/vec.bin"));
        assert!(config.stopwords_path.is_none());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = ScamCheckArgs::try_parse_from(["scamcheck", "inspect"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = ScamCheckArgs::try_parse_from(["scamcheck", "-v", "inspect"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = ScamCheckArgs::try_parse_from(["scamcheck", "-vv", "inspect"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = ScamCheckArgs::try_parse_from(["scamcheck", "--quiet", "inspect"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            ScamCheckArgs::try_parse_from(["scamcheck", "--format", "json", "normalize", "hi"])
                .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
