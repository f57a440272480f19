//! Command implementations for the scamcheck CLI.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use crate::analysis::analyzer::normalizer::TextNormalizer;
use crate::artifact::{ArtifactEncoding, load_artifact, save_artifact};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{CheckerConfig, DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE};
use crate::context::CheckerContext;
use crate::error::Result;
use crate::ml::classifier::{Classifier, ClassifierModel};
use crate::ml::training::{self, TrainingParams};
use crate::ml::vectorizer::{TfIdfParams, TfIdfVectorizer};

/// Title printed when the interactive prompt starts.
pub const APP_TITLE: &str = "SMS Scam Checker";

/// Execute a CLI command.
pub fn execute_command(args: ScamCheckArgs) -> Result<()> {
    match &args.command {
        Command::Check(check_args) => check_message(check_args, &args)?,
        Command::Interactive(interactive_args) => run_interactive(interactive_args, &args)?,
        Command::Batch(batch_args) => run_batch(batch_args, &args)?,
        Command::Normalize(normalize_args) => normalize_message(normalize_args, &args)?,
        Command::Train(train_args) => train_model(train_args, &args)?,
        Command::Evaluate(evaluate_args) => evaluate_model(evaluate_args, &args)?,
        Command::Inspect(inspect_args) => inspect_artifacts(inspect_args, &args)?,
    }
    Ok(())
}

fn load_context(artifacts: &ArtifactArgs) -> anyhow::Result<CheckerContext> {
    let config = artifacts.to_config();
    debug!("Loading checker with {config:?}");
    CheckerContext::load(&config).with_context(|| {
        format!(
            "Failed to load artifacts {} and {}",
            config.vectorizer_path.display(),
            config.model_path.display()
        )
    })
}

fn load_normalizer(stopwords: &StopwordArgs) -> anyhow::Result<TextNormalizer> {
    match &stopwords.stopwords {
        Some(path) => TextNormalizer::from_stopword_file(path)
            .with_context(|| format!("Failed to load stop words from {}", path.display())),
        None => Ok(TextNormalizer::new()),
    }
}

/// Drop one trailing line terminator, keeping any other whitespace.
fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}

/// Classify one message given as an argument or on stdin.
fn check_message(args: &CheckArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let context = load_context(&args.artifacts)?;

    let text = match &args.text {
        Some(text) => text.clone(),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read message from stdin")?;
            strip_line_ending(&buffer).to_string()
        }
    };

    let outcome = context.check(&text)?;
    output_result(
        &CheckResult {
            outcome,
            show_normalized: args.show_normalized,
        },
        cli_args,
    )?;
    Ok(())
}

/// Prompt for messages until stdin is closed.
fn run_interactive(args: &InteractiveArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let context = load_context(&args.artifacts)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if cli_args.output_format == OutputFormat::Human {
        println!("{APP_TITLE}");
        println!();
    }

    loop {
        if cli_args.output_format == OutputFormat::Human {
            print!("Enter the SMS: ");
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let outcome = context.check(strip_line_ending(&line))?;
        output_result(
            &CheckResult {
                outcome,
                show_normalized: args.show_normalized,
            },
            cli_args,
        )?;
    }

    Ok(())
}

/// Classify every non-empty line of a file.
fn run_batch(args: &BatchArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let context = load_context(&args.artifacts)?;
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let mut lines = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", args.input.display()))?;
        if line.is_empty() {
            debug!("Skipping empty line {}", line_num + 1);
            continue;
        }
        lines.push((line_num + 1, line));
    }

    let start_time = Instant::now();
    let texts: Vec<&str> = lines.iter().map(|(_, text)| text.as_str()).collect();
    let outcomes = context.check_batch(&texts)?;
    let duration = start_time.elapsed();

    let results: Vec<BatchEntry> = lines
        .into_iter()
        .zip(outcomes)
        .map(|((line, text), outcome)| BatchEntry {
            line,
            text,
            outcome,
        })
        .collect();
    let scam = results
        .iter()
        .filter(|entry| entry.outcome.label().is_some_and(|label| label.is_scam()))
        .count();
    info!("Classified {} messages in {:?}", results.len(), duration);

    output_result(
        &BatchResult {
            total: results.len(),
            scam,
            duration_ms: duration.as_millis() as u64,
            results,
        },
        cli_args,
    )?;
    Ok(())
}

/// Print the normalized form of a message.
fn normalize_message(args: &NormalizeArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let normalizer = load_normalizer(&args.stopwords)?;
    let normalized = normalizer.normalize(&args.text)?;

    output_result(
        &NormalizeResult {
            input: args.text.clone(),
            normalized,
        },
        cli_args,
    )?;
    Ok(())
}

/// Fit and save a vectorizer and classifier.
fn train_model(args: &TrainArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let normalizer = load_normalizer(&args.stopwords)?;
    let samples = training::load_training_data(&args.data)
        .with_context(|| format!("Failed to load training data {}", args.data.display()))?;
    info!(
        "Loaded {} samples from {}",
        samples.len(),
        args.data.display()
    );

    let params = TrainingParams {
        tfidf: TfIdfParams {
            sublinear_tf: args.sublinear_tf,
            min_df: args.min_df,
            ..TfIdfParams::default()
        },
        alpha: args.alpha,
        test_ratio: args.test_ratio,
        seed: args.seed,
    };

    let start_time = Instant::now();
    let model = training::train(&samples, &normalizer, &params)?;
    let duration = start_time.elapsed();

    let encoding = if args.binary {
        ArtifactEncoding::Bincode
    } else {
        ArtifactEncoding::Json
    };
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let model_path = args
        .output_dir
        .join(DEFAULT_MODEL_FILE)
        .with_extension(encoding.extension());
    let vectorizer_path = args
        .output_dir
        .join(DEFAULT_VECTORIZER_FILE)
        .with_extension(encoding.extension());

    save_artifact(&vectorizer_path, &model.vectorizer)
        .with_context(|| format!("Failed to write {}", vectorizer_path.display()))?;
    save_artifact(&model_path, &model.classifier)
        .with_context(|| format!("Failed to write {}", model_path.display()))?;

    output_result(
        &TrainingResult {
            model_path,
            vectorizer_path,
            encoding,
            train_size: model.train_size,
            vocabulary_size: model.vectorizer.vocabulary_size(),
            duration_ms: duration.as_millis() as u64,
            evaluation: model.evaluation.map(MetricsResult::from),
        },
        cli_args,
    )?;
    Ok(())
}

/// Score the configured artifacts on labeled data.
fn evaluate_model(args: &EvaluateArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let context = load_context(&args.artifacts)?;
    let samples = training::load_training_data(&args.data)
        .with_context(|| format!("Failed to load evaluation data {}", args.data.display()))?;

    let report = training::evaluate(context.pipeline(), context.normalizer(), &samples)?;
    output_result(&MetricsResult::from(report), cli_args)?;
    Ok(())
}

/// Show artifact metadata.
fn inspect_artifacts(args: &InspectArgs, cli_args: &ScamCheckArgs) -> anyhow::Result<()> {
    let result = inspect_config(&args.artifacts.to_config())?;
    output_result(&result, cli_args)?;
    Ok(())
}

/// Read both artifacts named by `config` and report whether they fit together.
///
/// Unlike [`CheckerContext::load`], a mismatched pair is reported rather than
/// rejected; only unreadable files or wrong artifact kinds are errors.
pub fn inspect_config(config: &CheckerConfig) -> anyhow::Result<InspectResult> {
    let vectorizer = load_artifact::<TfIdfVectorizer, _>(&config.vectorizer_path)
        .with_context(|| format!("Failed to inspect {}", config.vectorizer_path.display()))?;
    let classifier = load_artifact::<ClassifierModel, _>(&config.model_path)
        .with_context(|| format!("Failed to inspect {}", config.model_path.display()))?;

    let vocabulary_size = vectorizer.payload.vocabulary_size();
    let n_features = classifier.payload.n_features();
    let compatible = classifier.payload.validate().is_ok() && vocabulary_size == n_features;

    Ok(InspectResult {
        vectorizer: ArtifactInfo {
            path: config.vectorizer_path.clone(),
            kind: vectorizer.kind,
            format_version: vectorizer.format_version,
            created_at: vectorizer.created_at,
            generator: vectorizer.generator,
            details: format!(
                "{vocabulary_size} terms fitted on {} documents",
                vectorizer.payload.n_documents()
            ),
        },
        classifier: ArtifactInfo {
            path: config.model_path.clone(),
            kind: classifier.kind,
            format_version: classifier.format_version,
            created_at: classifier.created_at,
            generator: classifier.generator,
            details: format!(
                "{} over {n_features} features, classes {:?}",
                classifier.payload.name(),
                classifier.payload.classes()
            ),
        },
        compatible,
    })
}
