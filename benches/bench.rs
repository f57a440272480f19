//! Criterion benchmarks for scamcheck.
//!
//! Covers the per-message hot path:
//! - Text normalization
//! - TF-IDF vectorization and classification
//! - Parallel batch checking

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use scamcheck::analysis::TextNormalizer;
use scamcheck::context::CheckerContext;
use scamcheck::ml::label::Label;
use scamcheck::ml::training::{self, TrainingParams, TrainingSample};

/// Generate pseudo-SMS messages for benchmarking.
fn generate_test_messages(count: usize) -> Vec<String> {
    let words = [
        "free", "prize", "call", "now", "win", "cash", "claim", "urgent", "txt", "reply", "the",
        "and", "you", "are", "lunch", "meeting", "home", "tonight", "see", "later", "ok", "sorry",
        "mobile", "holiday",
    ];
    let punctuation = ["", "!", "?", ",", "...", "!!!"];

    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let length = 5 + (i % 25);
        let mut message = String::new();
        for j in 0..length {
            let word = words[(i * 7 + j * 13) % words.len()];
            if j % 3 == 0 {
                message.push_str(&word.to_uppercase());
            } else {
                message.push_str(word);
            }
            message.push_str(punctuation[(i + j) % punctuation.len()]);
            message.push(' ');
        }
        messages.push(message);
    }
    messages
}

fn build_context() -> CheckerContext {
    let messages = generate_test_messages(500);
    let samples: Vec<TrainingSample> = messages
        .iter()
        .map(|text| {
            let label = if text.to_lowercase().contains("prize") {
                Label::Scam
            } else {
                Label::LikelyNotScam
            };
            TrainingSample::new(text.clone(), label)
        })
        .collect();

    let normalizer = TextNormalizer::new();
    let model = training::train(&samples, &normalizer, &TrainingParams::default())
        .expect("benchmark corpus trains");
    CheckerContext::new(normalizer, model.pipeline().expect("pipeline builds"))
}

/// Benchmark text normalization.
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    let normalizer = TextNormalizer::new();
    let messages = generate_test_messages(1000);

    group.bench_function("normalize_single_message", |b| {
        b.iter(|| {
            let result = normalizer.normalize(black_box(&messages[0]));
            black_box(result)
        })
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("normalize_batch_messages", |b| {
        b.iter(|| {
            for message in messages.iter().take(100) {
                let result = normalizer.normalize(black_box(message));
                let _ = black_box(result);
            }
        })
    });

    group.finish();
}

/// Benchmark the full check path.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    let context = build_context();
    let messages = generate_test_messages(1000);

    group.bench_function("check_single_message", |b| {
        b.iter(|| {
            let result = context.check(black_box(&messages[3]));
            black_box(result)
        })
    });

    group.throughput(Throughput::Elements(1000));
    group.bench_function("check_batch_parallel", |b| {
        b.iter(|| {
            let result = context.check_batch(black_box(&messages));
            black_box(result)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_normalization, bench_classification);
criterion_main!(benches);
