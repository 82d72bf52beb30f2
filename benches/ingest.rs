//! Benchmarks for custodia parsing, reduction and report filtering.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench ingest -- reduce`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use custodia::model::{MediaKind, Message};
use custodia::parsing::{classify_line, clean_line, reduce_lines};
use custodia::report::{ReportMode, filter_for_report};

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_transcript(count: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(count * 2);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let day = (i % 27) + 1;
        let hour = i % 24;
        let minute = i % 60;
        lines.push(format!(
            "{day:02}/02/2024, {hour:02}:{minute:02} - {sender}: Message number {i}"
        ));
        // Every third message spans two lines
        if i % 3 == 0 {
            lines.push(format!("continuation of {i}"));
        }
    }
    lines
}

fn generate_messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| Message {
            id: i as i64 + 1,
            conversation_id: 1,
            timestamp: format!("{:02}/02/2024 {:02}:{:02}", (i % 27) + 1, i % 24, i % 60),
            sender: if i % 2 == 0 { "Alice" } else { "Bob" }.to_string(),
            content: format!("Message number {i}"),
            media_kind: if i % 10 == 0 {
                MediaKind::Image
            } else {
                MediaKind::Text
            },
            media_path: None,
            is_evidence: i % 50 == 0,
        })
        .collect()
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [1_000_usize, 10_000, 50_000] {
        let lines = generate_transcript(size);
        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(classify_line(&clean_line(black_box(line))));
                }
            });
        });
    }
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for size in [1_000_usize, 10_000, 50_000] {
        let lines = generate_transcript(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let messages = reduce_lines(black_box(lines));
                black_box(messages)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Report Filter Benchmarks
// =============================================================================

fn bench_report_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_all");

    for size in [1_000_usize, 10_000, 100_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &messages,
            |b, messages| {
                b.iter(|| {
                    let entries = filter_for_report(black_box(messages), &ReportMode::All);
                    black_box(entries)
                });
            },
        );
    }
    group.finish();
}

fn bench_report_evidence(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_evidence");

    for size in [1_000_usize, 10_000, 100_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &messages,
            |b, messages| {
                b.iter(|| {
                    let entries = filter_for_report(black_box(messages), &ReportMode::Evidence);
                    black_box(entries)
                });
            },
        );
    }
    group.finish();
}

fn bench_report_keyword(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_keyword");
    let mode = ReportMode::Keyword("number 5".to_string());

    for size in [1_000_usize, 10_000, 100_000] {
        let messages = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &messages,
            |b, messages| {
                b.iter(|| {
                    let entries = filter_for_report(black_box(messages), &mode);
                    black_box(entries)
                });
            },
        );
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_classify,
    bench_reduce,
    bench_report_all,
    bench_report_evidence,
    bench_report_keyword,
);

criterion_main!(benches);
