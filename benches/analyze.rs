use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use penney_sim::analysis::{AnalyzerConfig, CombinationAnalyzer};
use penney_sim::core::SequencePair;
use penney_sim::generation::{generate, RngState};
use penney_sim::matching::score;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("10k_decks", |b| {
        b.iter(|| generate(black_box(10_000), &RngState::new(42, 26)))
    });
    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let decks = generate(1_000, &RngState::new(7, 26)).unwrap().decks;
    let pair = SequencePair::parse("011", "110").unwrap();

    c.bench_function("score_1k_decks_one_pair", |b| {
        b.iter(|| {
            for deck in &decks {
                black_box(score(deck, &pair));
            }
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let decks = generate(10_000, &RngState::new(42, 26)).unwrap().decks;

    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Elements(decks.len() as u64));
    for parallel in [false, true] {
        let analyzer = CombinationAnalyzer::new(
            AnalyzerConfig::default()
                .with_parallel(parallel)
                .with_progress_interval(0),
        );
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_with_input(BenchmarkId::new(label, decks.len()), &decks, |b, decks| {
            b.iter(|| analyzer.analyze(black_box(decks), None))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_score, bench_analyze);
criterion_main!(benches);
