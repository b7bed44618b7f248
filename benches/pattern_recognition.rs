//! Benchmarks for `PatternEngine::recognize` over chunk sequences of
//! increasing length.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_intel_core::collaborators::mock::{HashEmbeddings, InMemoryPatternStorage};
use memory_intel_core::pattern::{PatternEngine, PatternEngineConfig};
use test_utils::problem_solution_sequence;

fn engine() -> PatternEngine {
    PatternEngine::new(
        PatternEngineConfig::default(),
        Arc::new(InMemoryPatternStorage::default()),
        Some(Arc::new(HashEmbeddings::new(32))),
        None,
    )
}

fn bench_recognize(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = engine();

    let mut group = c.benchmark_group("recognize_by_sequence_count");
    for repeats in [1usize, 4, 16] {
        let chunks: Vec<_> = std::iter::repeat_with(problem_solution_sequence)
            .take(repeats)
            .flatten()
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(repeats), &chunks, |b, chunks| {
            b.to_async(&rt)
                .iter(|| async { black_box(engine.recognize(chunks).await.unwrap()) });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recognize);
criterion_main!(benches);
