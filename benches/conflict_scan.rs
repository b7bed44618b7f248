//! Benchmarks for `detect_conflicts`'s pairwise dimension scan as the
//! candidate chunk count grows.

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_intel_core::chunk::{ChunkKind, Outcome};
use memory_intel_core::conflict::{detect_conflicts, ConflictDetectorConfig};
use test_utils::test_chunk_in;

fn mixed_outcome_chunks(count: usize) -> Vec<memory_intel_core::chunk::Chunk> {
    let base = Utc::now();
    (0..count)
        .map(|i| {
            let outcome = if i % 2 == 0 { Outcome::Success } else { Outcome::Failed };
            test_chunk_in(
                &format!("decided to use approach {} for the auth module", i % 5),
                ChunkKind::ArchitectureDecision,
                outcome,
                "acme/widgets",
                &format!("session-{i}"),
                base + Duration::hours(i as i64),
            )
        })
        .collect()
}

fn bench_detect_conflicts(c: &mut Criterion) {
    let config = ConflictDetectorConfig::default();
    let mut group = c.benchmark_group("detect_conflicts_by_chunk_count");
    for size in [10usize, 50, 200] {
        let chunks = mixed_outcome_chunks(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &chunks, |b, chunks| {
            b.iter(|| black_box(detect_conflicts(chunks, &config)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect_conflicts);
criterion_main!(benches);
