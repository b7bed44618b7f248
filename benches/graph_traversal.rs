//! Benchmarks for knowledge graph construction and `get_related`
//! traversal depth.

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memory_intel_core::chunk::{Chunk, ChunkKind, Outcome};
use memory_intel_core::graph::{GraphConfig, KnowledgeGraph, Node};
use test_utils::test_chunk_in;

fn chunk_chain(length: usize) -> Vec<Chunk> {
    let base = Utc::now();
    (0..length)
        .map(|i| {
            test_chunk_in(
                &format!("working through step {i} of the migration"),
                ChunkKind::Discussion,
                Outcome::InProgress,
                "acme/widgets",
                "session-bench",
                base + Duration::minutes(i as i64),
            )
        })
        .collect()
}

fn bench_build_from_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_from_chunks_by_chunk_count");
    for size in [10usize, 100, 500] {
        let chunks = chunk_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &chunks, |b, chunks| {
            b.iter(|| {
                let config = GraphConfig::default();
                let mut graph = KnowledgeGraph::new(&config);
                graph.build_from_chunks(chunks, &config).unwrap();
                black_box(graph.node_count());
            });
        });
    }
    group.finish();
}

fn bench_get_related_by_depth(c: &mut Criterion) {
    let config = GraphConfig::default();
    let chunks = chunk_chain(200);
    let mut graph = KnowledgeGraph::new(&config);
    graph.build_from_chunks(&chunks, &config).unwrap();
    let start = Node::chunk_node_id(&chunks[0].id);

    let mut group = c.benchmark_group("get_related_by_depth");
    for depth in [1usize, 3, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, depth| {
            b.iter(|| black_box(graph.get_related(&start, *depth)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_from_chunks, bench_get_related_by_depth);
criterion_main!(benches);
