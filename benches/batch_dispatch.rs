//! Benchmarks for batch dispatch overhead
//!
//! Uses an in-memory synthesizer so only scheduling, validation and
//! reassembly are measured.

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use edge_tts_client::batch::{BatchStrategy, BatchSynthesizer};
use edge_tts_client::ssml::SsmlBuilder;
use edge_tts_client::tts::Synthesizer;

struct Echo;

#[async_trait]
impl Synthesizer for Echo {
    async fn synthesize(&self, text: &str, _voice: &str) -> edge_tts_client::Result<Vec<u8>> {
        tokio::task::yield_now().await;
        Ok(text.as_bytes().to_vec())
    }
}

fn bench_strategies(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let texts: Vec<String> = (0..100).map(|i| format!("Batch item number {}", i)).collect();

    let mut group = c.benchmark_group("batch_dispatch");
    group.throughput(Throughput::Elements(texts.len() as u64));
    for (label, strategy) in [
        ("sequential", BatchStrategy::Sequential),
        ("concurrent_4", BatchStrategy::Concurrent { max_concurrency: 4 }),
        ("concurrent_32", BatchStrategy::Concurrent { max_concurrency: 32 }),
    ] {
        let batch = BatchSynthesizer::new(Echo, "en-US-AriaNeural").with_strategy(strategy);
        group.bench_with_input(BenchmarkId::from_parameter(label), &texts, |b, texts| {
            b.to_async(&runtime)
                .iter(|| async { black_box(batch.synthesize_texts(texts.iter().cloned()).await) })
        });
    }
    group.finish();
}

fn bench_ssml_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let docs: Vec<String> = (0..100)
        .map(|i| {
            SsmlBuilder::new("en-US-AriaNeural")
                .add_prosody(format!("Item {}", i), Some("fast"), None, None)
                .build()
        })
        .collect();
    let batch = BatchSynthesizer::new(Echo, "en-US-AriaNeural")
        .with_ssml(true)
        .with_max_concurrency(8);

    c.bench_function("batch_dispatch_ssml_validated", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(batch.synthesize_texts(docs.iter().cloned()).await) })
    });
}

criterion_group!(benches, bench_strategies, bench_ssml_batch);
criterion_main!(benches);
