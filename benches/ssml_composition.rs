//! Benchmarks for SSML composition and validation
//!
//! This benchmark measures:
//! - Building documents of increasing fragment count
//! - Validating the resulting markup

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use edge_tts_client::ssml::{SsmlBuilder, SsmlTemplate, SsmlValidator};

const VOICE: &str = "en-US-AriaNeural";

fn document(fragments: usize) -> String {
    let mut builder = SsmlBuilder::new(VOICE);
    for i in 0..fragments {
        builder = match i % 4 {
            0 => builder.add_text(format!("Sentence number {} & more.", i)),
            1 => builder.add_prosody("Slowly now", Some("slow"), Some("-2st"), Some("soft")),
            2 => builder.add_emphasis("important", "strong"),
            _ => builder.add_break("300ms"),
        };
    }
    builder.build()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssml_build");
    for size in [4usize, 64, 512] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(document(size)))
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssml_validate");
    for size in [4usize, 64, 512] {
        let doc = document(size);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(SsmlValidator::validate(black_box(doc))))
        });
    }
    group.finish();
}

fn bench_templates(c: &mut Criterion) {
    c.bench_function("render_all_templates", |b| {
        b.iter(|| {
            for template in SsmlTemplate::ALL {
                black_box(template.render("Hello there. How are you today?", VOICE));
            }
        })
    });
}

criterion_group!(benches, bench_build, bench_validate, bench_templates);
criterion_main!(benches);
