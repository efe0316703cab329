use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use keepsake::{JsonLogger, Level, parse_from};

fn large_document() -> Vec<u8> {
    let mut doc = String::from("<!DOCTYPE html><html><head>");
    for i in 0..10_000 {
        doc.push_str(&format!("<link rel=\"preload\" href=\"/asset/{i}.js\">"));
    }
    doc.push_str("<title>Benchmark &amp; Friends</title></head><body></body></html>");
    doc.into_bytes()
}

fn bench_extract(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let logger = JsonLogger::new(std::io::sink(), Level::Info);

    let small = b"<html><head><title>Small</title></head></html>".to_vec();
    c.bench_function("extract_small", |b| {
        b.iter(|| {
            runtime
                .block_on(parse_from(black_box(&small[..]), &logger))
                .unwrap()
        })
    });

    let large = large_document();
    c.bench_function("extract_late_title", |b| {
        b.iter(|| {
            runtime
                .block_on(parse_from(black_box(&large[..]), &logger))
                .unwrap()
        })
    });

    c.bench_function("extract_no_title", |b| {
        let plain = vec![b'a'; 1 << 20];
        b.iter(|| {
            runtime
                .block_on(parse_from(black_box(&plain[..]), &logger))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
