use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use hubmark_core::{Highlighter, RewriteOptions, render_html, render_into};
use std::io::{self, Write};

// A dummy writer that discards data, similar to /dev/null
struct NullWriter;
impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn generate_large_markdown() -> String {
    let mut s = String::with_capacity(200_000);
    s.push_str("# Benchmark Document\n\n");
    for i in 0..5_000 {
        s.push_str(&format!(
            "* Item {i} linking to [docs](https://example.com/{i})\n"
        ));
    }
    // Code blocks so the highlighting stage is part of the measurement
    for _ in 0..100 {
        s.push_str("```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\n");
    }
    s
}

fn benchmark_pipeline(c: &mut Criterion) {
    let input = generate_large_markdown();
    let highlighter = Highlighter::new();
    let mut group = c.benchmark_group("render_throughput");

    group.throughput(Throughput::Bytes(input.len() as u64));

    // 1. Streaming straight into a writer (no intermediate String)
    group.bench_function("streaming_pipeline", |b| {
        b.iter(|| {
            render_into(
                NullWriter,
                black_box(input.as_str()),
                highlighter,
                RewriteOptions::default(),
            )
            .unwrap();
        })
    });

    // 2. Buffering into a String first (what the view controller does)
    group.bench_function("buffered_string", |b| {
        b.iter(|| {
            let html = render_html(black_box(&input)).unwrap();
            black_box(html);
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_pipeline);
criterion_main!(benches);
