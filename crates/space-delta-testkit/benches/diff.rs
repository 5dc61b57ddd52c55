use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use space_delta_core::{apply_script, compact, diff, generate_all};

/// Deterministic pseudo-text: a repeating line with a counter mixed in.
fn corpus(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| match i % 64 {
            63 => b'\n',
            k => b'a' + ((k * 7 + i / 64) % 26) as u8,
        })
        .collect()
}

/// Sprinkle `edits` single-byte changes through `base`.
fn edited(base: &[u8], edits: usize) -> Vec<u8> {
    let mut out = base.to_vec();
    let stride = (out.len() / edits.max(1)).max(1);
    for i in (0..out.len()).step_by(stride).take(edits) {
        out[i] = b'#';
    }
    out
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");
    for &size in &[1024usize, 16 * 1024, 64 * 1024] {
        let a = corpus(size);
        let b = edited(&a, 16);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("sparse_edits", size), &size, |bench, _| {
            bench.iter(|| diff(black_box(&a), black_box(&b)))
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let a = corpus(64 * 1024);
    let b = edited(&a, 256);
    let script = diff(&a, &b);
    c.bench_function("apply_script/256_edits", |bench| {
        bench.iter(|| apply_script(black_box(&script), black_box(&a)))
    });
    c.bench_function("compact/256_edits", |bench| {
        bench.iter(|| compact(black_box(script.clone())))
    });
}

fn bench_chunk(c: &mut Criterion) {
    let data = corpus(1024 * 1024);
    let mut group = c.benchmark_group("generate");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for &max_chunk in &[4096usize, 64 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(max_chunk), &max_chunk, |bench, &n| {
            bench.iter(|| generate_all(black_box(&data[..]), n))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff, bench_apply, bench_chunk);
criterion_main!(benches);
