use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use huffpack::{compress, decompress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_text() -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. ".repeat(1024)
}

fn sample_random() -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..64 * 1024).map(|_| rng.gen()).collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    for (name, data) in [("text", sample_text()), ("random", sample_random())] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("compress/{name}"), |b| {
            b.iter(|| compress(black_box(&data)).unwrap())
        });
        let (table, packed) = compress(&data).unwrap();
        group.bench_function(format!("decompress/{name}"), |b| {
            b.iter(|| decompress(black_box(&table), black_box(&packed)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
