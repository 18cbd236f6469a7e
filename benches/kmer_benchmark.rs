use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use findkmers::config::{Config, OutputMode};
use findkmers::kmer::{CountMode, MaxK};
use findkmers::run::DirectoryRunner;
use findkmers::table::KmerTable;
use std::fs;

fn bench_ingest_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("KmerTable::ingest/aggregate");
    let line = "ACGTTGCAAGCT".repeat(10);

    for k in [1, 4, 8] {
        let max_k = MaxK::new(k).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(k), &line, |b, line| {
            b.iter(|| {
                let mut table = KmerTable::new(max_k, CountMode::Aggregate);
                table.ingest(black_box(line.as_bytes()));
                black_box(table.len())
            })
        });
    }

    group.finish();
}

fn bench_ingest_positional(c: &mut Criterion) {
    let mut group = c.benchmark_group("KmerTable::ingest/positional");
    let max_k = MaxK::default();

    for len in [60, 120, 1000] {
        let line = "ACGT".repeat(len / 4 + 1);
        let line = &line.as_bytes()[..len];

        group.bench_with_input(BenchmarkId::from_parameter(len), &line, |b, line| {
            b.iter(|| {
                let mut table = KmerTable::new(max_k, CountMode::Positional);
                table.ingest(black_box(line));
                black_box(table.len())
            })
        });
    }

    group.finish();
}

fn bench_ingest_repeated(c: &mut Criterion) {
    let mut group = c.benchmark_group("KmerTable::ingest/warm");
    let line = "GATTACA".repeat(12);

    for k in [4, 8] {
        let mut table = KmerTable::new(MaxK::new(k).unwrap(), CountMode::Aggregate);
        table.ingest(line.as_bytes());

        group.bench_with_input(BenchmarkId::from_parameter(k), &line, |b, line| {
            b.iter(|| black_box(table.ingest(black_box(line.as_bytes()))))
        });
    }

    group.finish();
}

fn bench_directory_run_small(c: &mut Criterion) {
    let mut group = c.benchmark_group("DirectoryRunner::run");

    // A small directory of test files
    let dir = tempfile::tempdir().unwrap();
    for f in 0..4 {
        let mut contents = String::new();
        for i in 0..100 {
            contents.push_str(&format!(">seq{i}\n"));
            contents.push_str(&"ACGTACGTACGTACGTACGTACGTACGTACGT".repeat(2));
            contents.push('\n');
        }
        fs::write(dir.path().join(format!("reads{f}.fasta")), contents).unwrap();
    }

    for k in [2, 4, 8] {
        let config = Config::new(dir.path())
            .with_max_k(MaxK::new(k).unwrap())
            .with_output_mode(OutputMode::Combined);

        group.bench_with_input(BenchmarkId::from_parameter(k), &config, |b, config| {
            b.iter(|| DirectoryRunner::new(black_box(config.clone())).run().unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest_aggregate,
    bench_ingest_positional,
    bench_ingest_repeated,
    bench_directory_run_small,
);

criterion_main!(benches);
