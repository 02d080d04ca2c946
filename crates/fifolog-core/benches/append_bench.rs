use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fifolog_core::FifoLog;

struct Corpus<'a> {
    id: &'a str,
    bytes: &'a [u8],
}

fn corpora() -> Vec<Corpus<'static>> {
    // Keep corpora stable so runs stay comparable across revisions.
    const SENSOR_LINES: &[u8] = b"t=12345 ax=0.013 ay=-0.002 az=0.981 gx=1.2 gy=0.4 gz=-0.1\n";

    const BURST_NO_NEWLINE: &[u8] =
        b"........................................................................";

    const SHORT_LINES: &[u8] = b"ok\nok\nok\nok\nok\nok\nok\nok\nok\nok\nok\nok\nok\nok\n";

    vec![
        Corpus {
            id: "sensor_lines",
            bytes: SENSOR_LINES,
        },
        Corpus {
            id: "burst_no_newline",
            bytes: BURST_NO_NEWLINE,
        },
        Corpus {
            id: "short_lines",
            bytes: SHORT_LINES,
        },
    ]
}

/// Sustained appends into a buffer small enough that the scrolling policy
/// evicts continuously: the steady-state hot path of a live monitor.
fn bench_append_scrolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_scrolling");
    for corpus in corpora() {
        group.throughput(Throughput::Bytes(corpus.bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.id),
            corpus.bytes,
            |b, bytes| {
                let mut log = FifoLog::new(64 * 1024).unwrap();
                b.iter(|| {
                    log.append(black_box(bytes)).unwrap();
                    black_box(log.len());
                });
            },
        );
    }
    group.finish();
}

/// Appends into a large buffer that never reaches the threshold: pure copy
/// plus newline scanning, no eviction work.
fn bench_append_unpressured(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_unpressured");
    for corpus in corpora() {
        group.throughput(Throughput::Bytes(corpus.bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.id),
            corpus.bytes,
            |b, bytes| {
                let mut log = FifoLog::new(64 * 1024 * 1024).unwrap();
                b.iter(|| {
                    // Reset well before the 60% threshold so eviction never runs.
                    if log.len() > 16 * 1024 * 1024 {
                        log.clear();
                    }
                    log.append(black_box(bytes)).unwrap();
                    black_box(log.len());
                });
            },
        );
    }
    group.finish();
}

/// Full-range reads from a wrapped buffer: the view repainting everything.
fn bench_read_wrapped(c: &mut Criterion) {
    let mut log = FifoLog::new(64 * 1024).unwrap();
    let line = b"t=12345 ax=0.013 ay=-0.002 az=0.981 gx=1.2 gy=0.4 gz=-0.1\n";
    // Enough appends to wrap the ring several times.
    for _ in 0..10_000 {
        log.append(line).unwrap();
    }

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(log.len() as u64));
    group.bench_function("full_range_wrapped", |b| {
        b.iter(|| {
            let text = log.read(0, log.len()).unwrap();
            black_box(text.len());
        });
    });
    group.bench_function("line_lookup", |b| {
        let mid = log.len() / 2;
        b.iter(|| black_box(log.line_containing(black_box(mid))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_append_scrolling,
    bench_append_unpressured,
    bench_read_wrapped
);
criterion_main!(benches);
