//! Criterion benchmarks for rust_slog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_slog::core::interpolate::write_message;
use rust_slog::prelude::*;
use rust_slog::{COMPACT_FORMAT, DEFAULT_FORMAT};
use std::sync::Arc;

fn discard_logger(level: Level, template: &str) -> Arc<Logger> {
    Arc::new(
        Logger::builder()
            .handler(Handler::new(level, Formatter::parse(template)).with_sink(DiscardSink::new()))
            .build(),
    )
}

// ============================================================================
// Template Compilation Benchmarks
// ============================================================================

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for (name, template) in [
        ("default", DEFAULT_FORMAT),
        ("compact", COMPACT_FORMAT),
        ("long_literal", "service=api region=eu-west-1 host=web-42 | %D %T | %l | %m"),
        ("unknown_verbs", "%x %y %z %% %l %m"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), template, |b, template| {
            b.iter(|| black_box(Formatter::parse(black_box(template))));
        });
    }

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let default = Formatter::default_format();
    let message_only = Formatter::parse("%m");
    let mut buf = Vec::with_capacity(256);

    group.bench_function("default_format", |b| {
        b.iter(|| {
            buf.clear();
            let record = Record::new(Level::Info, "request %s took %dms", &[&"GET /", &12]);
            default.format(black_box(&record), &mut buf);
            black_box(buf.len())
        });
    });

    group.bench_function("message_only", |b| {
        b.iter(|| {
            buf.clear();
            let record = Record::new(Level::Info, "plain message without arguments", &[]);
            message_only.format(black_box(&record), &mut buf);
            black_box(buf.len())
        });
    });

    group.bench_function("interpolate_padded", |b| {
        b.iter(|| {
            buf.clear();
            write_message(&mut buf, black_box("[%-8s] %08d %.3v"), &[&"worker", &42, &3.14159]);
            black_box(buf.len())
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(Level::Error, DEFAULT_FORMAT);
    let dispatcher = Dispatcher::with_logger(logger.clone());

    group.bench_function("disabled_level_dispatcher", |b| {
        b.iter(|| dispatcher.debugf(black_box("value %d"), &[&black_box(7)]));
    });

    group.bench_function("disabled_level_logger", |b| {
        b.iter(|| logger.debugf(black_box("value %d"), &[&black_box(7)]));
    });

    group.bench_function("enabled_level_dispatcher", |b| {
        b.iter(|| dispatcher.errorf(black_box("value %d"), &[&black_box(7)]));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let logger = discard_logger(Level::Info, DEFAULT_FORMAT);
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                logger.infof("thread %d message %d", &[&t, &i]);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_render, bench_dispatch, bench_concurrent);
criterion_main!(benches);
