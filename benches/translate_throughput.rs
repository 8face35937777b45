//! Benchmark suite for Avro schema translation
//!
//! This benchmark measures `from_json` on:
//! - Flat records of increasing width
//! - Records nested through arrays, maps and optional unions
//! - Recursive records that close cycles through the registry
//!
//! # Configuration
//!
//! Benchmark behavior can be configured via environment variables:
//!
//! - `BENCH_SAMPLE_SIZE`: Number of samples to collect (default: 100)
//! - `BENCH_MEASUREMENT_TIME`: Measurement time in seconds (default: 5)
//!
//! # Examples
//!
//! ```bash
//! BENCH_SAMPLE_SIZE=50 BENCH_MEASUREMENT_TIME=3 cargo bench
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::hint::black_box;
use std::time::Duration;

use avro_connect::from_json;

const PRIMITIVES: [&str; 7] = ["boolean", "int", "long", "float", "double", "bytes", "string"];

/// Configure Criterion based on environment variables
fn configure_criterion() -> Criterion {
    let mut criterion = Criterion::default();

    if let Ok(sample_size) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(size) = sample_size.parse::<usize>() {
            criterion = criterion.sample_size(size);
        } else {
            eprintln!("Warning: Invalid BENCH_SAMPLE_SIZE value: {}", sample_size);
        }
    }

    if let Ok(measurement_time) = std::env::var("BENCH_MEASUREMENT_TIME") {
        if let Ok(secs) = measurement_time.parse::<u64>() {
            criterion = criterion.measurement_time(Duration::from_secs(secs));
        } else {
            eprintln!(
                "Warning: Invalid BENCH_MEASUREMENT_TIME value: {}",
                measurement_time
            );
        }
    }

    criterion
}

/// A record with `width` primitive fields, every third one optional.
fn flat_record(width: usize) -> String {
    let fields: Vec<Value> = (0..width)
        .map(|i| {
            let primitive = PRIMITIVES[i % PRIMITIVES.len()];
            let field_type = if i % 3 == 0 {
                json!(["null", primitive])
            } else {
                json!(primitive)
            };
            json!({"name": format!("f{}", i), "type": field_type})
        })
        .collect();
    json!({"type": "record", "name": "Flat", "namespace": "bench", "fields": fields}).to_string()
}

/// Records nested `depth` levels deep, alternating arrays, maps and unions.
fn nested_record(depth: usize) -> String {
    let mut inner = json!({"type": "record", "name": "Leaf", "fields": [
        {"name": "id", "type": "long"},
        {"name": "label", "type": "string", "default": ""}
    ]});
    for level in 0..depth {
        let wrapped = match level % 3 {
            0 => json!({"type": "array", "items": inner}),
            1 => json!({"type": "map", "values": inner}),
            _ => json!(["null", inner]),
        };
        inner = json!({"type": "record", "name": format!("Level{}", level), "fields": [
            {"name": "value", "type": wrapped},
            {"name": "count", "type": "int", "default": 0}
        ]});
    }
    json!({"type": "record", "name": "Nested", "fields": [{"name": "root", "type": inner}]})
        .to_string()
}

/// A tree node record referring to itself through an array, a map and a union.
fn recursive_record() -> String {
    json!({"type": "record", "name": "Node", "namespace": "bench", "fields": [
        {"name": "label", "type": "string"},
        {"name": "children", "type": {"type": "array", "items": "Node"}},
        {"name": "index", "type": {"type": "map", "values": "bench.Node"}},
        {"name": "parent", "type": ["null", "Node"], "default": null}
    ]})
    .to_string()
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_record");

    for width in [8, 64, 512] {
        let json = flat_record(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &json, |b, json| {
            b.iter(|| from_json(black_box(json)).unwrap())
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_record");

    for depth in [4, 16, 64] {
        let json = nested_record(depth);
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &json, |b, json| {
            b.iter(|| from_json(black_box(json)).unwrap())
        });
    }

    group.finish();
}

fn bench_recursive(c: &mut Criterion) {
    let json = recursive_record();
    c.bench_function("recursive_record", |b| {
        b.iter(|| from_json(black_box(&json)).unwrap())
    });
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_flat, bench_nested, bench_recursive
}

criterion_main!(benches);
