//! Benchmarks for module descriptor decoding and encoding.
//!
//! Measures the codec hot paths over a representative record:
//! - Decoding the fixed head only (what attribute discovery pays)
//! - Decoding plus a full relation-table parse (first sequence access)
//! - Re-encoding a decoded record over the shared symbol table

extern crate moddesc;

use criterion::{criterion_group, criterion_main, Criterion};
use moddesc::{ModuleAttribute, ModuleAttributeBuilder, SymbolTable};
use std::hint::black_box;

/// A record with a few entries in every relation table.
fn sample_payload(symbols: &SymbolTable) -> Vec<u8> {
    let mut builder = ModuleAttributeBuilder::new(symbols);
    builder
        .module_name("com.example.benchmark")
        .module_flags(0x0020)
        .module_version(Some("17.0.2"))
        .requires("java.base", 0x8000, None)
        .requires("java.logging", 0, None)
        .requires("java.sql", 0x0020, Some("21"))
        .exports("com/example/benchmark/api", 0, &[])
        .exports("com/example/benchmark/spi", 0, &["com.example.plugin"])
        .opens("com/example/benchmark/impl", 0, &["com.example.test"]);
    builder.uses("com/example/benchmark/spi/Handler").unwrap();
    builder
        .provides(
            "com/example/benchmark/spi/Handler",
            &[
                "com/example/benchmark/DefaultHandler",
                "com/example/benchmark/AsyncHandler",
            ],
        )
        .unwrap();
    builder.build().unwrap().encode(symbols).unwrap()
}

/// Benchmark decoding only the fixed head, leaving the tables unparsed.
fn bench_decode_head(c: &mut Criterion) {
    let symbols = SymbolTable::new();
    let payload = sample_payload(&symbols);

    c.bench_function("decode_head", |b| {
        b.iter(|| {
            let record = ModuleAttribute::decode(black_box(&payload), &symbols).unwrap();
            black_box(record.module_flags_mask())
        });
    });
}

/// Benchmark decoding plus the single full table parse.
fn bench_decode_full(c: &mut Criterion) {
    let symbols = SymbolTable::new();
    let payload = sample_payload(&symbols);

    c.bench_function("decode_full", |b| {
        b.iter(|| {
            let record = ModuleAttribute::decode(black_box(&payload), &symbols).unwrap();
            black_box(record.provides().unwrap().len())
        });
    });
}

/// Benchmark re-encoding a decoded record over the shared symbol table.
fn bench_encode(c: &mut Criterion) {
    let symbols = SymbolTable::new();
    let payload = sample_payload(&symbols);
    let record = ModuleAttribute::decode(&payload, &symbols).unwrap();
    record.requires().unwrap();

    c.bench_function("encode_shared_table", |b| {
        b.iter(|| {
            let bytes = black_box(&record).encode(&symbols).unwrap();
            black_box(bytes)
        });
    });
}

criterion_group!(benches, bench_decode_head, bench_decode_full, bench_encode);
criterion_main!(benches);
