use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_tesql::{
    documents_from_str, from_document, from_str, to_document, to_string, Section, Value,
};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    notes: String,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn nested() -> NestedData {
    NestedData {
        id: 42,
        notes: "first line\n\nthird line\n    indented".to_string(),
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    }
}

fn flat_section(size: usize) -> Value {
    let mut section = Section::new("Settings");
    for i in 0..size {
        section
            .append(&format!("key{}", i), format!("value number {}", i), true)
            .unwrap();
    }
    Value::Section(section)
}

fn benchmark_to_document(c: &mut Criterion) {
    let user = user();
    c.bench_function("to_document_simple", |b| {
        b.iter(|| to_document("User", black_box(&user)))
    });

    let nested = nested();
    c.bench_function("to_document_nested", |b| {
        b.iter(|| to_document("Data", black_box(&nested)))
    });
}

fn benchmark_from_document(c: &mut Criterion) {
    let doc = to_document("Data", &nested()).unwrap();
    c.bench_function("from_document_nested", |b| {
        b.iter(|| from_document::<NestedData>(black_box(&doc)))
    });
}

fn benchmark_encode_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_flat");

    for size in [10, 50, 100, 500].iter() {
        let value = flat_section(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| to_string(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_decode_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_flat");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&flat_section(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_document_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_stream");

    for size in [10, 100].iter() {
        let mut text = String::new();
        for i in 0..*size {
            let doc = to_document(&format!("Data{}", i), &nested()).unwrap();
            text.push_str(&to_string(&doc).unwrap());
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| documents_from_str(black_box(text)).count())
        });
    }
    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let user = user();

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let text = to_string(&to_document("User", black_box(&user)).unwrap()).unwrap();
            let doc = from_str(black_box(&text)).unwrap();
            let _user: User = from_document(&doc).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_to_document,
    benchmark_from_document,
    benchmark_encode_flat,
    benchmark_decode_flat,
    benchmark_document_stream,
    benchmark_roundtrip
);
criterion_main!(benches);
