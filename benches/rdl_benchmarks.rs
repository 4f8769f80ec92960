use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rdl_core::{analyze, overlay::Overlay, parse_service, parser::Parser, Format};

// ============================================================================
// Test Data: Varying Complexity and Size
// ============================================================================

const SMALL_SPEC: &str = "\
name: Notes
resources:
  - name: Notes
    operations: [Create, Read]
    fields:
      - name: body
        type: String
        operations: [Create, Read]
";

const MEDIUM_SPEC: &str = "\
name: Shop
enums:
  - name: OrderStatus
    values:
      - name: Pending
      - name: Shipped
objects:
  - name: Address
    fields:
      - name: street
        type: String
      - name: zip
        type: String
        modifiers: [Nullable]
resources:
  - name: Customers
    operations: [Create, Read, Update, Delete]
    fields:
      - name: email
        type: String
        operations: [Create, Read]
      - name: shipping
        type: Address
        operations: [Create, Read, Update]
  - name: Orders
    operations: [Create, Read]
    fields:
      - name: status
        type: OrderStatus
        operations: [Read]
      - name: placedAt
        type: Timestamp
        operations: [Read]
";

/// A service with `count` resources, each referencing a shared nested object.
fn generate_spec(count: usize) -> String {
    let mut spec = String::from(
        "name: Generated\nobjects:\n  - name: Location\n    fields:\n      - name: lat\n        type: Int\n      - name: label\n        type: String\nresources:\n",
    );
    for i in 0..count {
        spec.push_str(&format!(
            "  - name: Resource{i}\n    operations: [Create, Read, Update, Delete]\n    fields:\n      - name: title\n        type: String\n        operations: [Create, Read, Update]\n      - name: at\n        type: Location\n        modifiers: [Nullable]\n        operations: [Create, Read]\n"
        ));
    }
    spec
}

// ============================================================================
// Position Parser Benchmarks
// ============================================================================

fn bench_parser_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_parser_by_size");

    for (name, source) in [("small", SMALL_SPEC), ("medium", MEDIUM_SPEC)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| Parser::new(black_box(src)).parse_document())
        });
    }

    group.finish();
}

// ============================================================================
// Expansion Benchmarks
// ============================================================================

fn bench_expansion_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion_resource_scaling");
    let overlay = Overlay::new();

    for size in [1, 10, 50, 100] {
        let source = generate_spec(size);
        let service = parse_service(&source, "generated.yaml", Format::Yaml).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &service, |b, service| {
            b.iter(|| overlay.expand(black_box(service)))
        });
    }

    group.finish();
}

// ============================================================================
// End-to-End Analysis Benchmarks
// ============================================================================

fn bench_e2e_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("e2e_analysis");

    for (name, source) in [("small", SMALL_SPEC), ("medium", MEDIUM_SPEC)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| analyze(black_box(src), "benchmark.yaml"))
        });
    }

    group.finish();
}

fn bench_e2e_with_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("e2e_with_json_serialization");

    for (name, source) in [("small", SMALL_SPEC), ("medium", MEDIUM_SPEC)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let result = analyze(black_box(src), "benchmark.yaml").unwrap();
                result.to_json()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_sizes,
    bench_expansion_scaling,
    bench_e2e_analysis,
    bench_e2e_with_serialization
);
criterion_main!(benches);
