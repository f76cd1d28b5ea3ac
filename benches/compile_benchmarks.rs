//! Benchmarks for the semantic passes.
//!
//! Each workload is a synthetic declaration tree built in memory, so only
//! semantic analysis is measured:
//! - Size-based: 10 to 1000 namespaces of structs, enums and interfaces
//! - Feature-specific: struct chains for the cycle detector, wide
//!   interface hierarchies for the member validator, classes for synthesis
//! - Imported: references resolved through a loaded metadata cache
//!
//! ```bash
//! cargo bench --bench compile_benchmarks -- "size/"
//! ```

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use xidl::ast::{
    ClassDecl, CompilationUnitDecl, ConstructorDecl, EnumDecl, EventDecl, InterfaceDecl,
    MethodDecl, NamespaceDecl, PropertyDecl, StructDecl,
};
use xidl::core::ImportedCategory;
use xidl::{Compiler, CompilerConfig, CompilerOptions, MetadataDatabase};

// ============================================================================
// Workloads
// ============================================================================

/// One namespace with a struct pair, an enum and an interface/class pair.
fn namespace(index: usize) -> NamespaceDecl {
    let line = (index * 40) as u32;
    let name = format!("Ns{index}");

    let mut color = EnumDecl::new("Color", line + 1);
    for (offset, member) in ["Red", "Green", "Blue", "Alpha"].into_iter().enumerate() {
        let value = (offset == 2).then_some("10");
        color = color.member(member, line + 2 + offset as u32, value);
    }

    NamespaceDecl::new(name, line)
        .with(color)
        .with(
            StructDecl::new("Point", line + 10)
                .field("X", line + 11, "Double")
                .field("Y", line + 12, "Double"),
        )
        .with(
            StructDecl::new("Rect", line + 13)
                .field("Origin", line + 14, "Point")
                .field("Extent", line + 15, "Point"),
        )
        .with(
            InterfaceDecl::new("IShape", line + 20)
                .with(MethodDecl::new("Area", line + 21).returns("Double"))
                .with(MethodDecl::new("Bounds", line + 22).returns("Rect"))
                .with(PropertyDecl::new("Fill", line + 23, "Color")),
        )
        .with(
            ClassDecl::new("Shape", line + 30)
                .with(MethodDecl::new("Draw", line + 31).with_param("area", "Rect"))
                .with(PropertyDecl::new("Name", line + 32, "String"))
                .with(MethodDecl::new("Empty", line + 33).with_static().returns("Shape"))
                .with(ConstructorDecl::new(line + 34).with_param("name", "String")),
        )
}

fn sized_unit(namespaces: usize) -> CompilationUnitDecl {
    (0..namespaces)
        .map(namespace)
        .fold(CompilationUnitDecl::new(), CompilationUnitDecl::with_namespace)
}

/// A chain of structs each holding the next; the last points at the first.
fn struct_chain(length: usize) -> CompilationUnitDecl {
    let mut ns = NamespaceDecl::new("Chain", 1);
    for i in 0..length {
        let next = format!("S{}", (i + 1) % length);
        ns = ns.with(StructDecl::new(format!("S{i}"), i as u32 + 2).field("next", i as u32 + 2, next));
    }
    CompilationUnitDecl::new().with_namespace(ns)
}

/// Interfaces each requiring every earlier one, ending in a class.
fn interface_ladder(depth: usize) -> CompilationUnitDecl {
    let mut ns = NamespaceDecl::new("Ladder", 1);
    for i in 0..depth {
        let mut interface = InterfaceDecl::new(format!("I{i}"), i as u32 * 3 + 2)
            .with(MethodDecl::new(format!("M{i}"), i as u32 * 3 + 3).returns("Int32"));
        for base in 0..i {
            interface = interface.requires(format!("I{base}"));
        }
        ns = ns.with(interface);
    }
    let mut class = ClassDecl::new("Top", depth as u32 * 3 + 2);
    for i in 0..depth {
        class = class
            .requires(format!("I{i}"))
            .with(MethodDecl::new(format!("M{i}"), depth as u32 * 3 + 3).returns("Int32"));
    }
    CompilationUnitDecl::new().with_namespace(ns.with(class))
}

fn imported_unit(count: usize) -> (CompilationUnitDecl, Arc<MetadataDatabase>) {
    let mut database = MetadataDatabase::new("Foundation");
    let mut ns = NamespaceDecl::new("App", 1);
    for i in 0..count {
        database = database
            .with_type(&format!("Foundation.IThing{i}"), ImportedCategory::Interface)
            .with_type(&format!("Foundation.Handler{i}"), ImportedCategory::Delegate);
        ns = ns.with(
            InterfaceDecl::new(format!("IUse{i}"), i as u32 + 2)
                .requires(format!("Foundation.IThing{i}"))
                .with(EventDecl::new("Changed", i as u32 + 2, format!("Foundation.Handler{i}"))),
        );
    }
    (CompilationUnitDecl::new().with_namespace(ns), Arc::new(database))
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("size");
    let compiler = Compiler::new(CompilerConfig::new());

    for namespaces in [10, 100, 1000] {
        let unit = sized_unit(namespaces);
        group.throughput(Throughput::Elements(namespaces as u64));
        group.bench_with_input(BenchmarkId::from_parameter(namespaces), &unit, |b, unit| {
            b.iter(|| {
                let compilation = compiler.compile(black_box(unit));
                black_box(compilation.has_errors())
            })
        });
    }

    group.finish();
}

fn bench_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("features");

    let chain = struct_chain(500);
    group.bench_function("struct_cycle_500", |b| {
        let compiler = Compiler::new(CompilerConfig::new().with_synthesis(false));
        b.iter(|| black_box(compiler.compile(black_box(&chain))))
    });

    let ladder = interface_ladder(40);
    group.bench_function("member_validation_ladder_40", |b| {
        let compiler = Compiler::new(CompilerConfig::new());
        b.iter(|| black_box(compiler.compile(black_box(&ladder))))
    });

    let unit = sized_unit(200);
    group.bench_function("without_checks_200", |b| {
        let compiler = Compiler::new(
            CompilerConfig::new()
                .with_member_validation(false)
                .with_synthesis(false),
        );
        b.iter(|| black_box(compiler.compile(black_box(&unit))))
    });

    group.finish();
}

fn bench_imported(c: &mut Criterion) {
    let mut group = c.benchmark_group("imported");
    let (unit, database) = imported_unit(500);

    group.bench_function("load_and_compile_500", |b| {
        b.iter(|| {
            let session = CompilerOptions::new()
                .with_metadata_source(database.clone())
                .build()
                .unwrap();
            black_box(session.compile(black_box(&unit)))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_size, bench_features, bench_imported);
criterion_main!(benches);
