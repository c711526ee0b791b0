//! Benchmarks for each stage of the pipeline.
//!
//! - Parsing the scripts in `test_scripts/`
//! - Parsing and compiling straight through the compiler API
//! - Building a [`Unit`] end to end
//! - Executing the generated code on the reference interpreter
//!
//! Run with the `profile-with-puffin` feature to print per-pass timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- "unit/"
//! ```

use bumpalo::Bump;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use tau::{Compiler, Parser, Unit, Vm, VmConfig};

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

#[cfg(feature = "profile-with-puffin")]
fn collect_scopes(
    stream: &puffin::Stream,
    scope: &puffin::Scope,
    scopes: &puffin::ScopeCollection,
    totals: &mut HashMap<String, i64>,
) {
    use puffin::Reader;

    if let Some(details) = scopes.fetch_by_id(&scope.id) {
        *totals.entry(details.name().to_string()).or_insert(0) += scope.record.duration_ns;
    }
    if scope.child_begin_position >= scope.child_end_position {
        return;
    }
    let Ok(reader) = Reader::with_offset(stream, scope.child_begin_position) else {
        return;
    };
    if let Ok(children) = reader.read_top_scopes() {
        for child in children {
            collect_scopes(stream, &child, scopes, totals);
        }
    }
}

/// Print the average time spent in each profiled pass.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let scopes = view.scope_collection();

    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut frames = 0i64;
    for frame in view.recent_frames() {
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        frames += 1;
        for (_, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            if let Ok(top) = reader.read_top_scopes() {
                for scope in top {
                    collect_scopes(&stream_info.stream, &scope, scopes, &mut totals);
                }
            }
        }
    }

    println!("\n=== Pass timings ({frames} frames) ===");
    let mut entries: Vec<_> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        let avg = ns / frames.max(1);
        println!(
            "  {name:30} {:>10.2?}",
            std::time::Duration::from_nanos(avg as u64)
        );
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

const SCRIPTS: [(&str, &str); 5] = [
    ("hello", include_str!("../test_scripts/hello.tau")),
    ("factorial", include_str!("../test_scripts/factorial.tau")),
    ("short_circuit", include_str!("../test_scripts/short_circuit.tau")),
    ("arrays", include_str!("../test_scripts/arrays.tau")),
    ("loops", include_str!("../test_scripts/loops.tau")),
];

/// A program with `count` small functions, each calling the previous one.
fn generated_program(count: usize) -> String {
    let mut source = String::from("func f0(n: int): int { return n + 1 }\n");
    for i in 1..count {
        let _ = writeln!(
            source,
            "func f{i}(n: int): int {{
                var a: [4]int
                var k: int
                k = 0
                while k < 4 and n > 0 {{
                    a[k] = n * k + k
                    k = k + 1
                }}
                if a[1] > 10 or not (n == 3) {{ return a[0] }} else {{ return f{prev}(n) }}
            }}",
            prev = i - 1
        );
    }
    let _ = writeln!(source, "func main(): void {{ print f{}(3) }}", count - 1);
    source
}

fn parser_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    for (name, source) in SCRIPTS {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let arena = Bump::new();
                let program = Parser::parse(black_box(source), &arena).unwrap();
                black_box(program.functions.len())
            });
        });
    }

    let stress = generated_program(500);
    group.throughput(Throughput::Bytes(stress.len() as u64));
    group.bench_function("stress_500_functions", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = Parser::parse(black_box(&stress), &arena).unwrap();
            black_box(program.functions.len())
        });
    });
    group.finish();
}

fn compiler_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("unit");
    for (name, source) in SCRIPTS {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut unit = Unit::new();
                unit.add_source("bench.tau", black_box(source));
                let compiled = unit.build().unwrap();
                end_profiling_frame();
                black_box(compiled.instructions.len())
            });
        });
    }

    let stress = generated_program(500);
    group.throughput(Throughput::Bytes(stress.len() as u64));
    group.bench_function("stress_500_functions", |b| {
        b.iter(|| {
            let mut unit = Unit::new();
            unit.add_source("stress.tau", black_box(stress.as_str()));
            let compiled = unit.build().unwrap();
            end_profiling_frame();
            black_box(compiled.instructions.len())
        });
    });
    group.finish();

    print_profiling_stats();

    // Parser and passes without the unit's source bookkeeping.
    let mut group = c.benchmark_group("compiler");
    group.bench_function("stress_500_functions", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let program = Parser::parse(black_box(&stress), &arena).unwrap();
            let compiled = Compiler::compile(program, &arena).unwrap();
            black_box(compiled.instructions.len())
        });
    });
    group.finish();
}

fn vm_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm");
    for (name, source) in SCRIPTS {
        let mut unit = Unit::new();
        unit.add_source("bench.tau", source);
        let compiled = unit.build().unwrap();

        group.bench_function(name, |b| {
            b.iter(|| {
                let mut vm = Vm::new(black_box(&compiled.instructions), VmConfig::default())
                    .unwrap();
                vm.run().unwrap();
                black_box(vm.steps())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, parser_benchmarks, compiler_benchmarks, vm_benchmarks);
criterion_main!(benches);
