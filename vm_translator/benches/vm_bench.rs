//! VM translator benchmarks.
//!
//! Codegen dominates the cost of translation, so these benchmarks focus
//! on full-pipeline throughput across representative programs rather
//! than micro-benchmarking individual token lookups.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use vm_translator::driver::{translate_directory, translate_single_file, Module};
use vm_translator::parser::ParserLines;

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let src = lines(
        "push constant 7\n\
         push constant 8\n\
         add\n\
         pop local 0\n\
         push local 0\n\
         push constant 1\n\
         eq\n\
         if-goto END\n\
         goto START\n\
         label START\n\
         label END\n",
    );

    group.throughput(Throughput::Elements(src.len() as u64));
    group.bench_function("tokenize_mixed_program", |b| {
        b.iter(|| {
            let mut parser = ParserLines::new(black_box(&src), "Bench");
            while parser.advance() {
                black_box(parser.command().unwrap());
            }
        });
    });

    group.finish();
}

fn bench_arithmetic_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");

    let arithmetic = Module {
        name: "Arith".to_string(),
        lines: lines(
            "push constant 1\npush constant 2\nadd\npush constant 3\nsub\n\
             push constant 4\neq\npush constant 5\ngt\npush constant 6\nlt\n",
        ),
    };
    group.throughput(Throughput::Elements(arithmetic.lines.len() as u64));
    group.bench_function("single_file_arithmetic", |b| {
        b.iter(|| black_box(translate_single_file(black_box(&arithmetic)).unwrap()));
    });

    let call_heavy = Module {
        name: "Calls".to_string(),
        lines: lines(
            "function Calls.a 1\n\
             push argument 0\n\
             push constant 1\n\
             add\n\
             call Calls.b 1\n\
             return\n\
             function Calls.b 1\n\
             push argument 0\n\
             return\n",
        ),
    };
    group.throughput(Throughput::Elements(call_heavy.lines.len() as u64));
    group.bench_function("single_file_calls", |b| {
        b.iter(|| black_box(translate_single_file(black_box(&call_heavy)).unwrap()));
    });

    group.finish();
}

fn bench_directory_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory_pipeline");

    let sys = Module {
        name: "Sys".to_string(),
        lines: lines("function Sys.init 0\ncall Main.f 0\npop temp 0\nlabel HALT\ngoto HALT\n"),
    };
    let main = Module {
        name: "Main".to_string(),
        lines: lines("function Main.f 0\npush constant 42\nreturn\n"),
    };
    let modules = vec![sys, main];

    group.throughput(Throughput::Elements(
        modules.iter().map(|m| m.lines.len()).sum::<usize>() as u64,
    ));
    group.bench_function("two_module_bootstrap", |b| {
        b.iter(|| black_box(translate_directory(black_box(&modules)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parser,
    bench_arithmetic_codegen,
    bench_directory_pipeline,
);

criterion_main!(benches);
