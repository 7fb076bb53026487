//! Benchmarks for the netlist parsing pipeline.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use saffron_parser::{Lexer, LexerOptions, parse_netlist, spice_rules};

/// Build a synthetic RC ladder netlist with `stages` sections.
fn ladder(stages: usize) -> String {
    let mut text = String::from("RC Ladder Benchmark\n");
    for i in 0..stages {
        text.push_str(&format!("R{i} n{i} n{} 1k\n", i + 1));
        text.push_str(&format!("C{i} n{} 0 100n\n", i + 1));
        text.push_str(&format!("* stage {i}\n"));
    }
    text.push_str(".tran 1u 10m\n.end\n");
    text
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let rules = spice_rules();
    let lexer = Lexer::new(&rules, LexerOptions::default());

    for stages in [10, 100, 1000] {
        let text = ladder(stages);
        group.bench_with_input(BenchmarkId::from_parameter(stages), &text, |bencher, text| {
            bencher.iter(|| lexer.tokenize(black_box(text)).unwrap());
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_netlist");

    for stages in [10, 100, 1000] {
        let text = ladder(stages);
        group.bench_with_input(BenchmarkId::from_parameter(stages), &text, |bencher, text| {
            bencher.iter(|| parse_netlist(black_box(text)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_full_pipeline);
criterion_main!(benches);
