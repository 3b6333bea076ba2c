use std::fmt::Write;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lunac::syntax::{lexer::Lexer, parse_source, print_program};

struct Corpus {
    name: &'static str,
    source: String,
}

fn build_trigger_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..1_500usize {
        let _ = writeln!(src, "function InitTrig_{i}()");
        let _ = writeln!(src, "    local trig = CreateTrigger()");
        let _ = writeln!(src, "    TriggerRegisterTimerEvent(trig, {}.0, true)", i % 60);
        let _ = writeln!(
            src,
            "    TriggerAddAction(trig, function() if GetUnitState(u_{i}, 0) > {i} then KillUnit(u_{i}) end end)"
        );
        let _ = writeln!(src, "end");
    }

    src
}

fn build_table_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..3_000usize {
        let _ = writeln!(
            src,
            "local unit_{i} = {{ id = \"h{:03}\", hp = {}, armor = {}.5, tags = {{ \"a\", \"b\" }}, [{i}] = true }}",
            i % 1000,
            i * 10,
            i % 7
        );
    }

    src
}

fn build_comment_corpus() -> String {
    let mut src = String::with_capacity(256_000);

    for i in 0..3_000usize {
        let _ = writeln!(src, "-- line comment {i}");
        let _ = writeln!(src, "x_{i} = {i} -- trailing");
        let _ = writeln!(src, "--[[ block comment {} {} ]]", i, i + 1);
    }

    src
}

fn build_corpora() -> Vec<Corpus> {
    vec![
        Corpus {
            name: "triggers",
            source: build_trigger_corpus(),
        },
        Corpus {
            name: "tables",
            source: build_table_corpus(),
        },
        Corpus {
            name: "comments",
            source: build_comment_corpus(),
        },
    ]
}

fn bench_tokenize(c: &mut Criterion) {
    let corpora = build_corpora();
    let mut group = c.benchmark_group("lexer/tokenize");

    for corpus in &corpora {
        let input = corpus.source.as_str();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(corpus.name), input, |b, input| {
            b.iter(|| black_box(Lexer::new(black_box(input)).tokenize().len()));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let corpora = build_corpora();
    let mut group = c.benchmark_group("parser/parse_source");

    for corpus in &corpora {
        let input = corpus.source.as_str();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(corpus.name), input, |b, input| {
            b.iter(|| {
                let program = parse_source(black_box(input));
                black_box(program.map(|p| p.statements.len()).unwrap_or(0));
            });
        });
    }

    group.finish();
}

fn bench_print(c: &mut Criterion) {
    let corpora = build_corpora();
    let mut group = c.benchmark_group("printer/print_program");

    for corpus in &corpora {
        let Ok(program) = parse_source(&corpus.source) else {
            continue;
        };
        group.bench_function(BenchmarkId::from_parameter(corpus.name), |b| {
            b.iter(|| black_box(print_program(black_box(&program)).len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_print);
criterion_main!(benches);
