//! Lexer benchmarks.
//!
//! Run with: `cargo bench --bench lexer_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pscc_lex::Lexer;
use pscc_util::Handler;

const SAMPLE_PROGRAM: &str = r#"
program sample;
type
    vector = record
        x, y, z: real;
    end;
var
    i, total: integer;
    v: vector;
begin
    total := 0;
    for i := 1 to 100 do
    begin
        total := total + i;
        if total > 1000 then
            writeln(total)
        else
            write(total);
    end;
end.
"#;

fn lex_all(source: &str) -> usize {
    let mut handler = Handler::new();
    let lexer = Lexer::new(source, &mut handler);
    lexer.count()
}

fn bench_lex_sample_program(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_sample_program");
    group.throughput(Throughput::Bytes(SAMPLE_PROGRAM.len() as u64));
    group.bench_function("tokenize", |b| {
        b.iter(|| black_box(lex_all(SAMPLE_PROGRAM)))
    });
    group.finish();
}

fn bench_lex_identifiers(c: &mut Criterion) {
    let source = "abcdefgh ".repeat(200);
    let mut group = c.benchmark_group("lex_identifiers");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tokenize", |b| b.iter(|| black_box(lex_all(&source))));
    group.finish();
}

fn bench_lex_numbers(c: &mut Criterion) {
    let source = "123 3.14 2.5e-3 ".repeat(200);
    let mut group = c.benchmark_group("lex_numbers");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tokenize", |b| b.iter(|| black_box(lex_all(&source))));
    group.finish();
}

fn bench_lex_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_varying_sizes");
    for &reps in &[10, 100, 1000] {
        let source = "x := x + 1; ".repeat(reps);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", reps), &source, |b, s| {
            b.iter(|| black_box(lex_all(s)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lex_sample_program,
    bench_lex_identifiers,
    bench_lex_numbers,
    bench_lex_varying_sizes,
);
criterion_main!(benches);
