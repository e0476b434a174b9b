use criterion::{black_box, criterion_group, criterion_main, Criterion};
use minipas::{Evaluator, Lexer, Parser};

const PROGRAM: &str = r#"
    PROGRAM bench;
    VAR number, a, b, c : INTEGER;
    FUNCTION mix(x, y : INTEGER) : INTEGER;
    BEGIN
        mix := (x * 3 + y) / 2 - (x > y)
    END;
    BEGIN
        number := 2;
        a := number;
        b := 10 * a + 10 * number / 4;
        c := a - - b;
        d := mix(b, c) + mix(c, b) + mix(mix(a, b), number)
    END.
"#;

fn lexer_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize program", |b| {
        b.iter(|| Lexer::from_source(black_box(PROGRAM)).tokenize().unwrap())
    });
}

fn parser_benchmark(c: &mut Criterion) {
    c.bench_function("parse program", |b| {
        b.iter(|| {
            Parser::new(Lexer::from_source(black_box(PROGRAM)))
                .parse()
                .unwrap()
        })
    });
}

fn evaluator_benchmark(c: &mut Criterion) {
    let program = Parser::new(Lexer::from_source(PROGRAM)).parse().unwrap();
    let mut evaluator = Evaluator::new();

    c.bench_function("evaluate program", |b| {
        b.iter(|| evaluator.evaluate(black_box(&program)).unwrap())
    });
}

criterion_group!(
    benches,
    lexer_benchmark,
    parser_benchmark,
    evaluator_benchmark
);
criterion_main!(benches);
