use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::{tokenize, StopWords};

fn bench_tokenize(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog, then keeps running \
                through orange groves and banana plantations until morning. "
        .repeat(128);
    let stopwords = StopWords::from_lines("the\nand\nover\nthen\nuntil\n");
    c.bench_function("tokenize_body", |b| b.iter(|| tokenize(&text, &stopwords)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
