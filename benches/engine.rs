//! Engine benchmarks.
//!
//! ```bash
//! cargo bench
//! cargo bench check_uncached
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grammarchk::{AnalysisOptions, EngineConfig, GrammarEngine, TextAnalyzer};

const SAMPLE: &str = "Вчера я иду в магазин. Он сказал что придёт, а она ушла. \
Москва столица России. Красивый девочка читаит книгу, которую купила мама. \
Когда мы пришли домой мы пили чай. Это было очень очень давно. ";

fn document(paragraphs: usize) -> String {
    (0..paragraphs).map(|_| SAMPLE).collect::<Vec<_>>().join("\n\n")
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_uncached");
    for paragraphs in [1, 10, 50] {
        let text = document(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));

        for parallel in [false, true] {
            let engine = GrammarEngine::new(EngineConfig {
                parallel,
                cache_size: 0,
                ..Default::default()
            });
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, paragraphs), &text, |b, text| {
                b.iter(|| engine.check(black_box(text)))
            });
        }
    }
    group.finish();
}

fn bench_builtin(c: &mut Criterion) {
    let engine = GrammarEngine::default();
    let text = document(10);
    c.bench_function("check_grammar_builtin", |b| b.iter(|| engine.check_grammar(black_box(&text))));
}

fn bench_cached(c: &mut Criterion) {
    let engine = GrammarEngine::default();
    let text = document(10);
    engine.check(&text);
    c.bench_function("check_cached", |b| b.iter(|| engine.check(black_box(&text))));
}

fn bench_metrics(c: &mut Criterion) {
    let analyzer = TextAnalyzer::new(0);
    let text = format!("<p>{}</p>", document(20).replace("\n\n", "</p><p>"));
    let options = AnalysisOptions::default();
    c.bench_function("analyze_text", |b| b.iter(|| analyzer.analyze_text(black_box(&text), &options)));
}

criterion_group!(benches, bench_check, bench_builtin, bench_cached, bench_metrics);
criterion_main!(benches);
