use std::io::Write;
use std::sync::Arc;

use grammarchk::rules::orthography::SibilantVowelRule;
use grammarchk::{
    merge_results, AnalysisCache, AnalysisOptions, EngineConfig, ErrorSource, GrammarEngine, GrammarError,
    GrammarRule, RuleRegistry, Severity, SpellingError, TextAnalyzer,
};

fn engine() -> GrammarEngine {
    GrammarEngine::new(EngineConfig {
        parallel: false,
        ..Default::default()
    })
}

fn chars(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

#[test]
fn test_sibilant_spelling() {
    let errors = SibilantVowelRule.check("жызнь");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].text, "жы");
    assert_eq!((errors[0].start, errors[0].end), (0, 2));
    assert_eq!(errors[0].suggestions, vec!["жи"]);

    let result = engine().check("жызнь");
    let sibilant: Vec<&GrammarError> = result.errors.iter().filter(|e| e.rule_id == "sibilant_vowel").collect();
    assert_eq!(sibilant.len(), 1);
    assert_eq!(sibilant[0].suggestions, vec!["жи"]);
}

#[test]
fn test_comma_before_chto() {
    let text = "Он сказал что придёт";
    let result = engine().check(text);
    assert!(result
        .errors
        .iter()
        .any(|e| e.suggestions.iter().any(|s| s == ", ") && chars(text, e.end, e.end + 3) == "что"));

    let builtin = engine().check_grammar(text);
    assert!(builtin.errors.iter().any(|e| e.rule_id == "comma-before-conjunction"));
}

#[test]
fn test_gender_agreement() {
    let result = engine().check("красивый девочка");
    let error = result
        .errors
        .iter()
        .find(|e| e.subtype.as_deref() == Some("gender_agreement"))
        .expect("gender agreement error");
    assert_eq!(error.text, "красивый");
    assert!(error.suggestions.iter().any(|s| s == "красивая"));
}

#[test]
fn test_subject_predicate_dash() {
    let text = "Москва столица России.";
    let result = engine().check(text);
    let dash = result
        .errors
        .iter()
        .find(|e| e.suggestions.iter().any(|s| s == " — "))
        .expect("dash error");
    assert_eq!(chars(text, 0, dash.start), "Москва");
    assert!(chars(text, dash.end, text.chars().count()).starts_with("столица"));
}

#[test]
fn test_word_count_mixed_scripts() {
    let analyzer = TextAnalyzer::default();
    assert_eq!(analyzer.word_count("hello мир test тест", &AnalysisOptions::default()), 4);
}

fn grammar_at(start: usize) -> GrammarError {
    let mut error = SibilantVowelRule.check("жы").remove(0);
    error.start = start;
    error.end = start + 2;
    error
}

fn spelling_at(start: usize) -> SpellingError {
    SpellingError {
        start,
        end: start + 2,
        text: "xx".to_string(),
        suggestions: vec!["yy".to_string()],
        severity: Severity::Error,
        confidence: 0.9,
        message: String::new(),
    }
}

#[test]
fn test_merge_ordering() {
    let merged = merge_results(&[grammar_at(5), grammar_at(2)], &[spelling_at(2)]);
    let order: Vec<(usize, ErrorSource)> = merged.iter().map(|e| (e.start, e.source)).collect();
    assert_eq!(
        order,
        vec![
            (2, ErrorSource::GrammarCheck),
            (2, ErrorSource::SpellCheck),
            (5, ErrorSource::GrammarCheck),
        ]
    );
}

#[test]
fn test_analysis_cache_behaviour() {
    let analyzer = TextAnalyzer::new(3);
    let options = AnalysisOptions::default();

    analyzer.analyze_text("x", &options);
    let size = analyzer.cache_stats().size;
    analyzer.analyze_text("x", &options);
    assert_eq!(analyzer.cache_stats().size, size);

    for i in 0..10 {
        analyzer.analyze_text(&format!("текст {}", i), &options);
        assert!(analyzer.cache_stats().size <= 3);
    }

    analyzer.clear_cache();
    assert_eq!(analyzer.cache_stats().size, 0);
}

#[test]
fn test_shared_cache_across_engines() {
    let config = EngineConfig::default();
    let registry = Arc::new(RuleRegistry::new(&config));
    let cache = Arc::new(AnalysisCache::new(10));

    let first = GrammarEngine::with_registry(config.clone(), Arc::clone(&registry), Arc::clone(&cache));
    let second = GrammarEngine::with_registry(config, registry, Arc::clone(&cache));

    let a = first.check("Вчера я иду в магазин.");
    assert_eq!(cache.stats().size, 1);
    let b = second.check("Вчера я иду в магазин.");
    assert_eq!(cache.stats().size, 1);
    assert_eq!(a, b);
}

#[test]
fn test_engine_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "parallel = false\ncache_size = 2\ndisabled_rules = [\"sentence_capitalization\"]"
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    let engine = GrammarEngine::new(config);
    assert_eq!(engine.cache_stats().max_size, 2);

    let result = engine.check("жызнь");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.statistics.errors_found, 1);
    assert_eq!(result.suggestions[0].replacement, "жи");
}

#[test]
fn test_result_serializes_to_camel_case() {
    let result = engine().check("Москва столица России.");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["language"], "ru");
    assert!(json["processedAt"].is_string());
    assert!(json["statistics"]["totalRulesChecked"].as_u64().unwrap() > 0);
    assert_eq!(json["errors"][0]["type"], "punctuation");
}
