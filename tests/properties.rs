use std::collections::BTreeSet;

use grammarchk::{AnalysisOptions, EngineConfig, GrammarEngine, GrammarResult, TextAnalyzer};
use proptest::prelude::*;

fn engine() -> GrammarEngine {
    GrammarEngine::new(EngineConfig {
        parallel: false,
        cache_size: 0,
        ..Default::default()
    })
}

/// Russian-looking text with punctuation, quotes and a little markup.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[а-яёА-ЯЁ ]{0,60}",
        "[а-яА-Я .,:!?«»\"—-]{0,80}",
        "[а-яa-z <>/&;.]{0,60}",
        prop::collection::vec(
            prop::sample::select(vec![
                "жызнь", "Москва", "столица", "красивый", "девочка", "сказал", "что", "очень", "очень",
                "вчера", "иду", "по", "русски", "который", "Когда", "пришёл", ",", ".", "—", "«", "»",
            ]),
            0..12
        )
        .prop_map(|words| words.join(" ")),
    ]
}

fn ids(result: &GrammarResult) -> BTreeSet<String> {
    result.errors.iter().map(|e| e.id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_offsets_address_the_input(text in arb_text()) {
        let result = engine().check(&text);
        let len = text.chars().count();
        for error in &result.errors {
            prop_assert!(error.start <= error.end && error.end <= len, "{:?}", error);
            let covered: String = text.chars().skip(error.start).take(error.end - error.start).collect();
            prop_assert_eq!(&covered, &error.text);
        }
    }

    #[test]
    fn prop_suggestions_change_something(text in arb_text()) {
        let result = engine().check(&text);
        for error in &result.errors {
            prop_assert!(!error.suggestions.contains(&error.text), "{:?}", error);
        }
        prop_assert_eq!(result.suggestions.len(), result.errors.iter().filter(|e| !e.suggestions.is_empty()).count());
    }

    #[test]
    fn prop_check_is_deterministic(text in arb_text()) {
        let first = engine().check(&text);
        let second = engine().check(&text);
        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn prop_errors_sorted_and_counted(text in arb_text()) {
        let result = engine().check(&text);
        prop_assert!(result.errors.windows(2).all(|pair| pair[0].start <= pair[1].start));
        let stats = result.statistics;
        prop_assert_eq!(stats.errors_found + stats.warnings_found + stats.suggestions_found, result.errors.len());
    }

    #[test]
    fn prop_word_count_bounded_by_characters(text in arb_text()) {
        let analyzer = TextAnalyzer::default();
        let options = AnalysisOptions::default();
        let words = analyzer.word_count(&text, &options);
        prop_assert!(words * 2 <= analyzer.character_count(&text, false, false));
    }
}
