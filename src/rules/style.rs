use aho_corasick::AhoCorasick;
use lazy_static::lazy_static;
use regex::Regex;

use super::{match_case, Example, GrammarRule, RuleMeta};
use crate::parser::{words, TextIndex};
use crate::{ErrorType, GrammarError, Severity, Token};

/// (prefilter key, pattern). Group 1 of the pattern is the word to keep.
const PLEONASMS: &[(&str, &str)] = &[
    ("ваканси", r"свободн[а-яё]*\s+(ваканси[а-яё]*)"),
    ("премьер", r"перв[а-яё]*\s+(премьер[а-яё]*)"),
    ("сут", r"главн[а-яё]*\s+(сут[ьи])"),
    ("времени", r"(период[а-яё]*)\s+времени"),
    ("сувенир", r"памятн[а-яё]*\s+(сувенир[а-яё]*)"),
    ("прейскурант", r"(прейскурант[а-яё]*)\s+цен"),
    ("сотрудничеств", r"совместн[а-яё]*\s+(сотрудничеств[а-яё]*)"),
    ("автобиограф", r"мо(?:я|ей|ю)\s+(автобиографи[а-яё]*)"),
    ("вниз", r"(спуст[а-яё]*)\s+вниз"),
    ("вверх", r"(подня[а-яё]*)\s+вверх"),
    ("назад", r"(верну[а-яё]*)\s+назад"),
    ("лидер", r"ведущ[а-яё]*\s+(лидер[а-яё]*)"),
];

lazy_static! {
    static ref PLEONASM_KEYS: AhoCorasick =
        AhoCorasick::new(PLEONASMS.iter().map(|(key, _)| *key)).unwrap();
    static ref PLEONASM_PATTERNS: Vec<Regex> = PLEONASMS
        .iter()
        .map(|(_, pattern)| Regex::new(&format!(r"(?i)\b{}\b", pattern)).unwrap())
        .collect();
    static ref INTENSIFIERS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(очень)\s+((?:прекрасн|отличн|превосходн|идеальн)[а-яё]*)").unwrap(),
        Regex::new(
            r"(?i)\b(сам(?:ый|ая|ое|ые|ого|ой|ом|ую|ых))\s+((?:лучш|худш|перв|последн)[а-яё]*)"
        )
        .unwrap(),
        Regex::new(r"(?i)\b(более)\s+(лучше|хуже)\b").unwrap(),
    ];
}

static REDUNDANCY_META: RuleMeta = RuleMeta {
    id: "redundancy_rule",
    error_type: ErrorType::Style,
    subtype: Some("pleonasm"),
    description: "Плеоназмы",
    explanation: "Одно из слов сочетания повторяет смысл другого и может быть опущено",
    examples: &[
        Example {
            wrong: "свободная вакансия",
            correct: "вакансия",
        },
        Example {
            wrong: "период времени",
            correct: "период",
        },
        Example {
            wrong: "памятный сувенир",
            correct: "сувенир",
        },
    ],
    severity: Severity::Warning,
    confidence: 0.8,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct RedundancyRule;

impl GrammarRule for RedundancyRule {
    fn meta(&self) -> &RuleMeta {
        &REDUNDANCY_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let lower = text.to_lowercase();
        let mut candidates: Vec<usize> = PLEONASM_KEYS
            .find_overlapping_iter(&lower)
            .map(|m| m.pattern().as_usize())
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }
        candidates.sort_unstable();
        candidates.dedup();

        let index = TextIndex::new(text);
        let mut errors = Vec::new();
        for id in candidates {
            for caps in PLEONASM_PATTERNS[id].captures_iter(text) {
                let (Some(whole), Some(kept)) = (caps.get(0), caps.get(1)) else { continue };
                errors.push(REDUNDANCY_META.error_bytes(
                    &index,
                    whole.start(),
                    whole.end(),
                    format!("Плеоназм: \"{}\"", whole.as_str()),
                    vec![match_case(whole.as_str(), kept.as_str())],
                ));
            }
        }
        errors
    }
}

static INTENSIFIER_META: RuleMeta = RuleMeta {
    id: "intensifier_rule",
    error_type: ErrorType::Style,
    subtype: Some("intensifier"),
    description: "Избыточные усилители",
    explanation: "Слово уже выражает высшую степень признака, усилитель не нужен",
    examples: &[
        Example {
            wrong: "очень прекрасный",
            correct: "прекрасный",
        },
        Example {
            wrong: "самый лучший",
            correct: "лучший",
        },
        Example {
            wrong: "более лучше",
            correct: "лучше",
        },
    ],
    severity: Severity::Suggestion,
    confidence: 0.75,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct IntensifierRule;

impl GrammarRule for IntensifierRule {
    fn meta(&self) -> &RuleMeta {
        &INTENSIFIER_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();
        for pattern in INTENSIFIERS.iter() {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(intensifier), Some(word)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                    continue;
                };
                errors.push(INTENSIFIER_META.error_bytes(
                    &index,
                    whole.start(),
                    whole.end(),
                    format!(
                        "\"{}\" не нуждается в усилителе \"{}\"",
                        word.as_str(),
                        intensifier.as_str()
                    ),
                    vec![match_case(whole.as_str(), word.as_str())],
                ));
            }
        }
        errors
    }
}

static WORD_REPETITION_META: RuleMeta = RuleMeta {
    id: "word_repetition",
    error_type: ErrorType::Style,
    subtype: Some("repetition"),
    description: "Повтор слова",
    explanation: "Одно и то же слово повторено подряд",
    examples: &[Example {
        wrong: "Это было очень очень давно",
        correct: "Это было очень давно",
    }],
    severity: Severity::Warning,
    confidence: 0.72,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct WordRepetitionRule;

impl GrammarRule for WordRepetitionRule {
    fn meta(&self) -> &RuleMeta {
        &WORD_REPETITION_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let tokens: Vec<Token> = words(text).collect();

        tokens
            .windows(2)
            .filter(|pair| {
                let gap = index.slice_chars(pair[0].end, pair[1].start);
                pair[0].text.chars().count() > 3
                    && pair[0].text.to_lowercase() == pair[1].text.to_lowercase()
                    && gap.chars().all(char::is_whitespace)
            })
            .map(|pair| {
                WORD_REPETITION_META.error(
                    &index,
                    pair[0].start,
                    pair[1].end,
                    format!("Слово \"{}\" повторяется", pair[0].text),
                    vec![pair[0].text.clone()],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_examples_flagged, run};

    #[test]
    fn test_pleonasms() {
        let errors = run(&RedundancyRule, "Открыта свободная вакансия. Свободную вакансию закрыли.");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].text, "свободная вакансия");
        assert_eq!(errors[0].suggestions, vec!["вакансия"]);
        assert_eq!(errors[1].suggestions, vec!["Вакансию"]);
        assert_examples_flagged(&RedundancyRule);
    }

    #[test]
    fn test_pleonasm_prefilter_skips_clean_text() {
        assert!(run(&RedundancyRule, "Вакансия открыта, а лидер ушёл назад.").is_empty());
        let errors = run(&RedundancyRule, "Он вернулся назад");
        assert_eq!(errors[0].suggestions, vec!["вернулся"]);
    }

    #[test]
    fn test_intensifiers() {
        let errors = run(&IntensifierRule, "Самый лучший день и очень отличная погода");
        assert_eq!(errors.len(), 2);
        let suggestions: Vec<&str> = errors.iter().map(|e| e.suggestions[0].as_str()).collect();
        assert!(suggestions.contains(&"Лучший"));
        assert!(suggestions.contains(&"отличная"));
        assert!(run(&IntensifierRule, "самый высокий дом, очень хороший").is_empty());
        assert_examples_flagged(&IntensifierRule);
    }

    #[test]
    fn test_repetition() {
        let errors = run(&WordRepetitionRule, "Это было очень Очень давно");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "очень Очень");
        assert_eq!(errors[0].suggestions, vec!["очень"]);
        assert!((errors[0].confidence - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_repetition_ignores_short_and_punctuated() {
        assert!(run(&WordRepetitionRule, "да да, конечно. Нет, нет").is_empty());
        assert!(run(&WordRepetitionRule, "Книга, книга").is_empty());
        assert_examples_flagged(&WordRepetitionRule);
    }
}
