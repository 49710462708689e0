use aho_corasick::{AhoCorasick, MatchKind};
use lazy_static::lazy_static;
use regex::Regex;

use super::{Example, GrammarRule, RuleMeta};
use crate::config::ReadabilityThresholds;
use crate::morphology::Tense;
use crate::parser::{sentences, TextIndex};
use crate::{ErrorType, GrammarError, SentenceSpan, Severity};

const TIME_INDICATORS: &[(&str, Tense)] = &[
    ("вчера", Tense::Past),
    ("позавчера", Tense::Past),
    ("недавно", Tense::Past),
    ("раньше", Tense::Past),
    ("прежде", Tense::Past),
    ("сейчас", Tense::Present),
    ("теперь", Tense::Present),
    ("в данный момент", Tense::Present),
    ("завтра", Tense::Future),
    ("послезавтра", Tense::Future),
];

lazy_static! {
    static ref INDICATORS: AhoCorasick = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(TIME_INDICATORS.iter().map(|(word, _)| *word))
        .unwrap();
    static ref PAST_VERB: Regex = Regex::new(r"(?i)\b[а-яё]+(?:ал|ил|ел|ла|ло|ли|ёл|ыл)\b").unwrap();
    static ref PRESENT_VERB: Regex = Regex::new(
        r"(?i)\b[а-яё]+(?:ю|у|ешь|ёшь|ет|ёт|ем|ём|ете|ёте|ут|ют|ишь|ит|им|ите|ат|ят)\b"
    )
    .unwrap();
}

const CONSONANTS: &str = "бвгджзйклмнпрстфхцчшщ";
const ABSTRACT_SUFFIXES: &[&str] = &["ость", "ение", "ание", "ство", "тель", "ность"];

/// Long, consonant-heavy or abstract-suffixed words.
fn is_complex_word(word: &str) -> bool {
    let letters: String = word.chars().filter(|c| c.is_alphabetic()).flat_map(char::to_lowercase).collect();
    if letters.chars().count() > 12 {
        return true;
    }

    let mut run = 0;
    for c in letters.chars() {
        if CONSONANTS.contains(c) {
            run += 1;
            if run >= 4 {
                return true;
            }
        } else {
            run = 0;
        }
    }

    ABSTRACT_SUFFIXES.iter().any(|suffix| letters.ends_with(suffix))
}

static READABILITY_META: RuleMeta = RuleMeta {
    id: "readability_rule",
    error_type: ErrorType::Style,
    subtype: Some("readability"),
    description: "Читаемость предложений",
    explanation: "Длинные и перегруженные сложными словами предложения трудно читать",
    examples: &[Example {
        wrong: "Когда мы вернулись домой после долгой поездки по северным городам страны, мы долго сидели \
                на кухне, пили горячий чай и рассказывали друг другу обо всём, что видели в дороге.",
        correct: "Мы вернулись домой после долгой поездки по северным городам. Потом долго сидели на кухне \
                  и пили чай. Мы рассказывали друг другу обо всём, что видели.",
    }],
    severity: Severity::Suggestion,
    confidence: 0.6,
    enabled: true,
};

/// Overlong sentences and sentences dense with complex words.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityRule {
    thresholds: ReadabilityThresholds,
}

impl ReadabilityRule {
    pub fn new(thresholds: ReadabilityThresholds) -> Self {
        Self { thresholds }
    }

    fn sentence_error(
        &self,
        index: &TextIndex<'_>,
        sentence: &SentenceSpan,
        message: String,
        advice: &str,
    ) -> GrammarError {
        READABILITY_META.error(index, sentence.start, sentence.end, message, vec![advice.to_string()])
    }
}

impl GrammarRule for ReadabilityRule {
    fn meta(&self) -> &RuleMeta {
        &READABILITY_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for sentence in sentences(text, false) {
            let word_count = sentence.text.split_whitespace().count();
            let char_count = sentence.text.chars().count();

            if word_count > self.thresholds.max_words_per_sentence {
                errors.push(self.sentence_error(
                    &index,
                    &sentence,
                    format!("Предложение слишком длинное: {} слов", word_count),
                    "Разбейте предложение на несколько более коротких",
                ));
            } else if char_count > self.thresholds.max_chars_per_sentence {
                errors.push(self.sentence_error(
                    &index,
                    &sentence,
                    format!("Предложение слишком длинное: {} символов", char_count),
                    "Сократите предложение",
                ));
            }

            let complex = sentence.text.split_whitespace().filter(|w| is_complex_word(w)).count();
            if complex > self.thresholds.max_complex_words {
                errors.push(
                    self.sentence_error(
                        &index,
                        &sentence,
                        format!("В предложении много сложных слов: {}", complex),
                        "Замените часть сложных слов более простыми",
                    )
                    .with_subtype("complexity")
                    .with_confidence(READABILITY_META.confidence * 0.8),
                );
            }
        }

        errors
    }
}

static TEMPORAL_META: RuleMeta = RuleMeta {
    id: "temporal_consistency_rule",
    error_type: ErrorType::Style,
    subtype: Some("style_consistency"),
    description: "Согласование времени глагола с обстоятельством времени",
    explanation: "Время глагола должно соответствовать обстоятельству времени в предложении",
    examples: &[
        Example {
            wrong: "Вчера я иду в магазин",
            correct: "Вчера я ходил в магазин",
        },
        Example {
            wrong: "Завтра он работал",
            correct: "Завтра он будет работать",
        },
        Example {
            wrong: "Сейчас мы были дома",
            correct: "Сейчас мы дома",
        },
    ],
    severity: Severity::Suggestion,
    confidence: 0.7,
    enabled: true,
};

fn is_word_boundary(c: Option<char>) -> bool {
    c.map_or(true, |c| !c.is_alphabetic())
}

/// The first whole-word time indicator of a sentence.
fn time_indicator(sentence: &str) -> Option<(&'static str, Tense)> {
    let lower = sentence.to_lowercase();
    INDICATORS.find_iter(&lower).find_map(|m| {
        let before = lower[..m.start()].chars().next_back();
        let after = lower[m.end()..].chars().next();
        (is_word_boundary(before) && is_word_boundary(after)).then(|| TIME_INDICATORS[m.pattern().as_usize()])
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TemporalConsistencyRule;

impl GrammarRule for TemporalConsistencyRule {
    fn meta(&self) -> &RuleMeta {
        &TEMPORAL_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for sentence in sentences(text, false) {
            let Some((indicator, tense)) = time_indicator(&sentence.text) else { continue };
            let past = PAST_VERB.find(&sentence.text);

            let (verb, advice) = match tense {
                Tense::Past => {
                    if past.is_some() {
                        continue;
                    }
                    let Some(present) = PRESENT_VERB.find(&sentence.text) else { continue };
                    (present, "Используйте глагол в прошедшем времени")
                }
                Tense::Present => {
                    let Some(past) = past else { continue };
                    (past, "Используйте глагол в настоящем времени")
                }
                Tense::Future => {
                    let Some(past) = past else { continue };
                    (past, "Используйте глагол в будущем времени")
                }
            };

            let base = index.byte_offset(sentence.start);
            errors.push(TEMPORAL_META.error_bytes(
                &index,
                base + verb.start(),
                base + verb.end(),
                format!(
                    "Глагол \"{}\" не согласуется по времени со словом \"{}\"",
                    verb.as_str(),
                    indicator
                ),
                vec![advice.to_string()],
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_examples_flagged, run};

    #[test]
    fn test_complex_words() {
        assert!(is_complex_word("достопримечательность"));
        assert!(is_complex_word("взгляд"));
        assert!(is_complex_word("радость,"));
        assert!(!is_complex_word("дом"));
        assert!(!is_complex_word("красивая"));
    }

    #[test]
    fn test_long_sentence() {
        let rule = ReadabilityRule::new(ReadabilityThresholds {
            max_words_per_sentence: 5,
            ..ReadabilityThresholds::default()
        });
        let text = "Коротко. Мы шли по длинной дороге через весь старый город.";
        let errors = run(&rule, text);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].start, 9);
        assert_eq!(errors[0].end, text.chars().count());
        assert_eq!(errors[0].severity, Severity::Suggestion);
        assert_eq!(errors[0].subtype.as_deref(), Some("readability"));
    }

    #[test]
    fn test_readability_examples() {
        let rule = ReadabilityRule::default();
        assert_examples_flagged(&rule);
        for example in READABILITY_META.examples {
            assert!(run(&rule, example.correct).is_empty(), "{:?}", example.correct);
        }
    }

    #[test]
    fn test_long_sentence_by_characters() {
        let rule = ReadabilityRule::new(ReadabilityThresholds {
            max_chars_per_sentence: 10,
            ..ReadabilityThresholds::default()
        });
        let errors = run(&rule, "Мы шли домой.");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("13"));
    }

    #[test]
    fn test_complex_sentence() {
        let rule = ReadabilityRule::default();
        let errors = run(
            &rule,
            "Необходимость взаимодействия, ответственность и целесообразность.",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].subtype.as_deref(), Some("complexity"));
        assert!((errors[0].confidence - 0.48).abs() < 1e-6);
        assert!(run(&rule, "Мама мыла раму.").is_empty());
    }

    #[test]
    fn test_temporal_mismatch() {
        let rule = TemporalConsistencyRule;
        let errors = run(&rule, "Вчера я иду в магазин.");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "иду");

        let errors = run(&rule, "Завтра он работал. Сейчас мы были дома.");
        let texts: Vec<&str> = errors.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["работал", "были"]);
        assert_examples_flagged(&rule);
    }

    #[test]
    fn test_temporal_consistent() {
        let rule = TemporalConsistencyRule;
        assert!(run(&rule, "Вчера я ходил в магазин.").is_empty());
        assert!(run(&rule, "Завтра я иду в кино.").is_empty());
        assert!(run(&rule, "Завтрак был вкусным.").is_empty());
        assert!(run(&rule, "В данный момент мы работаем.").is_empty());
    }
}
