use lazy_static::lazy_static;
use regex::Regex;

use super::{Example, GrammarRule, RuleMeta};
use crate::parser::TextIndex;
use crate::{ErrorType, GrammarError, Severity};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\p{L}+").unwrap();
    static ref PARTICIPLE: Regex = Regex::new(
        r"^([а-яё]+?)(ющ|ущ|ящ|ащ)(ий|ая|ее|ие|его|ей|ему|им|ем|их|ими|ую)(ся|сь)?$"
    )
    .unwrap();
    static ref GERUND: Regex = Regex::new(
        r"^(сдела|прочита|написа|сказа|увиде|узна|откры|закры|поня|взя|нача|получи|реши|забы|приня)вши$"
    )
    .unwrap();
}

const SECOND_CONJUGATION_STEMS: &[&str] = &[
    "говор", "люб", "уч", "стро", "смотр", "вид", "слыш", "держ", "дыш", "ход", "нос", "плат", "звон",
];
const FIRST_CONJUGATION_SIBILANT_STEMS: &[&str] = &["пиш", "ищ", "скаж", "плач", "реж", "маж"];
const FIRST_CONJUGATION_PARTICIPLE_STEMS: &[&str] = &["чита", "дела", "игра", "зна", "дума", "работа", "пиш"];
const VOWEL_ENDING_EXCEPTIONS: &[&str] = &[
    "таит", "утаит", "затаит", "притаит", "таят", "утаят", "клеит", "склеит", "приклеит",
];
const SECOND_CONJUGATION_EXCEPTIONS: &[&str] = &["учет", "учёт", "строем"];

fn is_sibilant(c: char) -> bool {
    matches!(c, 'ж' | 'ш' | 'ч' | 'щ')
}

/// Replace the last `suffix_chars` characters of `word` keeping the case
/// of everything before them.
fn with_suffix(word: &str, suffix_chars: usize, replacement: &str) -> String {
    let keep = word.chars().count().saturating_sub(suffix_chars);
    let mut fixed: String = word.chars().take(keep).collect();
    let upper = word.chars().all(|c| !c.is_lowercase());
    if upper {
        fixed.push_str(&replacement.to_uppercase());
    } else {
        fixed.push_str(replacement);
    }
    fixed
}

static VERB_CONJUGATION_META: RuleMeta = RuleMeta {
    id: "verb_conjugation",
    error_type: ErrorType::Syntax,
    subtype: Some("conjugation"),
    description: "Личные окончания глаголов",
    explanation: "Глаголы I спряжения имеют окончания -ешь, -ет, -ем, -ете, -ут/-ют; глаголы II спряжения: -ишь, -ит, -им, -ите, -ат/-ят",
    examples: &[
        Example {
            wrong: "он читаит",
            correct: "он читает",
        },
        Example {
            wrong: "они говорют",
            correct: "они говорят",
        },
        Example {
            wrong: "ты пишишь",
            correct: "ты пишешь",
        },
    ],
    severity: Severity::Error,
    confidence: 0.85,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct VerbConjugationRule;

impl VerbConjugationRule {
    /// `(characters to replace, replacement)` for a misconjugated form.
    fn correction(lower: &str) -> Option<(usize, String)> {
        for (wrong, right) in [("аишь", "аешь"), ("аит", "ает"), ("аят", "ают"), ("еит", "еет")] {
            if lower.ends_with(wrong) && lower.chars().count() > wrong.chars().count() + 1 {
                if VOWEL_ENDING_EXCEPTIONS.contains(&lower) {
                    return None;
                }
                return Some((wrong.chars().count(), right.to_string()));
            }
        }

        if !SECOND_CONJUGATION_EXCEPTIONS.contains(&lower) {
            for (wrong, right) in [("ешь", "ишь"), ("ете", "ите"), ("ет", "ит"), ("ем", "им"), ("ют", "ят"), ("ут", "ят")] {
                let Some(stem) = lower.strip_suffix(wrong) else { continue };
                if !SECOND_CONJUGATION_STEMS.iter().any(|s| stem.ends_with(s)) {
                    continue;
                }
                let right = match (right, stem.chars().last()) {
                    ("ят", Some(last)) if is_sibilant(last) => "ат",
                    _ => right,
                };
                return Some((wrong.chars().count(), right.to_string()));
            }
        }

        for (wrong, right) in [("ишь", "ешь"), ("ит", "ет")] {
            let Some(stem) = lower.strip_suffix(wrong) else { continue };
            if FIRST_CONJUGATION_SIBILANT_STEMS.iter().any(|s| stem.ends_with(s)) {
                return Some((wrong.chars().count(), right.to_string()));
            }
        }

        None
    }
}

impl GrammarRule for VerbConjugationRule {
    fn meta(&self) -> &RuleMeta {
        &VERB_CONJUGATION_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        WORD.find_iter(text)
            .filter_map(|m| {
                let word = m.as_str();
                let (width, replacement) = Self::correction(&word.to_lowercase())?;
                let fixed = with_suffix(word, width, &replacement);
                Some(VERB_CONJUGATION_META.error_bytes(
                    &index,
                    m.start(),
                    m.end(),
                    format!("Неверное личное окончание глагола \"{}\"", word),
                    vec![fixed],
                ))
            })
            .collect()
    }
}

static PARTICIPLE_FORMATION_META: RuleMeta = RuleMeta {
    id: "participle_formation",
    error_type: ErrorType::Syntax,
    subtype: Some("participle"),
    description: "Суффиксы действительных причастий",
    explanation: "Причастия от глаголов I спряжения образуются с суффиксами -ущ-/-ющ-, от глаголов II спряжения с суффиксами -ащ-/-ящ-",
    examples: &[
        Example {
            wrong: "говорющий",
            correct: "говорящий",
        },
        Example {
            wrong: "читаящий",
            correct: "читающий",
        },
        Example {
            wrong: "пишащий",
            correct: "пишущий",
        },
    ],
    severity: Severity::Error,
    confidence: 0.8,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct ParticipleFormationRule;

impl ParticipleFormationRule {
    fn correct_suffix(stem: &str, suffix: &str) -> Option<&'static str> {
        let last = stem.chars().last()?;
        let second = SECOND_CONJUGATION_STEMS.iter().chain(&["кур"]).any(|s| stem.ends_with(s));
        if second && matches!(suffix, "ющ" | "ущ") {
            return Some(if is_sibilant(last) { "ащ" } else { "ящ" });
        }
        let first = FIRST_CONJUGATION_PARTICIPLE_STEMS.iter().any(|s| stem.ends_with(s));
        if first && matches!(suffix, "ящ" | "ащ") {
            return Some(if "аеёиоуыэюя".contains(last) { "ющ" } else { "ущ" });
        }
        None
    }
}

impl GrammarRule for ParticipleFormationRule {
    fn meta(&self) -> &RuleMeta {
        &PARTICIPLE_FORMATION_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for m in WORD.find_iter(text) {
            let word = m.as_str();
            let lower = word.to_lowercase();
            let Some(caps) = PARTICIPLE.captures(&lower) else { continue };
            let (Some(stem), Some(suffix)) = (caps.get(1), caps.get(2)) else { continue };
            let Some(right) = Self::correct_suffix(stem.as_str(), suffix.as_str()) else { continue };

            let stem_chars = stem.as_str().chars().count();
            let fixed: String = word
                .chars()
                .take(stem_chars)
                .chain(right.chars())
                .chain(word.chars().skip(stem_chars + 2))
                .collect();
            errors.push(PARTICIPLE_FORMATION_META.error_bytes(
                &index,
                m.start(),
                m.end(),
                format!("Неверный суффикс причастия в слове \"{}\"", word),
                vec![fixed],
            ));
        }

        errors
    }
}

static GERUND_FORMATION_META: RuleMeta = RuleMeta {
    id: "gerund_formation",
    error_type: ErrorType::Style,
    subtype: Some("gerund"),
    description: "Форма деепричастий совершенного вида",
    explanation: "В литературном языке деепричастия совершенного вида образуются с суффиксом -в, форма на -вши просторечна",
    examples: &[
        Example {
            wrong: "сделавши работу",
            correct: "сделав работу",
        },
        Example {
            wrong: "прочитавши книгу",
            correct: "прочитав книгу",
        },
    ],
    severity: Severity::Warning,
    confidence: 0.7,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct GerundFormationRule;

impl GrammarRule for GerundFormationRule {
    fn meta(&self) -> &RuleMeta {
        &GERUND_FORMATION_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        WORD.find_iter(text)
            .filter(|m| GERUND.is_match(&m.as_str().to_lowercase()))
            .map(|m| {
                let word = m.as_str();
                GERUND_FORMATION_META.error_bytes(
                    &index,
                    m.start(),
                    m.end(),
                    format!("Форма \"{}\" просторечна", word),
                    vec![with_suffix(word, 2, "")],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_examples_flagged, run};

    fn fixes(rule: &dyn GrammarRule, text: &str) -> Vec<String> {
        run(rule, text).into_iter().flat_map(|e| e.suggestions).collect()
    }

    #[test]
    fn test_first_conjugation_vowel_endings() {
        assert_eq!(fixes(&VerbConjugationRule, "он читаит"), vec!["читает"]);
        assert_eq!(fixes(&VerbConjugationRule, "они играят"), vec!["играют"]);
        assert_eq!(fixes(&VerbConjugationRule, "Она краснеит"), vec!["краснеет"]);
        assert!(run(&VerbConjugationRule, "он таит обиду и клеит обои").is_empty());
    }

    #[test]
    fn test_second_conjugation() {
        assert_eq!(fixes(&VerbConjugationRule, "они говорют"), vec!["говорят"]);
        assert_eq!(fixes(&VerbConjugationRule, "он любет"), vec!["любит"]);
        assert_eq!(fixes(&VerbConjugationRule, "они держут"), vec!["держат"]);
        assert_eq!(fixes(&VerbConjugationRule, "Они УЧУТ"), vec!["УЧАТ"]);
        assert!(run(&VerbConjugationRule, "они говорят, учет ведётся, идём строем").is_empty());
    }

    #[test]
    fn test_sibilant_first_conjugation() {
        assert_eq!(fixes(&VerbConjugationRule, "ты пишишь"), vec!["пишешь"]);
        assert_eq!(fixes(&VerbConjugationRule, "он ищит"), vec!["ищет"]);
        assert!(run(&VerbConjugationRule, "пишите и ищите, это режим").is_empty());
        assert_examples_flagged(&VerbConjugationRule);
    }

    #[test]
    fn test_participle_suffixes() {
        let rule = ParticipleFormationRule;
        assert_eq!(fixes(&rule, "говорющий человек"), vec!["говорящий"]);
        assert_eq!(fixes(&rule, "Держущая рука"), vec!["Держащая"]);
        assert_eq!(fixes(&rule, "любющийся"), vec!["любящийся"]);
        assert_eq!(fixes(&rule, "пишащий"), vec!["пишущий"]);
        assert!(run(&rule, "говорящий читающий пишущий").is_empty());
        assert_examples_flagged(&rule);
    }

    #[test]
    fn test_gerunds() {
        let errors = run(&GerundFormationRule, "Сделавши работу, он ушёл");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].suggestions, vec!["Сделав"]);
        assert!(run(&GerundFormationRule, "сделав работу, умывшись").is_empty());
        assert_examples_flagged(&GerundFormationRule);
    }
}
