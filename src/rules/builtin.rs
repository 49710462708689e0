//! The three checks the engine runs on every `check_grammar` call,
//! independent of the registry.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use super::agreement::NounAdjectiveAgreementRule;
use super::orthography::SentenceCapitalizationRule;
use super::{Example, GrammarRule, RuleMeta};
use crate::parser::TextIndex;
use crate::{ErrorType, GrammarError, Severity};

lazy_static! {
    static ref CONJUNCTION: Regex = Regex::new(r"(?i)(\p{L}+)\s+(что|чтобы|который)\b").unwrap();
}

const NO_COMMA_BEFORE: &[&str] = &[
    "потому", "так", "и", "а", "но", "или", "да", "не", "лишь", "только", "даже", "именно", "как",
    "чем",
];

static COMMA_BEFORE_CONJUNCTION: RuleMeta = RuleMeta {
    id: "comma-before-conjunction",
    error_type: ErrorType::Syntax,
    subtype: Some("comma"),
    description: "Запятая перед союзом",
    explanation: "Перед подчинительными союзами и союзными словами ставится запятая",
    examples: &[Example {
        wrong: "Я знаю что ты прав",
        correct: "Я знаю, что ты прав",
    }],
    severity: Severity::Warning,
    confidence: 0.7,
    enabled: true,
};

static BUILTIN_CAPITALIZATION: RuleMeta = RuleMeta {
    id: "sentence-capitalization",
    error_type: ErrorType::Syntax,
    subtype: Some("capitalization"),
    description: "Заглавная буква в начале предложения",
    explanation: "Первое слово предложения пишется с заглавной буквы",
    examples: &[Example {
        wrong: "привет. как дела?",
        correct: "Привет. Как дела?",
    }],
    severity: Severity::Error,
    confidence: 0.9,
    enabled: true,
};

static BUILTIN_AGREEMENT: RuleMeta = RuleMeta {
    id: "noun-adjective-agreement",
    error_type: ErrorType::Agreement,
    subtype: Some("gender_agreement"),
    description: "Согласование прилагательного с существительным",
    explanation: "Прилагательное согласуется с существительным в роде, числе и падеже",
    examples: &[Example {
        wrong: "красивый девочка",
        correct: "красивая девочка",
    }],
    severity: Severity::Error,
    confidence: 0.6,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct CommaBeforeConjunctionRule;

impl GrammarRule for CommaBeforeConjunctionRule {
    fn meta(&self) -> &RuleMeta {
        &COMMA_BEFORE_CONJUNCTION
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for caps in CONJUNCTION.captures_iter(text) {
            let (Some(whole), Some(word), Some(conjunction)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            if NO_COMMA_BEFORE.contains(&word.as_str().to_lowercase().as_str()) {
                continue;
            }
            let suggestion = format!("{}, {}", word.as_str(), conjunction.as_str());
            errors.push(COMMA_BEFORE_CONJUNCTION.error_bytes(
                &index,
                whole.start(),
                whole.end(),
                format!("Перед \"{}\" нужна запятая", conjunction.as_str()),
                vec![suggestion],
            ));
        }

        errors
    }
}

/// Built-in rules in their fixed order.
pub fn builtin_rules() -> Vec<Arc<dyn GrammarRule>> {
    let rules: [Arc<dyn GrammarRule>; 3] = [
        Arc::new(CommaBeforeConjunctionRule),
        Arc::new(SentenceCapitalizationRule::with_meta(&BUILTIN_CAPITALIZATION)),
        Arc::new(NounAdjectiveAgreementRule::with_meta(&BUILTIN_AGREEMENT)),
    ];
    rules.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_examples_flagged, run};

    #[test]
    fn test_comma_before_conjunction() {
        let errors = run(&CommaBeforeConjunctionRule, "Я знаю что ты прав");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "знаю что");
        assert_eq!(errors[0].suggestions, vec!["знаю, что"]);
        assert_eq!((errors[0].start, errors[0].end), (2, 10));
        assert_eq!(errors[0].id, "comma-before-conjunction_2_10");
    }

    #[test]
    fn test_comma_present_or_exempt() {
        assert!(run(&CommaBeforeConjunctionRule, "Я знаю, что ты прав").is_empty());
        assert!(run(&CommaBeforeConjunctionRule, "Не только что").is_empty());
        assert!(run(&CommaBeforeConjunctionRule, "Он сказал, чтобы все ушли").is_empty());
    }

    #[test]
    fn test_builtin_roster() {
        let rules = builtin_rules();
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["comma-before-conjunction", "sentence-capitalization", "noun-adjective-agreement"]
        );
        for rule in &rules {
            assert_examples_flagged(rule.as_ref());
        }
    }

    #[test]
    fn test_builtin_variants_keep_behaviour() {
        let rules = builtin_rules();
        let errors = run(rules[2].as_ref(), "красивый девочка");
        assert_eq!(errors[0].rule_id, "noun-adjective-agreement");
        assert!((errors[0].confidence - 0.6).abs() < 1e-6);

        let errors = run(rules[1].as_ref(), "привет");
        assert_eq!(errors[0].error_type, ErrorType::Syntax);
    }
}
