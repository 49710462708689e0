pub mod agreement;
pub mod builtin;
pub mod orthography;
pub mod semantic;
pub mod style;
pub mod syntax;
pub mod verbs;

use serde::Serialize;
use std::collections::HashSet;

use crate::parser::{get_context, TextIndex};
use crate::{ErrorType, GrammarError, Severity};

/// A wrong/correct pair shown to users and used as a test fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Example {
    pub wrong: &'static str,
    pub correct: &'static str,
}

/// Static description of a rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub subtype: Option<&'static str>,
    pub description: &'static str,
    pub explanation: &'static str,
    pub examples: &'static [Example],
    pub severity: Severity,
    pub confidence: f32,
    pub enabled: bool,
}

/// A checker over raw text. Implementations hold no per-call state.
pub trait GrammarRule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// All findings for `text`, in any order, with character offsets.
    fn check(&self, text: &str) -> Vec<GrammarError>;

    fn id(&self) -> &'static str {
        self.meta().id
    }
}

impl RuleMeta {
    /// Finding over a byte range of `index`'s text with this rule's defaults.
    pub fn error_bytes(
        &self,
        index: &TextIndex<'_>,
        byte_start: usize,
        byte_end: usize,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> GrammarError {
        let text = index.text();
        let covered = &text[byte_start..byte_end];
        let start = index.char_offset(byte_start);
        let end = index.char_offset(byte_end);

        let mut seen = HashSet::new();
        let suggestions = suggestions
            .into_iter()
            .filter(|s| s != covered && seen.insert(s.clone()))
            .collect();

        GrammarError {
            id: format!("{}_{}_{}", self.id, start, end),
            rule_id: self.id.to_string(),
            error_type: self.error_type,
            subtype: self.subtype.map(str::to_string),
            severity: self.severity,
            message: message.into(),
            explanation: self.explanation.to_string(),
            start,
            end,
            text: covered.to_string(),
            suggestions,
            confidence: self.confidence,
            context: get_context(text, byte_start, byte_end),
        }
    }

    /// Finding over a character range.
    pub fn error(
        &self,
        index: &TextIndex<'_>,
        start: usize,
        end: usize,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> GrammarError {
        self.error_bytes(index, index.byte_offset(start), index.byte_offset(end), message, suggestions)
    }
}

impl GrammarError {
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_subtype(mut self, subtype: &str) -> Self {
        self.subtype = Some(subtype.to_string());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// Give `replacement` the case of `original`'s first letter.
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const VERB_ENDINGS: &[&str] = &[
    "ет", "ёт", "ит", "ут", "ют", "ат", "ят", "ешь", "ёшь", "ишь", "аю", "яю", "ею", "л", "ла", "ло", "ли",
];

/// Rough finite-verb test by ending.
pub(crate) fn is_verb_like(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower.chars().count() > 2 && VERB_ENDINGS.iter().any(|ending| lower.ends_with(ending))
}


#[cfg(test)]
mod tests {
    use super::*;

    const META: RuleMeta = RuleMeta {
        id: "demo",
        error_type: ErrorType::Orthography,
        subtype: None,
        description: "",
        explanation: "explained",
        examples: &[],
        severity: Severity::Error,
        confidence: 0.9,
        enabled: true,
    };

    #[test]
    fn test_error_uses_char_offsets() {
        let text = "мир жызнь";
        let index = TextIndex::new(text);
        let byte_start = text.find("жы").unwrap();
        let error = META.error_bytes(&index, byte_start, byte_start + "жы".len(), "msg", vec!["жи".into()]);
        assert_eq!((error.start, error.end), (4, 6));
        assert_eq!(error.text, "жы");
        assert_eq!(error.id, "demo_4_6");
        assert_eq!(error.context, text);
    }

    #[test]
    fn test_error_drops_identity_suggestions() {
        let index = TextIndex::new("дом");
        let error = META.error(
            &index,
            0,
            3,
            "msg",
            vec!["дом".into(), "Дом".into(), "Дом".into()],
        );
        assert_eq!(error.suggestions, vec!["Дом"]);
    }

    #[test]
    fn test_builder_overrides() {
        let index = TextIndex::new("abc");
        let error = META
            .error(&index, 0, 1, "msg", vec![])
            .with_confidence(1.5)
            .with_subtype("dash")
            .with_severity(Severity::Warning);
        assert_eq!(error.confidence, 1.0);
        assert_eq!(error.subtype.as_deref(), Some("dash"));
        assert_eq!(error.severity, Severity::Warning);
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("Жы", "жи"), "Жи");
        assert_eq!(match_case("по", "По-русски"), "по-русски");
        assert_eq!(capitalize("москва"), "Москва");
    }

    #[test]
    fn test_verb_like() {
        assert!(is_verb_like("пришёл"));
        assert!(is_verb_like("читает"));
        assert!(!is_verb_like("дом"));
        assert!(!is_verb_like("ли"));
    }
}
