use serde::{Deserialize, Serialize};

use crate::{GrammarError, GrammarResult, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorSource {
    GrammarCheck,
    SpellCheck,
}

/// A finding from an external spell checker, in character offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellingError {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub severity: Severity,
    pub confidence: f32,
    #[serde(default)]
    pub message: String,
}

/// Anything that can produce spelling findings for the merged report.
pub trait SpellingProvider: Send + Sync {
    fn check(&self, text: &str) -> Vec<SpellingError>;
}

/// One entry of the merged grammar and spelling list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedError {
    pub source: ErrorSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub message: String,
    pub suggestions: Vec<String>,
    pub severity: Severity,
    pub confidence: f32,
}

impl From<&GrammarError> for CombinedError {
    fn from(error: &GrammarError) -> Self {
        Self {
            source: ErrorSource::GrammarCheck,
            id: Some(error.id.clone()),
            start: error.start,
            end: error.end,
            text: error.text.clone(),
            message: error.message.clone(),
            suggestions: error.suggestions.clone(),
            severity: error.severity,
            confidence: error.confidence,
        }
    }
}

impl From<&SpellingError> for CombinedError {
    fn from(error: &SpellingError) -> Self {
        Self {
            source: ErrorSource::SpellCheck,
            id: None,
            start: error.start,
            end: error.end,
            text: error.text.clone(),
            message: error.message.clone(),
            suggestions: error.suggestions.clone(),
            severity: error.severity,
            confidence: error.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub spelling: Vec<SpellingError>,
    pub grammar: GrammarResult,
    pub combined: Vec<CombinedError>,
}

/// Grammar findings followed by spelling findings, stably sorted by start.
/// Equal starts keep grammar before spelling.
pub fn merge_results(grammar: &[GrammarError], spelling: &[SpellingError]) -> Vec<CombinedError> {
    let mut combined: Vec<CombinedError> = grammar
        .iter()
        .map(CombinedError::from)
        .chain(spelling.iter().map(CombinedError::from))
        .collect();
    combined.sort_by_key(|error| error.start);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TextIndex;
    use crate::rules::RuleMeta;
    use crate::ErrorType;

    const META: RuleMeta = RuleMeta {
        id: "g",
        error_type: ErrorType::Syntax,
        subtype: None,
        description: "",
        explanation: "",
        examples: &[],
        severity: Severity::Warning,
        confidence: 0.7,
        enabled: true,
    };

    fn grammar(start: usize) -> GrammarError {
        let index = TextIndex::new("0123456789");
        META.error(&index, start, start + 1, "grammar", vec![])
    }

    fn spelling(start: usize) -> SpellingError {
        SpellingError {
            start,
            end: start + 1,
            text: start.to_string(),
            suggestions: vec![],
            severity: Severity::Error,
            confidence: 0.9,
            message: "spelling".to_string(),
        }
    }

    #[test]
    fn test_ties_keep_grammar_first() {
        let merged = merge_results(&[grammar(5), grammar(2)], &[spelling(2)]);
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
    fn test_spelling_before_later_grammar() {
        let merged = merge_results(&[grammar(7)], &[spelling(3), spelling(1)]);
        let starts: Vec<usize> = merged.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![1, 3, 7]);
        assert_eq!(merged[2].id.as_deref(), Some("g_7_8"));
        assert!(merged[0].id.is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_results(&[], &[]).is_empty());
    }

    #[test]
    fn test_source_tags() {
        let json = serde_json::to_value(CombinedError::from(&spelling(0))).unwrap();
        assert_eq!(json["source"], "spell-check");
        let json = serde_json::to_value(CombinedError::from(&grammar(0))).unwrap();
        assert_eq!(json["source"], "grammar-check");
    }
}
