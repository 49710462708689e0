pub mod checker;
pub mod config;
pub mod error;
pub mod metrics;
pub mod morphology;
pub mod parser;
pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use checker::cache::{AnalysisCache, CacheStats};
pub use checker::merge::{merge_results, CombinedError, CombinedReport, ErrorSource, SpellingError, SpellingProvider};
pub use checker::registry::RuleRegistry;
pub use checker::{GrammarEngine, PerfStats};
pub use config::{AnalysisOptions, EngineConfig, ReadabilityThresholds};
pub use error::EngineError;
pub use metrics::{TextAnalyzer, TextStatistics};
pub use morphology::{MorphologicalInfo, MorphologyAnalyzer, WordInfo};
pub use rules::{GrammarRule, RuleMeta};

/// Language tag attached to every result.
pub const LANGUAGE: &str = "ru";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Certain violation.
    Error,
    /// Likely violation.
    Warning,
    /// Stylistic advisory.
    Suggestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Punctuation,
    Syntax,
    Agreement,
    Style,
    Orthography,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Punctuation => "punctuation",
            ErrorType::Syntax => "syntax",
            ErrorType::Agreement => "agreement",
            ErrorType::Style => "style",
            ErrorType::Orthography => "orthography",
        }
    }
}

/// A single finding. `start`/`end` are character offsets into the checked
/// text and `text` is exactly the characters they cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarError {
    pub id: String,
    pub rule_id: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub explanation: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub suggestions: Vec<String>,
    pub confidence: f32,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarSuggestion {
    pub error_id: String,
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub replacement: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_rules_checked: usize,
    pub errors_found: usize,
    pub warnings_found: usize,
    pub suggestions_found: usize,
}

impl Statistics {
    pub fn from_errors(errors: &[GrammarError], total_rules_checked: usize) -> Self {
        let count = |severity: Severity| errors.iter().filter(|e| e.severity == severity).count();
        Self {
            total_rules_checked,
            errors_found: count(Severity::Error),
            warnings_found: count(Severity::Warning),
            suggestions_found: count(Severity::Suggestion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarResult {
    pub errors: Vec<GrammarError>,
    pub suggestions: Vec<GrammarSuggestion>,
    pub confidence: f32,
    pub processed_at: DateTime<Utc>,
    pub language: String,
    pub statistics: Statistics,
}

impl GrammarResult {
    /// Build a result whose suggestions and statistics are derived from `errors`.
    pub fn from_errors(errors: Vec<GrammarError>, total_rules_checked: usize, confidence: f32) -> Self {
        let suggestions = errors
            .iter()
            .filter_map(|error| {
                error.suggestions.first().map(|replacement| GrammarSuggestion {
                    error_id: error.id.clone(),
                    start: error.start,
                    end: error.end,
                    original: error.text.clone(),
                    replacement: replacement.clone(),
                    confidence: error.confidence,
                })
            })
            .collect();
        let statistics = Statistics::from_errors(&errors, total_rules_checked);

        Self {
            errors,
            suggestions,
            confidence,
            processed_at: Utc::now(),
            language: LANGUAGE.to_string(),
            statistics,
        }
    }

    pub fn empty() -> Self {
        Self::from_errors(Vec::new(), 0, 1.0)
    }
}

/// A word produced by the tokenizer, addressed in characters of the
/// original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}
