use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    #[serde(default = "default_engine_confidence")]
    pub engine_confidence: f32,

    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub disabled_rules: Vec<String>,

    #[serde(default)]
    pub readability: ReadabilityThresholds,
}

fn default_language() -> String {
    crate::LANGUAGE.to_string()
}

fn default_cache_size() -> usize {
    100
}

fn default_engine_confidence() -> f32 {
    0.8
}

fn default_parallel() -> bool {
    true
}

/// Limits used by the readability rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadabilityThresholds {
    pub max_words_per_sentence: usize,
    pub max_chars_per_sentence: usize,
    pub max_complex_words: usize,
}

impl Default for ReadabilityThresholds {
    fn default() -> Self {
        Self {
            max_words_per_sentence: 25,
            max_chars_per_sentence: 150,
            max_complex_words: 3,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            cache_size: default_cache_size(),
            engine_confidence: default_engine_confidence(),
            parallel: default_parallel(),
            disabled_rules: Vec::new(),
            readability: ReadabilityThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, EngineError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlay `other` on top of `self`; values equal to the defaults in
    /// `other` leave `self` untouched.
    pub fn merge(mut self, other: Self) -> Self {
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.cache_size != default_cache_size() {
            self.cache_size = other.cache_size;
        }
        if other.engine_confidence != default_engine_confidence() {
            self.engine_confidence = other.engine_confidence;
        }
        if !other.disabled_rules.is_empty() {
            self.disabled_rules = other.disabled_rules;
        }
        if other.readability != ReadabilityThresholds::default() {
            self.readability = other.readability;
        }
        self.parallel = other.parallel;
        self
    }
}

/// Per-call options. Unknown keys are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_speed: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_html: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_words_per_sentence: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_separators: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_separators: Option<String>,
}

impl AnalysisOptions {
    pub fn from_json(json: &str) -> std::result::Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn include_html(&self) -> bool {
        self.include_html.unwrap_or(false)
    }

    pub fn sentence_pattern(&self) -> std::result::Result<Option<Regex>, EngineError> {
        compile_override(self.sentence_separators.as_deref())
    }

    pub fn word_pattern(&self) -> std::result::Result<Option<Regex>, EngineError> {
        compile_override(self.word_separators.as_deref())
    }
}

fn compile_override(pattern: Option<&str>) -> std::result::Result<Option<Regex>, EngineError> {
    match pattern {
        None => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }),
    }
}
