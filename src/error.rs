use thiserror::Error;

/// Errors surfaced by the configuration and registry APIs.
///
/// Checking itself never fails: rule faults and cache faults degrade to
/// fewer findings instead of an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to parse analysis options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
