pub mod cache;
pub mod merge;
pub mod registry;

use dashmap::DashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::rules::builtin::builtin_rules;
use crate::rules::GrammarRule;
use crate::{GrammarError, GrammarResult};
use cache::{cache_key, AnalysisCache, CacheStats};
use merge::{merge_results, CombinedReport, SpellingError, SpellingProvider};
use registry::RuleRegistry;

/// Rolling timing for one named operation, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfStats {
    pub average: f64,
    pub max: f64,
    pub count: u64,
}

impl PerfStats {
    fn record(&mut self, millis: f64) {
        self.count += 1;
        self.average += (millis - self.average) / self.count as f64;
        self.max = self.max.max(millis);
    }
}

/// Runs rule sets over text and assembles [`GrammarResult`]s.
pub struct GrammarEngine {
    config: EngineConfig,
    builtin: Vec<Arc<dyn GrammarRule>>,
    registry: Arc<RuleRegistry>,
    cache: Arc<AnalysisCache<GrammarResult>>,
    perf: DashMap<String, PerfStats>,
}

impl GrammarEngine {
    pub fn new(config: EngineConfig) -> Self {
        let registry = Arc::new(RuleRegistry::new(&config));
        let cache = Arc::new(AnalysisCache::new(config.cache_size));
        Self::with_registry(config, registry, cache)
    }

    /// Build an engine over a caller-owned registry and cache.
    pub fn with_registry(
        config: EngineConfig,
        registry: Arc<RuleRegistry>,
        cache: Arc<AnalysisCache<GrammarResult>>,
    ) -> Self {
        Self {
            config,
            builtin: builtin_rules(),
            registry,
            cache,
            perf: DashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Check `text` with the fixed built-in rule set.
    pub fn check_grammar(&self, text: &str) -> GrammarResult {
        let started = Instant::now();
        let errors = self.run_rules(&self.builtin, text);
        let result = GrammarResult::from_errors(errors, self.builtin.len(), self.config.engine_confidence);
        self.track("check_grammar", started);
        result
    }

    /// Check `text` with every enabled registry rule. Results are cached per
    /// text and enabled rule set.
    pub fn check(&self, text: &str) -> GrammarResult {
        let started = Instant::now();
        let rules = self.registry.get_enabled_rules();
        let ids: Vec<&str> = rules.iter().map(|rule| rule.id()).collect();
        let key = cache_key(text, &ids);

        if let Some(result) = self.cache.get(&key) {
            self.track("check_cached", started);
            return result;
        }

        let errors = self.run_rules(&rules, text);
        let result = GrammarResult::from_errors(errors, rules.len(), self.config.engine_confidence);
        self.cache.set(key, result.clone());
        self.track("check", started);
        result
    }

    /// Grammar check plus an external spell check, merged by position.
    pub fn check_with_spelling(&self, text: &str, speller: &dyn SpellingProvider) -> CombinedReport {
        let spelling: Vec<SpellingError> = panic::catch_unwind(AssertUnwindSafe(|| speller.check(text)))
            .unwrap_or_else(|_| {
                warn!("spelling provider panicked, continuing without spelling results");
                Vec::new()
            });
        let grammar = self.check(text);
        let combined = merge_results(&grammar.errors, &spelling);

        CombinedReport {
            spelling,
            grammar,
            combined,
        }
    }

    fn run_rules(&self, rules: &[Arc<dyn GrammarRule>], text: &str) -> Vec<GrammarError> {
        let per_rule: Vec<Vec<GrammarError>> = if self.config.parallel {
            rules.par_iter().map(|rule| run_isolated(rule.as_ref(), text)).collect()
        } else {
            rules.iter().map(|rule| run_isolated(rule.as_ref(), text)).collect()
        };

        // Ids are "{rule}_{start}_{end}", so only exact duplicates merge.
        let mut seen = HashSet::new();
        let mut errors: Vec<GrammarError> = per_rule
            .into_iter()
            .flatten()
            .filter(|error| seen.insert(error.id.clone()))
            .collect();
        errors.sort_by_key(|error| error.start);

        debug!(rules = rules.len(), errors = errors.len(), chars = text.chars().count(), "check finished");
        errors
    }

    fn track(&self, operation: &str, started: Instant) {
        let millis = started.elapsed().as_secs_f64() * 1000.0;
        self.perf.entry(operation.to_string()).or_default().record(millis);
    }

    /// Snapshot of the per-operation timings.
    pub fn performance_stats(&self) -> BTreeMap<String, PerfStats> {
        self.perf
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for GrammarEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Run one rule, treating a panic as "no findings".
fn run_isolated(rule: &dyn GrammarRule, text: &str) -> Vec<GrammarError> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.check(text))) {
        Ok(errors) => errors,
        Err(_) => {
            warn!(rule = rule.id(), "rule panicked, skipping its results");
            Vec::new()
        }
    }
}
