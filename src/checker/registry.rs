use std::sync::{Arc, Once, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::config::{EngineConfig, ReadabilityThresholds};
use crate::error::{EngineError, Result};
use crate::rules::agreement::{NounAdjectiveAgreementRule, ParticipleAgreementRule, SubjectPredicateAgreementRule};
use crate::rules::orthography::{
    DoubleConsonantRule, PoPrefixRule, PrefixZSRule, ProperNamesRule, SentenceCapitalizationRule, SibilantVowelRule,
    SoftSignRule,
};
use crate::rules::semantic::{ReadabilityRule, TemporalConsistencyRule};
use crate::rules::style::{IntensifierRule, RedundancyRule, WordRepetitionRule};
use crate::rules::syntax::{ComplexSentenceRule, DirectSpeechRule, PunctuationRule};
use crate::rules::verbs::{GerundFormationRule, ParticipleFormationRule, VerbConjugationRule};
use crate::rules::GrammarRule;
use crate::ErrorType;

/// Orthography and basic punctuation, registered on construction.
fn core_rules() -> Vec<Arc<dyn GrammarRule>> {
    vec![
        Arc::new(SentenceCapitalizationRule::new()),
        Arc::new(SibilantVowelRule),
        Arc::new(SoftSignRule),
        Arc::new(DoubleConsonantRule),
        Arc::new(PrefixZSRule),
        Arc::new(PoPrefixRule),
        Arc::new(ProperNamesRule),
        Arc::new(PunctuationRule),
    ]
}

/// Morphology-driven and sentence-structure rules.
fn extended_rules() -> Vec<Arc<dyn GrammarRule>> {
    vec![
        Arc::new(NounAdjectiveAgreementRule::new()),
        Arc::new(SubjectPredicateAgreementRule::default()),
        Arc::new(ParticipleAgreementRule::default()),
        Arc::new(VerbConjugationRule),
        Arc::new(ParticipleFormationRule),
        Arc::new(GerundFormationRule),
        Arc::new(ComplexSentenceRule),
        Arc::new(DirectSpeechRule),
    ]
}

/// Heuristic style rules.
fn style_rules(thresholds: ReadabilityThresholds) -> Vec<Arc<dyn GrammarRule>> {
    vec![
        Arc::new(RedundancyRule),
        Arc::new(IntensifierRule),
        Arc::new(WordRepetitionRule),
        Arc::new(ReadabilityRule::new(thresholds)),
        Arc::new(TemporalConsistencyRule),
    ]
}

#[derive(Clone)]
struct RegisteredRule {
    rule: Arc<dyn GrammarRule>,
    enabled: bool,
}

/// Rule set keyed by rule id, in registration order.
///
/// The core tier is registered on construction. The remaining tiers are
/// registered once, on the first call that reads or changes the rule set.
pub struct RuleRegistry {
    rules: RwLock<Vec<RegisteredRule>>,
    init: Once,
    thresholds: ReadabilityThresholds,
    disabled: Vec<String>,
}

impl RuleRegistry {
    pub fn new(config: &EngineConfig) -> Self {
        let registry = Self {
            rules: RwLock::new(Vec::new()),
            init: Once::new(),
            thresholds: config.readability,
            disabled: config.disabled_rules.clone(),
        };
        registry.insert_all(core_rules());
        debug!(rules = registry.len(), "registered core rules");
        registry
    }

    /// A registry with no rules and no pending tiers.
    pub fn empty() -> Self {
        let registry = Self {
            rules: RwLock::new(Vec::new()),
            init: Once::new(),
            thresholds: ReadabilityThresholds::default(),
            disabled: Vec::new(),
        };
        registry.init.call_once(|| {});
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<RegisteredRule>> {
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<RegisteredRule>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_all(&self, rules: Vec<Arc<dyn GrammarRule>>) {
        let mut registered = self.write();
        for rule in rules {
            // Rules registered by the caller before the deferred tiers take precedence.
            if registered.iter().any(|r| r.rule.id() == rule.id()) {
                continue;
            }
            let enabled = rule.meta().enabled && !self.disabled.iter().any(|id| id == rule.id());
            registered.push(RegisteredRule { rule, enabled });
        }
    }

    /// Register the deferred tiers. Runs at most once per registry.
    pub fn ensure_initialized(&self) {
        self.init.call_once(|| {
            self.insert_all(extended_rules());
            self.insert_all(style_rules(self.thresholds));
            debug!(rules = self.read().len(), "registry fully initialized");
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.init.is_completed()
    }

    /// Add a rule, replacing any rule with the same id in place.
    pub fn register(&self, rule: Arc<dyn GrammarRule>) {
        self.ensure_initialized();
        let enabled = rule.meta().enabled;
        let mut rules = self.write();
        match rules.iter_mut().find(|r| r.rule.id() == rule.id()) {
            Some(existing) => *existing = RegisteredRule { rule, enabled },
            None => rules.push(RegisteredRule { rule, enabled }),
        }
    }

    pub fn unregister(&self, id: &str) -> Result<Arc<dyn GrammarRule>> {
        self.ensure_initialized();
        let mut rules = self.write();
        let position = rules
            .iter()
            .position(|r| r.rule.id() == id)
            .ok_or_else(|| EngineError::UnknownRule(id.to_string()))?;
        Ok(rules.remove(position).rule)
    }

    pub fn get_rule(&self, id: &str) -> Option<Arc<dyn GrammarRule>> {
        self.ensure_initialized();
        self.read().iter().find(|r| r.rule.id() == id).map(|r| Arc::clone(&r.rule))
    }

    pub fn get_all_rules(&self) -> Vec<Arc<dyn GrammarRule>> {
        self.ensure_initialized();
        self.read().iter().map(|r| Arc::clone(&r.rule)).collect()
    }

    pub fn get_enabled_rules(&self) -> Vec<Arc<dyn GrammarRule>> {
        self.ensure_initialized();
        self.read()
            .iter()
            .filter(|r| r.enabled)
            .map(|r| Arc::clone(&r.rule))
            .collect()
    }

    pub fn rules_by_type(&self, error_type: ErrorType) -> Vec<Arc<dyn GrammarRule>> {
        self.ensure_initialized();
        self.read()
            .iter()
            .filter(|r| r.rule.meta().error_type == error_type)
            .map(|r| Arc::clone(&r.rule))
            .collect()
    }

    pub fn enable_rule(&self, id: &str) -> Result<()> {
        self.set_enabled(id, true)
    }

    pub fn disable_rule(&self, id: &str) -> Result<()> {
        self.set_enabled(id, false)
    }

    fn set_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        self.ensure_initialized();
        let mut rules = self.write();
        let rule = rules
            .iter_mut()
            .find(|r| r.rule.id() == id)
            .ok_or_else(|| EngineError::UnknownRule(id.to_string()))?;
        rule.enabled = enabled;
        debug!(rule = id, enabled, "rule toggled");
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.ensure_initialized();
        self.read().iter().any(|r| r.enabled && r.rule.id() == id)
    }

    /// Ids of the enabled rules in registration order.
    pub fn enabled_ids(&self) -> Vec<&'static str> {
        self.ensure_initialized();
        self.read().iter().filter(|r| r.enabled).map(|r| r.rule.id()).collect()
    }

    /// Rules registered so far, without triggering the deferred tiers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::CommaBeforeConjunctionRule;

    #[test]
    fn test_staged_initialization() {
        let registry = RuleRegistry::default();
        assert!(!registry.is_initialized());
        assert_eq!(registry.len(), 8);

        let all = registry.get_all_rules();
        assert!(registry.is_initialized());
        assert_eq!(all.len(), 21);

        // A second pass must not duplicate anything.
        registry.ensure_initialized();
        assert_eq!(registry.get_all_rules().len(), 21);
    }

    #[test]
    fn test_rule_ids_are_unique() {
        let registry = RuleRegistry::default();
        let mut ids: Vec<&str> = registry.get_all_rules().iter().map(|r| r.id()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_enable_and_disable() {
        let registry = RuleRegistry::default();
        registry.disable_rule("word_repetition").unwrap();
        assert!(!registry.is_enabled("word_repetition"));
        assert_eq!(registry.get_enabled_rules().len(), 20);

        registry.enable_rule("word_repetition").unwrap();
        assert!(registry.is_enabled("word_repetition"));

        assert!(matches!(
            registry.disable_rule("no_such_rule"),
            Err(EngineError::UnknownRule(id)) if id == "no_such_rule"
        ));
    }

    #[test]
    fn test_disabled_from_config() {
        let config = EngineConfig {
            disabled_rules: vec!["sibilant_vowel".to_string(), "readability_rule".to_string()],
            ..Default::default()
        };
        let registry = RuleRegistry::new(&config);
        let enabled = registry.enabled_ids();
        assert!(!enabled.contains(&"sibilant_vowel"));
        assert!(!enabled.contains(&"readability_rule"));
        assert_eq!(enabled.len(), 19);
        assert!(registry.get_rule("readability_rule").is_some());
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = RuleRegistry::empty();
        assert!(registry.is_initialized());
        assert!(registry.is_empty());

        registry.register(Arc::new(CommaBeforeConjunctionRule));
        registry.register(Arc::new(CommaBeforeConjunctionRule));
        assert_eq!(registry.len(), 1);

        let removed = registry.unregister("comma-before-conjunction").unwrap();
        assert_eq!(removed.id(), "comma-before-conjunction");
        assert!(registry.unregister("comma-before-conjunction").is_err());
    }

    #[test]
    fn test_rules_by_type() {
        let registry = RuleRegistry::default();
        let agreement: Vec<&str> = registry
            .rules_by_type(ErrorType::Agreement)
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(
            agreement,
            vec!["noun_adjective_agreement", "subject_predicate_agreement", "participle_agreement"]
        );
    }
}
