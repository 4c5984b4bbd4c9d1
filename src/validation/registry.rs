use std::collections::HashMap;

use serde_json::Value;

/// Decides whether a value passes a custom rule, given the rule's parameters.
pub type RulePredicate = fn(&Value, &[String]) -> bool;

/// Builds the failure message from the raw field name and the rule's parameters.
pub type MessageReplacer = fn(&str, &[String]) -> String;

#[derive(Debug, Clone, Copy)]
pub struct CustomRule {
    pub passes: RulePredicate,
    pub message: MessageReplacer,
}

/// Named custom rules. Filled while the application state is assembled and
/// shared read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, CustomRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing any earlier rule of the same name.
    pub fn extend(&mut self, name: impl Into<String>, passes: RulePredicate, message: MessageReplacer) {
        let name = name.into();
        tracing::debug!(rule = %name, "validation rule registered");
        self.rules.insert(name, CustomRule { passes, message });
    }

    pub fn get(&self, name: &str) -> Option<&CustomRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}
