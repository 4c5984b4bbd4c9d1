//! Declarative request validation.
//!
//! Rules are written per field as `|`-separated strings (`"required"`,
//! `"regex:/^[a-z0-9-]+/|unique:shop_products"`) and parsed into a
//! [`RuleSet`]. Anything that is not a built-in rule is looked up in the
//! [`RuleRegistry`]. `unique` and `exists` ask a [`PresenceVerifier`], which
//! every entity store provides.

mod registry;
mod rules;
pub mod value;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use registry::{CustomRule, MessageReplacer, RulePredicate, RuleRegistry};
pub use rules::{Rule, RuleError, RuleSet};

use crate::{
    error::{AppError, AppResult},
    response::FieldError,
};
use value::{as_key, as_number, as_text, is_present, size_of};

/// Row counting used by the `unique` and `exists` rules.
#[async_trait]
pub trait PresenceVerifier: Send + Sync {
    /// Counts rows of `table` whose `column` equals `value` when both are read
    /// as text, leaving out rows whose `excluding.0` column equals `excluding.1`.
    async fn count(
        &self,
        table: &str,
        column: &str,
        value: &str,
        excluding: Option<(&str, &str)>,
    ) -> AppResult<u64>;
}

/// Failed rules in field order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<RuleError> for AppError {
    fn from(err: RuleError) -> Self {
        AppError::Internal(err.into())
    }
}

pub struct Validator<'a> {
    registry: &'a RuleRegistry,
    presence: &'a dyn PresenceVerifier,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a RuleRegistry, presence: &'a dyn PresenceVerifier) -> Self {
        Self { registry, presence }
    }

    /// Runs every rule and collects all failures. Fails with
    /// [`AppError::Validation`] when at least one rule did not pass.
    pub async fn validate(&self, input: &Map<String, Value>, rules: &RuleSet) -> AppResult<()> {
        let errors = self.errors(input, rules).await?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    pub async fn errors(&self, input: &Map<String, Value>, rules: &RuleSet) -> AppResult<ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (field, field_rules) in rules.iter() {
            let value = input.get(field);
            for rule in field_rules {
                if !rule.is_implicit() && !is_present(value) {
                    continue;
                }
                if !self.passes(field, value, rule).await? {
                    errors.push(FieldError::new(field, self.message(field, rule)));
                }
            }
        }
        Ok(errors)
    }

    async fn passes(&self, field: &str, value: Option<&Value>, rule: &Rule) -> AppResult<bool> {
        let Some(value) = value else {
            return Ok(!matches!(rule, Rule::Required));
        };

        let passed = match rule {
            Rule::Required => is_present(Some(value)),
            Rule::String => value.is_string(),
            Rule::Numeric => as_number(value).is_some(),
            Rule::Array => value.is_array() || value.is_object(),
            Rule::Between { min, max } => size_of(value).is_some_and(|size| size >= *min && size <= *max),
            Rule::Regex(pattern) => as_text(value).is_some_and(|text| pattern.is_match(&text)),
            Rule::Unique {
                table,
                column,
                except,
                id_column,
            } => {
                let Some(text) = as_key(value) else {
                    return Ok(false);
                };
                let column = column.as_deref().unwrap_or(field);
                let excluding = except.as_deref().map(|e| (id_column.as_str(), e));
                self.presence.count(table, column, &text, excluding).await? == 0
            }
            Rule::Exists { table, column } => {
                let Some(text) = as_key(value) else {
                    return Ok(false);
                };
                let column = column.as_deref().unwrap_or(field);
                self.presence.count(table, column, &text, None).await? > 0
            }
            Rule::NotIn(values) => match as_text(value) {
                Some(text) => !values.iter().any(|candidate| loosely_equal(&text, candidate)),
                None => true,
            },
            Rule::Custom { name, parameters } => {
                let custom = self.registry.get(name).ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!("validation rule `{name}` is not registered"))
                })?;
                (custom.passes)(value, parameters)
            }
        };
        Ok(passed)
    }

    fn message(&self, field: &str, rule: &Rule) -> String {
        let attribute = field.replace('_', " ");
        match rule {
            Rule::Required => format!("The {attribute} field is required."),
            Rule::String => format!("The {attribute} must be a string."),
            Rule::Numeric => format!("The {attribute} must be a number."),
            Rule::Array => format!("The {attribute} must be an array."),
            Rule::Between { min, max } => format!("The {attribute} must be between {min} and {max}."),
            Rule::Regex(_) => format!("The {attribute} format is invalid."),
            Rule::Unique { .. } => format!("The {attribute} has already been taken."),
            Rule::Exists { .. } | Rule::NotIn(_) => format!("The selected {attribute} is invalid."),
            Rule::Custom { name, parameters } => match self.registry.get(name) {
                Some(custom) => (custom.message)(field, parameters),
                None => format!("The {attribute} is invalid."),
            },
        }
    }
}

/// Numeric strings compare by value, everything else as text.
fn loosely_equal(left: &str, right: &str) -> bool {
    match (value::parse_numeric(left), value::parse_numeric(right)) {
        (Some(l), Some(r)) => l == r,
        _ => left == right,
    }
}
