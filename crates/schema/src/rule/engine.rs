use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use bdo_expression::value_utils::is_truthy;
use bdo_expression::{EvaluationContext, Evaluator, EvaluatorConfig, ExpressionError, SystemValues};
use bdo_log::observability::{HookRegistry, LoggingHook, ObservabilityHook};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{RuleEntry, RuleEvaluationFailed, ValidationRule};
use crate::document::SchemaDocument;
use crate::verdict::ValidationVerdict;

/// Applicable rules per field, built once per schema load
#[derive(Debug, Default)]
struct RuleIndex {
    entity_id: Option<String>,
    rules: IndexMap<String, Vec<Arc<ValidationRule>>>,
    loaded: bool,
}

impl RuleIndex {
    fn build(document: &SchemaDocument) -> Self {
        // One Arc per table rule, shared by every field referencing it
        let mut shared: HashMap<&str, Arc<ValidationRule>> = HashMap::new();
        let mut rules = IndexMap::new();

        for (field_id, field) in &document.fields {
            let mut resolved = Vec::new();
            for (position, entry) in field.meta().validation.iter().enumerate() {
                match entry {
                    RuleEntry::Inline(rule) => {
                        let mut rule = ValidationRule::clone(rule);
                        if rule.id.is_empty() {
                            rule.id = format!("{field_id}#{position}");
                        }
                        resolved.push(Arc::new(rule));
                    }
                    RuleEntry::Reference(id) => {
                        if let Some(rule) = shared.get(id.as_str()) {
                            resolved.push(Arc::clone(rule));
                            continue;
                        }
                        match document.rules.resolve(id) {
                            Some(rule) => {
                                let mut rule = rule.clone();
                                if rule.id.is_empty() {
                                    rule.id.clone_from(id);
                                }
                                let rule = Arc::new(rule);
                                shared.insert(id, Arc::clone(&rule));
                                resolved.push(rule);
                            }
                            None => tracing::debug!(
                                entity = %document.id,
                                field = %field_id,
                                rule = %id,
                                "dropping unresolved rule reference"
                            ),
                        }
                    }
                }
            }
            if !resolved.is_empty() {
                rules.insert(field_id.clone(), resolved);
            }
        }

        Self {
            entity_id: Some(document.id.clone()).filter(|id| !id.is_empty()),
            rules,
            loaded: true,
        }
    }

    fn rule_total(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

/// Evaluates the expression rules attached to an entity's fields
///
/// The index is replaced wholesale on every load; a validation that started
/// before a reload finishes against the snapshot it began with.
///
/// A rule whose tree cannot be evaluated counts as passed. Each such failure
/// is emitted as a [`RuleEvaluationFailed`] event to the engine's hooks,
/// which start out with a [`LoggingHook`] at `WARN`.
#[derive(Debug)]
pub struct RuleEngine {
    index: ArcSwap<RuleIndex>,
    evaluator: Evaluator,
    hooks: HookRegistry,
    current_user: ArcSwapOption<Value>,
}

impl RuleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::new())
    }

    #[must_use]
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self::with_evaluator(Evaluator::new().with_config(config))
    }

    #[must_use]
    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            index: ArcSwap::from_pointee(RuleIndex::default()),
            evaluator,
            hooks: HookRegistry::with_hook(Arc::new(LoggingHook::default())),
            current_user: ArcSwapOption::empty(),
        }
    }

    /// Index the rules of `document`, replacing any previous index
    ///
    /// Inline rules are taken as-is. Referenced ids are looked up in the
    /// validation, computation and business logic groups, in that order;
    /// ids found in none of them are dropped.
    pub fn load_schema(&self, document: &SchemaDocument) {
        let index = RuleIndex::build(document);
        tracing::debug!(
            entity = %document.id,
            fields = index.rules.len(),
            rules = index.rule_total(),
            "rule index loaded"
        );
        self.index.store(Arc::new(index));
    }

    /// Drop the index; `has_schema` is false afterwards
    pub fn clear(&self) {
        self.index.store(Arc::new(RuleIndex::default()));
    }

    #[must_use]
    pub fn has_schema(&self) -> bool {
        self.index.load().loaded
    }

    /// Entity the current index was built for
    #[must_use]
    pub fn entity_id(&self) -> Option<String> {
        self.index.load().entity_id.clone()
    }

    /// Rules applicable to `field_id`, in evaluation order
    #[must_use]
    pub fn rules_for(&self, field_id: &str) -> Vec<Arc<ValidationRule>> {
        self.index
            .load()
            .rules
            .get(field_id)
            .cloned()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn rule_count(&self, field_id: &str) -> usize {
        self.index.load().rules.get(field_id).map_or(0, Vec::len)
    }

    /// Fields with at least one rule, in schema order
    #[must_use]
    pub fn indexed_fields(&self) -> Vec<String> {
        self.index.load().rules.keys().cloned().collect()
    }

    /// User exposed to rules as `CURRENT_USER`
    pub fn set_current_user(&self, user: Option<Value>) {
        self.current_user.store(user.map(Arc::new));
    }

    /// Add a receiver for rule diagnostics
    pub fn register_hook(&self, hook: Arc<dyn ObservabilityHook>) {
        self.hooks.register(hook);
    }

    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    #[must_use]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Check `value` against the rules of `field_id`
    ///
    /// `values` is the rest of the record; `value` is overlaid at `field_id`
    /// before evaluation. The first rule evaluating falsy fails the field
    /// with its message.
    #[must_use]
    pub fn validate_field(
        &self,
        field_id: &str,
        value: &Value,
        values: &Map<String, Value>,
    ) -> ValidationVerdict {
        self.validate_field_with(field_id, value, values, &self.system_values())
    }

    /// [`validate_field`](Self::validate_field) with explicit system values
    #[must_use]
    pub fn validate_field_with(
        &self,
        field_id: &str,
        value: &Value,
        values: &Map<String, Value>,
        system: &SystemValues,
    ) -> ValidationVerdict {
        let index = self.index.load_full();
        match self.first_failure(&index, field_id, value, values, system) {
            Some(message) => ValidationVerdict::invalid(message),
            None => ValidationVerdict::valid(),
        }
    }

    /// Run every indexed field against `values`
    #[must_use]
    pub fn validate_all(&self, values: &Map<String, Value>) -> ValidationVerdict {
        let index = self.index.load_full();
        let system = self.system_values();
        let errors = index
            .rules
            .keys()
            .filter_map(|field_id| {
                let value = values.get(field_id).unwrap_or(&Value::Null);
                self.first_failure(&index, field_id, value, values, &system)
            })
            .collect();
        ValidationVerdict::from_errors(errors)
    }

    fn system_values(&self) -> SystemValues {
        let user = self.current_user.load_full();
        SystemValues::capture(user.map(|user| Value::clone(&user)))
    }

    fn first_failure(
        &self,
        index: &RuleIndex,
        field_id: &str,
        value: &Value,
        values: &Map<String, Value>,
        system: &SystemValues,
    ) -> Option<String> {
        let rules = index.rules.get(field_id)?;

        let mut fields = values.clone();
        fields.insert(field_id.to_string(), value.clone());
        let context = EvaluationContext::with_fields(fields, system.clone());

        for rule in rules {
            tracing::trace!(field = field_id, rule = %rule.id, "evaluating rule");
            match self.evaluator.evaluate(&rule.expression_tree, &context) {
                Ok(result) if is_truthy(&result) => {}
                Ok(_) => return Some(rule.failure_message()),
                Err(error) => self.report(index, field_id, rule, &error),
            }
        }
        None
    }

    fn report(
        &self,
        index: &RuleIndex,
        field_id: &str,
        rule: &ValidationRule,
        error: &ExpressionError,
    ) {
        self.hooks.emit(&RuleEvaluationFailed {
            entity_id: index.entity_id.clone(),
            field_id: field_id.to_string(),
            rule_id: rule.id.clone(),
            code: error.code(),
            message: error.to_string(),
        });
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
