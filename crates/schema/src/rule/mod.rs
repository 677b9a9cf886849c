//! Validation rules and the engine that evaluates them

mod diagnostics;
mod engine;

pub use diagnostics::RuleEvaluationFailed;
pub use engine::RuleEngine;

use bdo_expression::ExpressionNode;
use serde::{Deserialize, Serialize};

/// A named boolean expression guarding one field
///
/// `ExpressionTree` is what gets evaluated. `Expression` keeps the authored
/// source text and is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationRule {
    #[serde(default, alias = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, alias = "Condition", skip_serializing_if = "String::is_empty")]
    pub expression: String,

    /// A rule shipped without a tree fails to evaluate and is reported, not
    /// rejected at load time.
    #[serde(default = "missing_tree")]
    pub expression_tree: ExpressionNode,

    #[serde(default)]
    pub message: String,
}

fn missing_tree() -> ExpressionNode {
    ExpressionNode::Unsupported
}

impl ValidationRule {
    pub fn new(id: impl Into<String>, expression_tree: ExpressionNode) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            expression: String::new(),
            expression_tree,
            message: String::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = expression.into();
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Message reported when the rule evaluates falsy
    ///
    /// Falls back to `"<Name or Id> failed"` when the rule has no message.
    #[must_use]
    pub fn failure_message(&self) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        let label = self
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id);
        format!("{label} failed")
    }
}

/// Entry of a field's `Validation` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// Id of a rule in the schema's rule table
    Reference(String),
    /// Rule defined on the field itself
    Inline(Box<ValidationRule>),
}

impl From<ValidationRule> for RuleEntry {
    fn from(rule: ValidationRule) -> Self {
        Self::Inline(Box::new(rule))
    }
}

impl From<&str> for RuleEntry {
    fn from(id: &str) -> Self {
        Self::Reference(id.to_string())
    }
}
