//! Schema document as delivered by the backend
//!
//! ```json
//! {
//!   "Id": "Product",
//!   "Fields": { "Price": { "Type": "Number", "Required": true } },
//!   "Rules": { "Validation": { "RULE_A": { "ExpressionTree": { ... } } } }
//! }
//! ```
//!
//! Keys this runtime does not consume (role permissions, layout hints) are
//! ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaResult;
use crate::field::FieldDescriptor;
use crate::rule::ValidationRule;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemaDocument {
    #[serde(default, alias = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub fields: IndexMap<String, FieldDescriptor>,

    #[serde(default)]
    pub rules: RuleTable,
}

/// Central rule table, partitioned by purpose
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleTable {
    #[serde(default)]
    pub validation: IndexMap<String, ValidationRule>,

    #[serde(default)]
    pub computation: IndexMap<String, ValidationRule>,

    #[serde(default)]
    pub business_logic: IndexMap<String, ValidationRule>,
}

impl RuleTable {
    /// Look `id` up in validation, then computation, then business logic
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&ValidationRule> {
        self.validation
            .get(id)
            .or_else(|| self.computation.get(id))
            .or_else(|| self.business_logic.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validation.len() + self.computation.len() + self.business_logic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn groups_mut(&mut self) -> [&mut IndexMap<String, ValidationRule>; 3] {
        [
            &mut self.validation,
            &mut self.computation,
            &mut self.business_logic,
        ]
    }
}

impl SchemaDocument {
    /// Empty document for `id`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Parse and normalize a document
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        document.normalize();
        Ok(document)
    }

    /// Parse and normalize an already decoded document
    pub fn from_value(value: Value) -> SchemaResult<Self> {
        let mut document: Self = serde_json::from_value(value)?;
        document.normalize();
        Ok(document)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare a field under its own id
    #[must_use]
    pub fn with_field(mut self, field: impl Into<FieldDescriptor>) -> Self {
        let field = field.into();
        self.fields.insert(field.id().to_string(), field);
        self
    }

    /// Add a rule to the validation group under its own id
    #[must_use]
    pub fn with_validation_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.validation.insert(rule.id.clone(), rule);
        self
    }

    /// Fill empty field and rule ids from their map keys
    pub fn normalize(&mut self) {
        for (key, field) in &mut self.fields {
            field.normalize(key);
        }
        for group in self.rules.groups_mut() {
            for (key, rule) in group.iter_mut() {
                if rule.id.is_empty() {
                    rule.id.clone_from(key);
                }
            }
        }
    }
}
