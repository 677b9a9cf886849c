use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::rule::RuleEntry;

/// Attributes shared by every field kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldMeta {
    /// Defaults to the key the field is declared under.
    #[serde(default, alias = "_id")]
    pub id: String,

    /// Display label. Empty means "use the id".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<RuleEntry>,

    /// Owning entity, set when the field is registered
    #[serde(skip)]
    pub entity_id: Option<String>,
}

impl FieldMeta {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name, or id when the field has no name
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Owning entity id, or `UnboundField` when the field was never registered
    pub fn bound_entity(&self) -> SchemaResult<&str> {
        self.entity_id
            .as_deref()
            .ok_or_else(|| SchemaError::UnboundField {
                field: self.id.clone(),
            })
    }

    pub(crate) fn normalize(&mut self, key: &str) {
        if self.id.is_empty() {
            self.id = key.to_string();
        }
        for (index, entry) in self.validation.iter_mut().enumerate() {
            if let RuleEntry::Inline(rule) = entry
                && rule.id.is_empty()
            {
                rule.id = format!("{}#{index}", self.id);
            }
        }
    }
}

/// Builder methods shared by every kind through its `meta` field
macro_rules! meta_builders {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl $kind {
                #[must_use]
                pub fn required(mut self) -> Self {
                    self.meta.required = true;
                    self
                }

                #[must_use]
                pub fn read_only(mut self) -> Self {
                    self.meta.read_only = true;
                    self
                }

                #[must_use]
                pub fn primary_key(mut self) -> Self {
                    self.meta.primary_key = true;
                    self
                }

                #[must_use]
                pub fn with_default(mut self, value: serde_json::Value) -> Self {
                    self.meta.default_value = Some(value);
                    self
                }

                #[must_use]
                pub fn with_description(mut self, description: impl Into<String>) -> Self {
                    self.meta.description = Some(description.into());
                    self
                }

                #[must_use]
                pub fn with_rule(mut self, entry: impl Into<$crate::rule::RuleEntry>) -> Self {
                    self.meta.validation.push(entry.into());
                    self
                }
            }
        )+
    };
}

pub(crate) use meta_builders;

#[cfg(test)]
mod tests {
    use super::*;
    use bdo_expression::ExpressionNode;
    use pretty_assertions::assert_eq;

    use crate::rule::ValidationRule;

    #[test]
    fn label_falls_back_to_id() {
        assert_eq!(FieldMeta::new("Price", "").label(), "Price");
        assert_eq!(FieldMeta::new("Price", "Unit price").label(), "Unit price");
    }

    #[test]
    fn unbound_meta_reports_field() {
        let err = FieldMeta::new("Category", "").bound_entity().unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNBOUND_FIELD");
    }

    #[test]
    fn normalize_names_inline_rules() {
        let mut meta = FieldMeta::default();
        let inline = ValidationRule::new("", ExpressionNode::literal(true));
        meta.validation.push(inline.into());
        meta.validation.push("RULE_A".into());
        meta.normalize("Stock");

        assert_eq!(meta.id, "Stock");
        let RuleEntry::Inline(rule) = &meta.validation[0] else {
            panic!("first entry should stay inline");
        };
        assert_eq!(rule.id, "Stock#0");
    }
}
