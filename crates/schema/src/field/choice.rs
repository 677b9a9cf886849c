use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::FieldType;
use crate::error::{SchemaError, SchemaResult};
use crate::source::{DataSource, OptionsRequest};

/// Static option list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumConstraint {
    #[serde(default, rename = "Enum", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// Single choice from a static or backend-provided option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: EnumConstraint,

    /// Options come from the data source instead of `Constraint.Enum`
    #[serde(default)]
    pub dynamic: bool,
}

impl SelectField {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(id, name),
            constraint: EnumConstraint::default(),
            dynamic: false,
        }
    }

    #[must_use]
    pub fn with_options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.constraint.values = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Static options from `Constraint.Enum`
    #[must_use]
    pub fn options(&self) -> &[Value] {
        &self.constraint.values
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Ask `source` for the options available to record `instance_id`
    pub async fn fetch_options(
        &self,
        source: &dyn DataSource,
        instance_id: &str,
    ) -> SchemaResult<Vec<Value>> {
        let entity_id = self.meta.bound_entity()?;
        let request = OptionsRequest {
            entity_id,
            field_id: &self.meta.id,
            instance_id,
        };
        tracing::debug!(entity = entity_id, field = %self.meta.id, "fetching select options");
        source
            .fetch_options(request)
            .await
            .map_err(SchemaError::DataSource)
    }
}

meta_builders!(SelectField);

impl FieldType for SelectField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        if value.is_string() || value.is_number() {
            Vec::new()
        } else {
            vec![format!("{} must be a single option", self.meta.label())]
        }
    }

    fn constraint_errors(&self, value: &Value) -> Vec<String> {
        if self.dynamic || self.constraint.values.is_empty() {
            return Vec::new();
        }
        if self.constraint.values.iter().any(|option| option == value) {
            Vec::new()
        } else {
            vec![format!(
                "{} must be one of the allowed options",
                self.meta.label()
            )]
        }
    }
}
