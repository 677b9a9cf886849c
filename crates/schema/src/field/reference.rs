use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::{FieldType, has_identifier};
use crate::error::{SchemaError, SchemaResult};
use crate::source::{DataSource, ReferenceRequest};

/// Link to a record of another entity
///
/// The stored value is an object carrying at least the target's `_id`, plus
/// whichever projected fields the backend copied alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    /// Target entity id
    #[serde(default)]
    pub entity: String,

    /// Field ids projected from the target
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ReferenceField {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        target_entity: impl Into<String>,
    ) -> Self {
        Self {
            meta: FieldMeta::new(id, name),
            entity: target_entity.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn target_entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn projected_fields(&self) -> &[String] {
        &self.fields
    }

    /// Ask `source` for records of the target entity that record
    /// `instance_id` may link to
    pub async fn fetch_records(
        &self,
        source: &dyn DataSource,
        instance_id: &str,
    ) -> SchemaResult<Vec<Value>> {
        let entity_id = self.meta.bound_entity()?;
        let request = ReferenceRequest {
            entity_id,
            field_id: &self.meta.id,
            instance_id,
            target_entity: &self.entity,
            fields: &self.fields,
        };
        tracing::debug!(
            entity = entity_id,
            field = %self.meta.id,
            target = %self.entity,
            "fetching reference candidates"
        );
        source
            .fetch_records(request)
            .await
            .map_err(SchemaError::DataSource)
    }
}

/// Link to a platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserField {
    #[serde(flatten)]
    pub meta: FieldMeta,
}

impl UserField {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: FieldMeta::new(id, name),
        }
    }
}

meta_builders!(ReferenceField, UserField);

impl FieldType for ReferenceField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        if has_identifier(value) {
            Vec::new()
        } else {
            vec![format!(
                "{} must be a reference carrying an _id",
                self.meta.label()
            )]
        }
    }
}

impl FieldType for UserField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        if has_identifier(value) {
            Vec::new()
        } else {
            vec![format!("{} must be a user carrying an _id", self.meta.label())]
        }
    }
}
