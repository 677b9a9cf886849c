use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::{FieldDescriptor, FieldType, has_identifier};

/// Table of rows; every row is an object carrying its own `_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArrayField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    /// Row schema
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldDescriptor>,
}

/// Nested object with a fixed property schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    /// Property schema
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldDescriptor>,
}

macro_rules! composite_kind {
    ($kind:ident) => {
        impl $kind {
            #[must_use]
            pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    meta: FieldMeta::new(id, name),
                    fields: IndexMap::new(),
                }
            }

            /// Add a nested field keyed by its id
            #[must_use]
            pub fn with_field(mut self, field: impl Into<FieldDescriptor>) -> Self {
                let field = field.into();
                self.fields.insert(field.id().to_string(), field);
                self
            }

            #[must_use]
            pub fn fields(&self) -> &IndexMap<String, FieldDescriptor> {
                &self.fields
            }

            pub(super) fn normalize_children(&mut self) {
                for (key, child) in &mut self.fields {
                    child.normalize(key);
                }
            }
        }
    };
}

composite_kind!(ArrayField);
composite_kind!(ObjectField);
meta_builders!(ArrayField, ObjectField);

impl FieldType for ArrayField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        let label = self.meta.label();
        let Some(rows) = value.as_array() else {
            return vec![format!("{label} must be an array")];
        };

        let mut errors = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let position = index + 1;
            if !has_identifier(row) {
                errors.push(format!(
                    "{label} row {position} must be an object carrying an _id"
                ));
                continue;
            }
            errors.extend(
                nested_errors(&self.fields, row)
                    .into_iter()
                    .map(|message| format!("{label} row {position}: {message}")),
            );
        }
        errors
    }
}

impl FieldType for ObjectField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        let label = self.meta.label();
        if !value.is_object() {
            return vec![format!("{label} must be an object")];
        }
        nested_errors(&self.fields, value)
            .into_iter()
            .map(|message| format!("{label}: {message}"))
            .collect()
    }
}

/// Type-check each declared property of `object`
fn nested_errors(schema: &IndexMap<String, FieldDescriptor>, object: &Value) -> Vec<String> {
    schema
        .iter()
        .flat_map(|(id, field)| field.validate(object.get(id)).into_errors())
        .collect()
}
