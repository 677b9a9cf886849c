//! Field type system
//!
//! A [`FieldDescriptor`] is a closed sum over the field kinds a schema can
//! declare. Every kind carries the shared [`FieldMeta`] plus its own
//! constraint attributes, and implements [`FieldType`] for the type and
//! constraint stages of validation.
//!
//! ```json
//! { "Type": "Number", "Name": "Price", "Required": true,
//!   "Constraint": { "IntegerPart": 6, "FractionPart": 2, "Min": 0 } }
//! ```

mod attachment;
mod choice;
mod composite;
mod meta;
mod number;
mod reference;
mod scalar;
pub mod system;
mod text;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use attachment::{ExtensionConstraint, FileField, ImageField};
pub use choice::{EnumConstraint, SelectField};
pub use composite::{ArrayField, ObjectField};
pub use meta::FieldMeta;
pub use number::{NumberConstraint, NumberField};
pub use reference::{ReferenceField, UserField};
pub use scalar::{BooleanField, DateField, DateTimeField};
pub use text::{LengthConstraint, StringField, TextField};

use crate::error::{SchemaError, SchemaResult};
use crate::source::DataSource;
use crate::verdict::ValidationVerdict;

/// Type and constraint checks of one field kind
pub trait FieldType {
    fn meta(&self) -> &FieldMeta;

    /// Type-level check of a present, non-null value
    fn type_errors(&self, value: &Value) -> Vec<String>;

    /// Kind-specific constraints on a non-blank value that passed the type check
    fn constraint_errors(&self, _value: &Value) -> Vec<String> {
        Vec::new()
    }

    /// Type-level validation; absent and `null` are always valid here
    fn validate(&self, value: Option<&Value>) -> ValidationVerdict {
        match value {
            None | Some(Value::Null) => ValidationVerdict::valid(),
            Some(value) => ValidationVerdict::from_errors(self.type_errors(value)),
        }
    }
}

/// Discriminant of [`FieldDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Text,
    Number,
    Boolean,
    Date,
    DateTime,
    Select,
    Reference,
    User,
    Array,
    Object,
    File,
    Image,
}

impl FieldKind {
    /// Wire tag
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Select => "Select",
            Self::Reference => "Reference",
            Self::User => "User",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::File => "File",
            Self::Image => "Image",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field declared by a schema, tagged by `"Type"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type")]
pub enum FieldDescriptor {
    String(StringField),
    Text(TextField),
    Number(NumberField),
    Boolean(BooleanField),
    Date(DateField),
    DateTime(DateTimeField),
    Select(SelectField),
    Reference(ReferenceField),
    User(UserField),
    Array(ArrayField),
    Object(ObjectField),
    File(FileField),
    Image(ImageField),
}

/// Run `$body` with `$field` bound to the variant's inner struct
macro_rules! dispatch {
    ($self:expr, $field:ident => $body:expr) => {
        match $self {
            Self::String($field) => $body,
            Self::Text($field) => $body,
            Self::Number($field) => $body,
            Self::Boolean($field) => $body,
            Self::Date($field) => $body,
            Self::DateTime($field) => $body,
            Self::Select($field) => $body,
            Self::Reference($field) => $body,
            Self::User($field) => $body,
            Self::Array($field) => $body,
            Self::Object($field) => $body,
            Self::File($field) => $body,
            Self::Image($field) => $body,
        }
    };
}

impl FieldDescriptor {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Text(_) => FieldKind::Text,
            Self::Number(_) => FieldKind::Number,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Date(_) => FieldKind::Date,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Select(_) => FieldKind::Select,
            Self::Reference(_) => FieldKind::Reference,
            Self::User(_) => FieldKind::User,
            Self::Array(_) => FieldKind::Array,
            Self::Object(_) => FieldKind::Object,
            Self::File(_) => FieldKind::File,
            Self::Image(_) => FieldKind::Image,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &FieldMeta {
        dispatch!(self, f => &f.meta)
    }

    pub fn meta_mut(&mut self) -> &mut FieldMeta {
        dispatch!(self, f => &mut f.meta)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.meta().id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.meta().label()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.meta().required
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.meta().read_only
    }

    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.meta().primary_key
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.meta().default_value.as_ref()
    }

    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.meta().entity_id.as_deref()
    }

    /// Attach the field to its owning entity
    pub fn bind(&mut self, entity_id: &str) {
        self.meta_mut().entity_id = Some(entity_id.to_string());
    }

    /// Type-level validation of the kind
    #[must_use]
    pub fn validate(&self, value: Option<&Value>) -> ValidationVerdict {
        dispatch!(self, f => f.validate(value))
    }

    /// Kind-specific constraint messages for a non-blank value
    #[must_use]
    pub fn constraint_errors(&self, value: &Value) -> Vec<String> {
        dispatch!(self, f => f.constraint_errors(value))
    }

    /// Row or property schema of array and object fields
    #[must_use]
    pub fn children(&self) -> Option<&indexmap::IndexMap<String, FieldDescriptor>> {
        match self {
            Self::Array(f) => Some(f.fields()),
            Self::Object(f) => Some(f.fields()),
            _ => None,
        }
    }

    /// Fill ids from declaration keys, recursing into nested schemas
    pub(crate) fn normalize(&mut self, key: &str) {
        self.meta_mut().normalize(key);
        match self {
            Self::Array(f) => f.normalize_children(),
            Self::Object(f) => f.normalize_children(),
            _ => {}
        }
    }

    /// Options of a select field, fetched from `source`
    pub async fn fetch_options(
        &self,
        source: &dyn DataSource,
        instance_id: &str,
    ) -> SchemaResult<Vec<Value>> {
        match self {
            Self::Select(f) => f.fetch_options(source, instance_id).await,
            other => Err(other.unsupported("fetch_options")),
        }
    }

    /// Candidate records of a reference field, fetched from `source`
    pub async fn fetch_records(
        &self,
        source: &dyn DataSource,
        instance_id: &str,
    ) -> SchemaResult<Vec<Value>> {
        match self {
            Self::Reference(f) => f.fetch_records(source, instance_id).await,
            other => Err(other.unsupported("fetch_records")),
        }
    }

    fn unsupported(&self, operation: &'static str) -> SchemaError {
        SchemaError::UnsupportedFieldKind {
            field: self.id().to_string(),
            kind: self.kind(),
            operation,
        }
    }
}

macro_rules! into_descriptor {
    ($($variant:ident($kind:ty)),+ $(,)?) => {
        $(
            impl From<$kind> for FieldDescriptor {
                fn from(field: $kind) -> Self {
                    Self::$variant(field)
                }
            }
        )+
    };
}

into_descriptor!(
    String(StringField),
    Text(TextField),
    Number(NumberField),
    Boolean(BooleanField),
    Date(DateField),
    DateTime(DateTimeField),
    Select(SelectField),
    Reference(ReferenceField),
    User(UserField),
    Array(ArrayField),
    Object(ObjectField),
    File(FileField),
    Image(ImageField),
);

/// Object carrying a non-empty string `_id`
pub(crate) fn has_identifier(value: &Value) -> bool {
    value
        .get("_id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_tagged_descriptor() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "Type": "Number",
            "Id": "Price",
            "Required": true,
            "Constraint": { "IntegerPart": 6, "FractionPart": 2, "Min": 0 }
        }))
        .unwrap();

        assert_eq!(field.kind(), FieldKind::Number);
        assert!(field.is_required());
        assert!(!field.is_read_only());
        let FieldDescriptor::Number(number) = &field else {
            panic!("expected number field");
        };
        assert_eq!(number.integer_digits(), Some(6));
        assert_eq!(number.min(), Some(0.0));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed: Result<FieldDescriptor, _> =
            serde_json::from_value(json!({ "Type": "Formula", "Id": "x" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn accepts_underscore_id_alias() {
        let field: FieldDescriptor =
            serde_json::from_value(json!({ "Type": "String", "_id": "Name" })).unwrap();
        assert_eq!(field.id(), "Name");
        assert_eq!(field.label(), "Name");
    }

    #[test]
    fn null_and_absent_pass_type_stage_for_every_kind() {
        let kinds = [
            "String", "Text", "Number", "Boolean", "Date", "DateTime", "Select", "Reference",
            "User", "Array", "Object", "File", "Image",
        ];
        for kind in kinds {
            let field: FieldDescriptor =
                serde_json::from_value(json!({ "Type": kind, "Id": "f" })).unwrap();
            assert_eq!(field.kind().as_str(), kind);
            assert!(field.validate(None).is_valid(), "{kind} absent");
            assert!(field.validate(Some(&Value::Null)).is_valid(), "{kind} null");
        }
    }

    #[tokio::test]
    async fn fetch_on_wrong_kind_is_unsupported() {
        struct Never;

        #[async_trait::async_trait]
        impl DataSource for Never {
            async fn fetch_options(
                &self,
                _: crate::source::OptionsRequest<'_>,
            ) -> Result<Vec<Value>, crate::source::BoxError> {
                unreachable!()
            }

            async fn fetch_records(
                &self,
                _: crate::source::ReferenceRequest<'_>,
            ) -> Result<Vec<Value>, crate::source::BoxError> {
                unreachable!()
            }
        }

        let field = FieldDescriptor::from(NumberField::new("Price", "Price"));
        let err = field.fetch_options(&Never, "r1").await.unwrap_err();
        assert_eq!(err.code(), "SCHEMA_UNSUPPORTED_FIELD_KIND");
    }
}
