use bdo_expression::value_utils::parse_datetime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::FieldType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanField {
    #[serde(flatten)]
    pub meta: FieldMeta,
}

/// Calendar date, sent as an ISO-8601 string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateField {
    #[serde(flatten)]
    pub meta: FieldMeta,
}

/// Instant, sent as an ISO-8601 string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeField {
    #[serde(flatten)]
    pub meta: FieldMeta,
}

macro_rules! scalar_kind {
    ($kind:ident, $check:expr, $message:literal) => {
        impl $kind {
            #[must_use]
            pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    meta: FieldMeta::new(id, name),
                }
            }
        }

        impl FieldType for $kind {
            fn meta(&self) -> &FieldMeta {
                &self.meta
            }

            fn type_errors(&self, value: &Value) -> Vec<String> {
                let check: fn(&Value) -> bool = $check;
                if check(value) {
                    Vec::new()
                } else {
                    vec![format!(concat!("{} ", $message), self.meta.label())]
                }
            }
        }
    };
}

scalar_kind!(BooleanField, Value::is_boolean, "must be a boolean");
scalar_kind!(DateField, is_date_text, "must be a valid date");
scalar_kind!(DateTimeField, is_date_text, "must be a valid date-time");
meta_builders!(BooleanField, DateField, DateTimeField);

fn is_date_text(value: &Value) -> bool {
    value.is_string() && parse_datetime(value).is_some()
}
