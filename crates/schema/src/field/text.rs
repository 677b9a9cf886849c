use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::FieldType;

/// Maximum length in characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LengthConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Single-line text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StringField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: LengthConstraint,
}

/// Multi-line text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: LengthConstraint,
}

macro_rules! text_kind {
    ($kind:ident) => {
        impl $kind {
            #[must_use]
            pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    meta: FieldMeta::new(id, name),
                    constraint: LengthConstraint::default(),
                }
            }

            #[must_use]
            pub fn with_max_length(mut self, length: usize) -> Self {
                self.constraint.length = Some(length);
                self
            }

            /// Character ceiling, if any
            #[must_use]
            pub fn max_length(&self) -> Option<usize> {
                self.constraint.length
            }
        }

        impl FieldType for $kind {
            fn meta(&self) -> &FieldMeta {
                &self.meta
            }

            fn type_errors(&self, value: &Value) -> Vec<String> {
                if value.is_string() {
                    Vec::new()
                } else {
                    vec![format!("{} must be a string", self.meta.label())]
                }
            }

            fn constraint_errors(&self, value: &Value) -> Vec<String> {
                length_errors(self.meta.label(), value, self.constraint.length)
            }
        }
    };
}

text_kind!(StringField);
text_kind!(TextField);
meta_builders!(StringField, TextField);

fn length_errors(label: &str, value: &Value, max: Option<usize>) -> Vec<String> {
    let (Some(max), Some(text)) = (max, value.as_str()) else {
        return Vec::new();
    };
    if text.chars().count() > max {
        vec![format!("{label} must be at most {max} characters")]
    } else {
        Vec::new()
    }
}
