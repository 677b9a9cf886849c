use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::{FieldMeta, meta_builders};
use super::FieldType;

/// Allowed file extensions, compared case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionConstraint {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

impl ExtensionConstraint {
    fn rejected<'v>(&self, attachments: impl Iterator<Item = &'v Value>) -> Vec<String> {
        if self.extensions.is_empty() {
            return Vec::new();
        }
        attachments
            .filter_map(attachment_name)
            .filter(|name| !self.allows(name))
            .map(str::to_string)
            .collect()
    }

    fn allows(&self, file_name: &str) -> bool {
        let Some((_, extension)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions.iter().any(|allowed| {
            let allowed = allowed.trim_start_matches('.');
            allowed.eq_ignore_ascii_case(extension)
        })
    }
}

/// List of uploaded files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: ExtensionConstraint,
}

/// One uploaded image, or `null` once cleared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageField {
    #[serde(flatten)]
    pub meta: FieldMeta,

    #[serde(default)]
    pub constraint: ExtensionConstraint,
}

macro_rules! attachment_kind {
    ($kind:ident) => {
        impl $kind {
            #[must_use]
            pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    meta: FieldMeta::new(id, name),
                    constraint: ExtensionConstraint::default(),
                }
            }

            #[must_use]
            pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.constraint.extensions = extensions.into_iter().map(Into::into).collect();
                self
            }

            #[must_use]
            pub fn allowed_extensions(&self) -> &[String] {
                &self.constraint.extensions
            }
        }
    };
}

attachment_kind!(FileField);
attachment_kind!(ImageField);
meta_builders!(FileField, ImageField);

impl FieldType for FileField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        let label = self.meta.label();
        let Some(files) = value.as_array() else {
            return vec![format!("{label} must be a list of attachments")];
        };
        files
            .iter()
            .enumerate()
            .filter(|(_, file)| !has_key(file))
            .map(|(index, _)| format!("{label} attachment {} must carry a key", index + 1))
            .collect()
    }

    fn constraint_errors(&self, value: &Value) -> Vec<String> {
        let files = value.as_array().map(|files| files.iter());
        extension_errors(
            self.meta.label(),
            &self.constraint,
            files.into_iter().flatten(),
        )
    }
}

impl FieldType for ImageField {
    fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    fn type_errors(&self, value: &Value) -> Vec<String> {
        if has_key(value) {
            Vec::new()
        } else {
            vec![format!("{} must be an image attachment", self.meta.label())]
        }
    }

    fn constraint_errors(&self, value: &Value) -> Vec<String> {
        extension_errors(self.meta.label(), &self.constraint, std::iter::once(value))
    }
}

fn extension_errors<'v>(
    label: &str,
    constraint: &ExtensionConstraint,
    attachments: impl Iterator<Item = &'v Value>,
) -> Vec<String> {
    constraint
        .rejected(attachments)
        .into_iter()
        .map(|name| format!("{label} does not allow file `{name}`"))
        .collect()
}

fn has_key(value: &Value) -> bool {
    value.get("key").is_some_and(Value::is_string)
}

/// Original file name, falling back to the storage key
fn attachment_name(value: &Value) -> Option<&str> {
    value
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| value.get("key").and_then(Value::as_str))
}
