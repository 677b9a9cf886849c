//! Schema errors
//!
//! Validation failures are not errors; they travel as messages inside a
//! [`ValidationVerdict`](crate::ValidationVerdict). The variants here cover
//! misuse of the API (unknown field, write to a read-only field, fetch on an
//! unbound field), unreadable schema documents, and data source failures.

use thiserror::Error;

use crate::field::FieldKind;
use crate::source::BoxError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error raised by schema loading, item access and delegated fetches
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema or record document could not be deserialized
    #[error("Invalid schema document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// No field with this id exists on the entity
    #[error("Field `{field}` not found")]
    FieldNotFound {
        /// Requested field id
        field: String,
    },

    /// Attempted write to a read-only field
    #[error("Field `{field}` is not editable")]
    NotEditable {
        /// Field id
        field: String,
    },

    /// Fetch requested on a field that was never registered with an entity
    #[error("Field `{field}` is not bound to an entity")]
    UnboundField {
        /// Field id
        field: String,
    },

    /// Operation not offered by the field's kind
    #[error("Field `{field}` of kind {kind} does not support {operation}")]
    UnsupportedFieldKind {
        /// Field id
        field: String,
        /// Actual kind of the field
        kind: FieldKind,
        /// Operation that was requested
        operation: &'static str,
    },

    /// Failure reported by the host data source, passed through unchanged
    #[error(transparent)]
    DataSource(BoxError),
}

impl SchemaError {
    /// Stable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDocument(_) => "SCHEMA_INVALID_DOCUMENT",
            Self::FieldNotFound { .. } => "SCHEMA_FIELD_NOT_FOUND",
            Self::NotEditable { .. } => "SCHEMA_NOT_EDITABLE",
            Self::UnboundField { .. } => "SCHEMA_UNBOUND_FIELD",
            Self::UnsupportedFieldKind { .. } => "SCHEMA_UNSUPPORTED_FIELD_KIND",
            Self::DataSource(_) => "SCHEMA_DATA_SOURCE",
        }
    }

    pub(crate) fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    pub(crate) fn not_editable(field: impl Into<String>) -> Self {
        Self::NotEditable {
            field: field.into(),
        }
    }
}
