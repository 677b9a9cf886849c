//! # bdo-schema
//!
//! Schema-driven validation for Business Data Object records.
//!
//! An [`EntityDescriptor`] is built from a backend [`SchemaDocument`]: its
//! field map (system fields plus declared business fields) and a
//! [`RuleEngine`] indexing the expression rules attached to each field. An
//! [`Item`] wraps one [`Record`] of that entity and hands out per-field
//! accessors that validate in three stages: type, constraints, rules.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bdo_schema::prelude::*;
//! use serde_json::json;
//!
//! let entity = Arc::new(EntityDescriptor::from_json(r#"{
//!     "Id": "Product",
//!     "Fields": {
//!         "Price": { "Type": "Number", "Required": true, "Constraint": { "Min": 0 } }
//!     }
//! }"#)?);
//!
//! let mut item = Item::new(entity, Record::new());
//! item.set("Price", json!(-1))?;
//! let verdict = item.field("Price")?.validate();
//! assert_eq!(verdict.errors(), ["Price must be at least 0"]);
//! # Ok::<(), SchemaError>(())
//! ```

#![forbid(unsafe_code)]

pub mod document;
pub mod entity;
pub mod error;
pub mod field;
pub mod item;
mod pipeline;
pub mod record;
pub mod rule;
pub mod source;
pub mod verdict;

pub use document::{RuleTable, SchemaDocument};
pub use entity::EntityDescriptor;
pub use error::{SchemaError, SchemaResult};
pub use field::{FieldDescriptor, FieldKind, FieldMeta, FieldType};
pub use item::{Accessor, EditableAccessor, FieldAccessor, Item, ReadOnlyAccessor};
pub use record::{Record, is_blank};
pub use rule::{RuleEngine, RuleEntry, RuleEvaluationFailed, ValidationRule};
pub use source::{BoxError, DataSource, OptionsRequest, ReferenceRequest};
pub use verdict::ValidationVerdict;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Accessor, DataSource, EntityDescriptor, FieldAccessor, FieldDescriptor, FieldKind, Item,
        Record, RuleEngine, SchemaDocument, SchemaError, SchemaResult, ValidationRule,
        ValidationVerdict,
    };
}
