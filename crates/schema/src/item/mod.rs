//! Editable view over one record of an entity
//!
//! An [`Item`] pairs a record with its [`EntityDescriptor`] and hands out
//! per-field accessors. Read-only fields yield a [`ReadOnlyAccessor`], which
//! has no mutator at all; editable fields yield an [`EditableAccessor`].
//!
//! ```rust,ignore
//! let mut item = Item::new(entity, record);
//! item.editable("Price")?.set(json!(50));
//! let verdict = item.field("Price")?.validate();
//! ```

mod accessor;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

pub use accessor::{Accessor, EditableAccessor, FieldAccessor, ReadOnlyAccessor};

use crate::entity::EntityDescriptor;
use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldDescriptor;
use crate::record::Record;
use crate::source::DataSource;
use crate::verdict::ValidationVerdict;

/// One record being viewed or edited
///
/// Single-writer: mutation goes through `&mut self`. Field bindings are
/// cached per field id on first access.
#[derive(Debug)]
pub struct Item {
    entity: Arc<EntityDescriptor>,
    record: Record,
    bindings: HashMap<String, Arc<FieldDescriptor>>,
}

impl Item {
    #[must_use]
    pub fn new(entity: Arc<EntityDescriptor>, record: Record) -> Self {
        Self {
            entity,
            record,
            bindings: HashMap::new(),
        }
    }

    /// New record seeded with the default values of editable fields
    #[must_use]
    pub fn draft(entity: Arc<EntityDescriptor>) -> Self {
        let record = entity
            .fields()
            .values()
            .filter(|field| !field.is_read_only())
            .filter_map(|field| {
                field
                    .default_value()
                    .map(|value| (field.id().to_string(), value.clone()))
            })
            .collect();
        Self::new(entity, record)
    }

    #[must_use]
    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }

    /// Record `_id`, if assigned
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    #[must_use]
    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.record.get(field_id)
    }

    /// Accessor for `field_id`, shaped by the field's read-only flag
    pub fn field(&mut self, field_id: &str) -> SchemaResult<FieldAccessor<'_>> {
        let descriptor = self.binding(field_id)?;
        if descriptor.is_read_only() {
            Ok(FieldAccessor::ReadOnly(ReadOnlyAccessor::new(descriptor, self)))
        } else {
            Ok(FieldAccessor::Editable(EditableAccessor::new(descriptor, self)))
        }
    }

    /// Editable accessor, or `NotEditable` for a read-only field
    pub fn editable(&mut self, field_id: &str) -> SchemaResult<EditableAccessor<'_>> {
        self.field(field_id)?
            .into_editable()
            .ok_or_else(|| SchemaError::not_editable(field_id))
    }

    /// Write `value` into an editable field
    pub fn set(&mut self, field_id: &str, value: Value) -> SchemaResult<Option<Value>> {
        Ok(self.editable(field_id)?.set(value))
    }

    /// Validate one field against the current record
    pub fn validate_field(&mut self, field_id: &str) -> SchemaResult<ValidationVerdict> {
        Ok(self.field(field_id)?.validate())
    }

    /// Validate every editable field
    #[must_use]
    pub fn validate(&self) -> ValidationVerdict {
        self.entity.validate(&self.record)
    }

    /// Number of field bindings cached so far
    #[must_use]
    pub fn cached_fields(&self) -> usize {
        self.bindings.len()
    }

    /// Dynamic options of select field `field_id` for this record
    pub async fn fetch_options(
        &self,
        field_id: &str,
        source: &dyn DataSource,
    ) -> SchemaResult<Vec<Value>> {
        let field = self.lookup(field_id)?;
        field.fetch_options(source, self.instance_id()).await
    }

    /// Candidate records of reference field `field_id` for this record
    pub async fn fetch_references(
        &self,
        field_id: &str,
        source: &dyn DataSource,
    ) -> SchemaResult<Vec<Value>> {
        let field = self.lookup(field_id)?;
        field.fetch_records(source, self.instance_id()).await
    }

    fn instance_id(&self) -> &str {
        self.record.id().unwrap_or_default()
    }

    fn lookup(&self, field_id: &str) -> SchemaResult<&Arc<FieldDescriptor>> {
        self.bindings
            .get(field_id)
            .or_else(|| self.entity.field(field_id))
            .ok_or_else(|| SchemaError::field_not_found(field_id))
    }

    fn binding(&mut self, field_id: &str) -> SchemaResult<Arc<FieldDescriptor>> {
        if let Some(descriptor) = self.bindings.get(field_id) {
            return Ok(Arc::clone(descriptor));
        }
        let descriptor = Arc::clone(self.lookup(field_id)?);
        self.bindings
            .insert(field_id.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::field::{BooleanField, NumberField, StringField};

    fn entity() -> Arc<EntityDescriptor> {
        let active = BooleanField::new("Active", "")
            .with_default(json!(true))
            .read_only();
        Arc::new(
            EntityDescriptor::new("Product")
                .with_field(StringField::new("Name", "").required())
                .with_field(NumberField::new("Stock", "").with_default(json!(0)))
                .with_field(active),
        )
    }

    #[test]
    fn draft_seeds_editable_defaults_only() {
        let item = Item::draft(entity());
        assert_eq!(item.get("Stock"), Some(&json!(0)));
        assert_eq!(item.get("Active"), None);
        assert_eq!(item.id(), None);
    }

    #[test]
    fn accessor_shape_follows_read_only_flag() {
        let mut item = Item::new(entity(), Record::new().with("_id", json!("p1")));
        assert!(item.field("Name").unwrap().is_editable());

        let id = item.field("_id").unwrap();
        assert!(!id.is_editable());
        assert_eq!(id.get(), Some(&json!("p1")));
        assert!(id.into_editable().is_none());
    }

    #[test]
    fn set_writes_through_editable_accessor() {
        let mut item = Item::new(entity(), Record::new());
        let mut name = item.editable("Name").unwrap();
        assert_eq!(name.set(json!("Widget")), None);
        assert_eq!(name.get(), Some(&json!("Widget")));
        assert_eq!(name.clear(), Some(json!("Widget")));
        assert!(!item.record().contains("Name"));
    }

    #[test]
    fn read_only_fields_reject_writes() {
        let mut item = Item::new(entity(), Record::new());
        let err = item.set("Active", json!(false)).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_NOT_EDITABLE");
        assert!(matches!(
            item.editable("_version"),
            Err(SchemaError::NotEditable { field }) if field == "_version"
        ));
    }

    #[test]
    fn bindings_are_cached_per_field() {
        let mut item = Item::new(entity(), Record::new());
        item.field("Name").unwrap();
        item.field("Name").unwrap();
        item.field("Stock").unwrap();
        assert_eq!(item.cached_fields(), 2);
        let err = item.field("Colour").unwrap_err();
        assert_eq!(err.code(), "SCHEMA_FIELD_NOT_FOUND");
        assert_eq!(item.cached_fields(), 2);
    }

    #[test]
    fn accessor_metadata() {
        let mut item = Item::new(entity(), Record::new());
        let stock = item.field("Stock").unwrap();
        assert_eq!(stock.label(), "Stock");
        assert!(!stock.is_required());
        assert_eq!(stock.default_value(), Some(&json!(0)));
        assert_eq!(stock.descriptor().entity_id(), Some("Product"));
    }
}
