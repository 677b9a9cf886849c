use std::sync::Arc;

use serde_json::Value;

use super::Item;
use crate::field::{FieldDescriptor, FieldKind};
use crate::pipeline;
use crate::verdict::ValidationVerdict;

/// Read side of a field view, shared by both accessor shapes
pub trait Accessor {
    fn descriptor(&self) -> &FieldDescriptor;

    fn item(&self) -> &Item;

    fn id(&self) -> &str {
        self.descriptor().id()
    }

    fn label(&self) -> &str {
        self.descriptor().label()
    }

    fn kind(&self) -> FieldKind {
        self.descriptor().kind()
    }

    fn is_required(&self) -> bool {
        self.descriptor().is_required()
    }

    fn is_read_only(&self) -> bool {
        self.descriptor().is_read_only()
    }

    fn default_value(&self) -> Option<&Value> {
        self.descriptor().default_value()
    }

    /// Current value in the record
    fn get(&self) -> Option<&Value> {
        self.item().record.get(self.id())
    }

    /// Run the type, constraint and rule stages against the current record
    fn validate(&self) -> ValidationVerdict {
        let item = self.item();
        pipeline::validate_field(self.descriptor(), &item.record, item.entity.rules())
    }
}

/// View over a read-only field; offers no way to write
#[derive(Debug)]
pub struct ReadOnlyAccessor<'i> {
    descriptor: Arc<FieldDescriptor>,
    item: &'i Item,
}

impl<'i> ReadOnlyAccessor<'i> {
    pub(super) fn new(descriptor: Arc<FieldDescriptor>, item: &'i Item) -> Self {
        Self { descriptor, item }
    }
}

impl Accessor for ReadOnlyAccessor<'_> {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn item(&self) -> &Item {
        self.item
    }
}

/// View over an editable field
#[derive(Debug)]
pub struct EditableAccessor<'i> {
    descriptor: Arc<FieldDescriptor>,
    item: &'i mut Item,
}

impl<'i> EditableAccessor<'i> {
    pub(super) fn new(descriptor: Arc<FieldDescriptor>, item: &'i mut Item) -> Self {
        Self { descriptor, item }
    }

    /// Store `value`, returning the previous one
    pub fn set(&mut self, value: Value) -> Option<Value> {
        self.item.record.set(self.descriptor.id(), value)
    }

    /// Remove the value from the record
    pub fn clear(&mut self) -> Option<Value> {
        self.item.record.remove(self.descriptor.id())
    }
}

impl Accessor for EditableAccessor<'_> {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn item(&self) -> &Item {
        self.item
    }
}

/// Accessor of whichever shape the field's read-only flag dictates
#[derive(Debug)]
pub enum FieldAccessor<'i> {
    ReadOnly(ReadOnlyAccessor<'i>),
    Editable(EditableAccessor<'i>),
}

impl<'i> FieldAccessor<'i> {
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Editable(_))
    }

    /// The editable shape, or `None` for a read-only field
    #[must_use]
    pub fn into_editable(self) -> Option<EditableAccessor<'i>> {
        match self {
            Self::Editable(accessor) => Some(accessor),
            Self::ReadOnly(_) => None,
        }
    }
}

impl Accessor for FieldAccessor<'_> {
    fn descriptor(&self) -> &FieldDescriptor {
        match self {
            Self::ReadOnly(accessor) => accessor.descriptor(),
            Self::Editable(accessor) => accessor.descriptor(),
        }
    }

    fn item(&self) -> &Item {
        match self {
            Self::ReadOnly(accessor) => accessor.item(),
            Self::Editable(accessor) => accessor.item(),
        }
    }
}
