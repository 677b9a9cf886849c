//! Entity descriptor

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::document::{RuleTable, SchemaDocument};
use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldDescriptor, system};
use crate::pipeline;
use crate::record::Record;
use crate::rule::RuleEngine;
use crate::verdict::ValidationVerdict;

/// Field schema and rules of one entity
///
/// The complete field map (system fields followed by business fields, each
/// bound to this entity) is assembled on first access and fixed afterwards.
/// Rules can be reloaded at any time through [`load_schema`](Self::load_schema).
#[derive(Debug)]
pub struct EntityDescriptor {
    id: String,
    name: Option<String>,
    declared: IndexMap<String, FieldDescriptor>,
    table: RuleTable,
    fields: OnceLock<IndexMap<String, Arc<FieldDescriptor>>>,
    rules: RuleEngine,
}

impl EntityDescriptor {
    /// Entity with system fields only and no rules
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            declared: IndexMap::new(),
            table: RuleTable::default(),
            fields: OnceLock::new(),
            rules: RuleEngine::new(),
        }
    }

    /// Entity described by `document`, with its rules loaded
    #[must_use]
    pub fn from_schema(mut document: SchemaDocument) -> Self {
        document.normalize();
        let rules = RuleEngine::new();
        rules.load_schema(&document);
        Self {
            id: document.id,
            name: document.name,
            declared: document.fields,
            table: document.rules,
            fields: OnceLock::new(),
            rules,
        }
    }

    pub fn from_json(json: &str) -> SchemaResult<Self> {
        SchemaDocument::from_json(json).map(Self::from_schema)
    }

    /// Declare a business field and reindex the rules it carries
    #[must_use]
    pub fn with_field(mut self, field: impl Into<FieldDescriptor>) -> Self {
        let field = field.into();
        self.declared.insert(field.id().to_string(), field);
        self.fields = OnceLock::new();
        self.rules.load_schema(&self.document());
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// All fields in declaration order, system fields first
    pub fn fields(&self) -> &IndexMap<String, Arc<FieldDescriptor>> {
        self.fields.get_or_init(|| self.assemble_fields())
    }

    #[must_use]
    pub fn field(&self, id: &str) -> Option<&Arc<FieldDescriptor>> {
        self.fields().get(id)
    }

    #[must_use]
    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Replace the rule index from a freshly fetched document
    ///
    /// Field definitions stay as registered.
    pub fn load_schema(&self, document: &SchemaDocument) {
        self.rules.load_schema(document);
    }

    /// Run the field pipeline for `field_id` against `record`
    pub fn validate_field(
        &self,
        field_id: &str,
        record: &Record,
    ) -> SchemaResult<ValidationVerdict> {
        let field = self
            .field(field_id)
            .ok_or_else(|| SchemaError::field_not_found(field_id))?;
        Ok(pipeline::validate_field(field, record, &self.rules))
    }

    /// Validate every editable field of `record`
    #[must_use]
    pub fn validate(&self, record: &Record) -> ValidationVerdict {
        pipeline::validate_record(
            self.fields().values().map(Arc::as_ref),
            record,
            &self.rules,
        )
    }

    fn document(&self) -> SchemaDocument {
        SchemaDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            fields: self.declared.clone(),
            rules: self.table.clone(),
        }
    }

    fn assemble_fields(&self) -> IndexMap<String, Arc<FieldDescriptor>> {
        let mut fields: IndexMap<String, FieldDescriptor> = system::system_fields()
            .into_iter()
            .map(|field| (field.id().to_string(), field))
            .collect();

        for (id, field) in &self.declared {
            let mut field = field.clone();
            if system::is_system_field(id) {
                field.meta_mut().read_only = true;
            }
            fields.insert(id.clone(), field);
        }

        fields
            .into_iter()
            .map(|(id, mut field)| {
                field.bind(&self.id);
                (id, Arc::new(field))
            })
            .collect()
    }
}
