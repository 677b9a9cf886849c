//! Evaluation context
//!
//! Field values of the record under validation plus the system values
//! (`NOW`, `TODAY`, `CURRENT_USER`) a rule may reference.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::value_utils::format_iso;

/// Names of the system identifiers supplied by the runtime
pub mod system {
    /// Current instant, `YYYY-MM-DDTHH:MM:SS.mmmZ`
    pub const NOW: &str = "NOW";
    /// Start of the current UTC day, same format as `NOW`
    pub const TODAY: &str = "TODAY";
    /// The acting user's record, or null
    pub const CURRENT_USER: &str = "CURRENT_USER";
}

/// Runtime-supplied values addressable through `SystemIdentifier` nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemValues {
    values: HashMap<String, Value>,
}

impl SystemValues {
    /// Empty set; every system identifier resolves to null
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `NOW`/`TODAY` from the wall clock
    pub fn capture(current_user: Option<Value>) -> Self {
        Self::at(Utc::now(), current_user)
    }

    /// Values as of `now`
    pub fn at(now: DateTime<Utc>, current_user: Option<Value>) -> Self {
        let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self::new()
            .with(system::NOW, Value::String(format_iso(now)))
            .with(system::TODAY, Value::String(format_iso(today)))
            .with(system::CURRENT_USER, current_user.unwrap_or(Value::Null))
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Evaluation context containing the record and the system values
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    fields: Map<String, Value>,
    system: SystemValues,
}

impl EvaluationContext {
    /// Create a new empty evaluation context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context over `fields` with the given system values
    pub fn with_fields(fields: Map<String, Value>, system: SystemValues) -> Self {
        Self { fields, system }
    }

    pub fn builder() -> EvaluationContextBuilder {
        EvaluationContextBuilder::new()
    }

    /// Field value, `None` when the record does not carry it
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn system(&self, name: &str) -> Option<&Value> {
        self.system.get(name)
    }

    pub fn system_values(&self) -> &SystemValues {
        &self.system
    }

    pub fn set_system(&mut self, name: impl Into<String>, value: Value) {
        self.system.set(name, value);
    }
}

/// Builder for creating evaluation contexts
#[derive(Debug, Default)]
pub struct EvaluationContextBuilder {
    fields: Map<String, Value>,
    system: SystemValues,
}

impl EvaluationContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Merge a whole record; later `field` calls override it
    #[must_use]
    pub fn fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn system_values(mut self, system: SystemValues) -> Self {
        self.system = system;
        self
    }

    #[must_use]
    pub fn system(mut self, name: impl Into<String>, value: Value) -> Self {
        self.system.set(name, value);
        self
    }

    #[must_use]
    pub fn current_user(self, user: Value) -> Self {
        self.system(system::CURRENT_USER, user)
    }

    pub fn build(self) -> EvaluationContext {
        EvaluationContext {
            fields: self.fields,
            system: self.system,
        }
    }
}
