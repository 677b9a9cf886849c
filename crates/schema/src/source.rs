//! Host-provided data access
//!
//! Dynamic select options and reference candidates live behind the backend.
//! The runtime never performs that I/O itself; it builds a request and hands
//! it to a [`DataSource`] supplied by the host.

use async_trait::async_trait;
use serde_json::Value;

/// Boxed error returned by data source implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Request for the dynamic options of a select field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsRequest<'a> {
    pub entity_id: &'a str,
    pub field_id: &'a str,
    /// Identifier of the record being edited
    pub instance_id: &'a str,
}

/// Request for candidate records of a reference field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRequest<'a> {
    pub entity_id: &'a str,
    pub field_id: &'a str,
    /// Identifier of the record being edited
    pub instance_id: &'a str,
    /// Entity the reference points at
    pub target_entity: &'a str,
    /// Fields to project from each candidate
    pub fields: &'a [String],
}

/// Asynchronous collaborator resolving options and referenced records
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Options for a dynamic select field
    async fn fetch_options(&self, request: OptionsRequest<'_>) -> Result<Vec<Value>, BoxError>;

    /// Candidate records for a reference field
    async fn fetch_records(&self, request: ReferenceRequest<'_>) -> Result<Vec<Value>, BoxError>;
}
