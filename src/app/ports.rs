use crate::domain::{ConceptPayload, EntryListPayload, Environment, PersonPayload};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Status and body text of a destination write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read access to the source registry.
///
/// Single-record lookups return `Ok(None)` when the registry answers with a
/// non-success status; `Err` is reserved for transport failures.
#[async_trait]
pub trait SourceRegistryPort: Send + Sync {
    async fn get_variable(&self, variable_id: &str) -> Result<Option<Value>>;
    async fn get_code_list(&self, code_list_id: &str) -> Result<Option<Value>>;
    async fn get_code_list_entries(&self, code_list_id: &str) -> Result<Option<Vec<Value>>>;
    /// Every defined variable across all pages
    async fn list_variables(&self) -> Result<Vec<Value>>;
}

#[async_trait]
pub trait DestinationRegistryPort: Send + Sync {
    async fn get_person(&self, email: &str, env: Environment) -> Result<Option<Value>>;
    async fn create_person(&self, payload: &PersonPayload, env: Environment) -> Result<ApiResponse>;
    async fn create_concept(&self, payload: &ConceptPayload, env: Environment) -> Result<ApiResponse>;
    async fn import_code_list_entries(
        &self,
        concept_id: &str,
        payload: &EntryListPayload,
        env: Environment,
    ) -> Result<ApiResponse>;
    async fn set_registration_status(&self, concept_id: &str, env: Environment) -> Result<ApiResponse>;
    async fn set_publication_level(&self, concept_id: &str, env: Environment) -> Result<ApiResponse>;
    /// Every published concept of the configured publisher across all pages
    async fn list_concepts(&self) -> Result<Vec<Value>>;
}

/// Debug side channel for intermediate payloads. Implementations must not fail
/// the caller.
#[async_trait]
pub trait SnapshotPort: Send + Sync {
    async fn record(&self, name: &str, value: &Value);
}

/// Snapshot sink that drops everything
pub struct NoSnapshots;

#[async_trait]
impl SnapshotPort for NoSnapshots {
    async fn record(&self, _name: &str, _value: &Value) {}
}
