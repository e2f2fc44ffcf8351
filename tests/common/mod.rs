#![allow(dead_code)]

use async_trait::async_trait;
use concept_migrator::app::ports::{
    ApiResponse, DestinationRegistryPort, SnapshotPort, SourceRegistryPort,
};
use concept_migrator::domain::{ConceptPayload, EntryListPayload, Environment, PersonPayload};
use concept_migrator::error::{MigrationError, Result};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn timeout() -> MigrationError {
    MigrationError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"))
}

#[derive(Default)]
pub struct MockSource {
    pub calls: CallLog,
    pub variables: HashMap<String, Value>,
    pub code_lists: HashMap<String, Value>,
    pub entries: HashMap<String, Vec<Value>>,
    pub export: Vec<Value>,
}

impl MockSource {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }
}

#[async_trait]
impl SourceRegistryPort for MockSource {
    async fn get_variable(&self, variable_id: &str) -> Result<Option<Value>> {
        self.calls.lock().await.push(format!("get_variable:{variable_id}"));
        Ok(self.variables.get(variable_id).cloned())
    }

    async fn get_code_list(&self, code_list_id: &str) -> Result<Option<Value>> {
        self.calls.lock().await.push(format!("get_code_list:{code_list_id}"));
        Ok(self.code_lists.get(code_list_id).cloned())
    }

    async fn get_code_list_entries(&self, code_list_id: &str) -> Result<Option<Vec<Value>>> {
        self.calls.lock().await.push(format!("get_code_list_entries:{code_list_id}"));
        Ok(self.entries.get(code_list_id).cloned())
    }

    async fn list_variables(&self) -> Result<Vec<Value>> {
        self.calls.lock().await.push("list_variables".to_string());
        Ok(self.export.clone())
    }
}

pub struct MockDestination {
    pub calls: CallLog,
    pub directory: Mutex<HashSet<String>>,
    pub unreachable_emails: HashSet<String>,
    pub concepts: Mutex<Vec<Value>>,
    pub imports: Mutex<Vec<Value>>,
    pub concept_response: ApiResponse,
    pub import_response: ApiResponse,
    pub status_response: ApiResponse,
    pub publication_response: ApiResponse,
    pub export: Vec<Value>,
}

impl MockDestination {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            directory: Mutex::new(HashSet::new()),
            unreachable_emails: HashSet::new(),
            concepts: Mutex::new(Vec::new()),
            imports: Mutex::new(Vec::new()),
            concept_response: ApiResponse::new(201, "\"08dd-concept-1\""),
            import_response: ApiResponse::new(200, "imported"),
            status_response: ApiResponse::new(200, ""),
            publication_response: ApiResponse::new(200, ""),
            export: Vec::new(),
        }
    }

    pub fn with_people(self, emails: &[&str]) -> Self {
        let directory = emails.iter().map(|e| e.to_string()).collect();
        Self {
            directory: Mutex::new(directory),
            ..self
        }
    }
}

#[async_trait]
impl DestinationRegistryPort for MockDestination {
    async fn get_person(&self, email: &str, env: Environment) -> Result<Option<Value>> {
        self.calls.lock().await.push(format!("get_person:{email}:{env}"));
        if self.unreachable_emails.contains(email) {
            return Err(timeout());
        }
        let known = self.directory.lock().await.contains(email);
        Ok(known.then(|| json!({"email": email})))
    }

    async fn create_person(&self, payload: &PersonPayload, env: Environment) -> Result<ApiResponse> {
        let mut directory = self.directory.lock().await;
        for person in &payload.data {
            self.calls
                .lock()
                .await
                .push(format!("create_person:{}:{env}", person.email));
            directory.insert(person.email.clone());
        }
        Ok(ApiResponse::new(201, "created"))
    }

    async fn create_concept(&self, payload: &ConceptPayload, env: Environment) -> Result<ApiResponse> {
        self.calls.lock().await.push(format!("create_concept:{env}"));
        self.concepts
            .lock()
            .await
            .push(serde_json::to_value(payload).expect("concept serializes"));
        Ok(self.concept_response.clone())
    }

    async fn import_code_list_entries(
        &self,
        concept_id: &str,
        payload: &EntryListPayload,
        env: Environment,
    ) -> Result<ApiResponse> {
        self.calls
            .lock()
            .await
            .push(format!("import_code_list_entries:{concept_id}:{env}"));
        self.imports
            .lock()
            .await
            .push(serde_json::to_value(payload).expect("entries serialize"));
        Ok(self.import_response.clone())
    }

    async fn set_registration_status(&self, concept_id: &str, env: Environment) -> Result<ApiResponse> {
        self.calls
            .lock()
            .await
            .push(format!("set_registration_status:{concept_id}:{env}"));
        Ok(self.status_response.clone())
    }

    async fn set_publication_level(&self, concept_id: &str, env: Environment) -> Result<ApiResponse> {
        self.calls
            .lock()
            .await
            .push(format!("set_publication_level:{concept_id}:{env}"));
        Ok(self.publication_response.clone())
    }

    async fn list_concepts(&self) -> Result<Vec<Value>> {
        self.calls.lock().await.push("list_concepts".to_string());
        Ok(self.export.clone())
    }
}

/// Keeps every snapshot in memory
#[derive(Default)]
pub struct MemorySnapshots {
    pub records: Mutex<Vec<(String, Value)>>,
}

impl MemorySnapshots {
    pub async fn names(&self) -> Vec<String> {
        self.records
            .lock()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub async fn get(&self, name: &str) -> Option<Value> {
        self.records
            .lock()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }
}

#[async_trait]
impl SnapshotPort for MemorySnapshots {
    async fn record(&self, name: &str, value: &Value) {
        self.records
            .lock()
            .await
            .push((name.to_string(), value.clone()));
    }
}

pub const PERSON: &str = "jane.doe@example.ch";
pub const DEPUTY: &str = "max.muster@example.ch";

pub fn variable(id: &str, kind: &str, extra: Value) -> Value {
    let mut raw = json!({
        "definedVariableType": kind,
        "identifier": id,
        "name": {"de": "Name", "en": "Name"},
        "description": {"de": "Beschreibung", "en": "Description"},
        "conformsTo": null,
        "version": "1.0.0",
        "validFrom": "2024-01-01T00:00:00",
        "responsiblePerson": {"identifier": PERSON},
        "responsibleDeputy": {"identifier": DEPUTY},
        "agencyId": "agency-1"
    });
    for (key, value) in extra.as_object().expect("extra is an object") {
        raw[key] = value.clone();
    }
    raw
}

pub fn code_list_header(id: &str) -> Value {
    json!({
        "identifier": id,
        "codeListEntryValueType": "String",
        "codeListEntryValueMaxLength": 2
    })
}
