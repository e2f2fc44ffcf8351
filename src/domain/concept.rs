use crate::domain::variable::{DateFields, NumericFields, StringFields};
use serde::Serialize;
use serde_json::Value;

/// `{"data": ...}` wrapper the destination expects around every write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub type ConceptPayload = DataEnvelope<Concept>;
pub type EntryListPayload = DataEnvelope<Vec<CodeListEntry>>;
pub type PersonPayload = DataEnvelope<Vec<PersonRecord>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListConceptFields {
    pub code_list_entry_value_type: Value,
    pub code_list_entry_value_max_length: Value,
}

/// Type-specific part of a concept, tagged by `conceptType`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "conceptType")]
pub enum ConceptKind {
    CodeList(CodeListConceptFields),
    Numeric(NumericFields),
    String(StringFields),
    Date(DateFields),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublisherRef {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailRef {
    pub email: String,
}

/// Canonical destination representation of a defined variable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    #[serde(flatten)]
    pub kind: ConceptKind,
    pub conforms_to: Option<String>,
    pub description: Value,
    pub identifier: String,
    pub keywords: Vec<Value>,
    pub name: Value,
    pub publisher: PublisherRef,
    pub responsible_deputy: EmailRef,
    pub responsible_person: EmailRef,
    pub themes: Vec<Value>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub identifier: Value,
    pub text: Value,
    pub title: Value,
    #[serde(rename = "type")]
    pub annotation_type: Value,
    pub uri: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListEntry {
    pub annotations: Vec<Annotation>,
    pub code: Value,
    pub description: Value,
    pub name: Value,
    pub parent_code: Value,
}

/// Person created in the destination directory when a reference is unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub given_name: String,
    pub family_name: String,
    pub email: String,
}
