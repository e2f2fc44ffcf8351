use crate::constants::VARIABLE_TYPE_KEY;
use crate::error::{MigrationError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Makes an `Option` field mandatory on the wire: the key must be present,
/// though its value may be `null`.
fn required<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Keeps a type-specific value exactly as the registry sent it. The key must
/// be present; `null` stays `null`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)
}

/// Link from a defined variable to a person, keyed by email address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonReference {
    pub identifier: String,
}

impl PersonReference {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            identifier: email.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.identifier
    }
}

/// Attributes every defined variable carries regardless of its type.
///
/// `name` and `description` are multilingual objects in both registries and
/// are passed through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCommon {
    pub identifier: String,
    pub name: Value,
    pub description: Value,
    #[serde(deserialize_with = "required")]
    pub conforms_to: Option<String>,
    pub version: String,
    #[serde(deserialize_with = "required")]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_to: Option<String>,
    pub responsible_person: PersonReference,
    pub responsible_deputy: PersonReference,
    #[serde(default)]
    pub agency_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListFields {
    pub code_list_id: String,
}

/// Type-specific fields, copied to the concept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFields {
    #[serde(deserialize_with = "present")]
    pub max_value: Value,
    #[serde(deserialize_with = "present")]
    pub measurement_unit: Value,
    #[serde(deserialize_with = "present")]
    pub min_value: Value,
    #[serde(deserialize_with = "present")]
    pub number_decimals: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFields {
    #[serde(deserialize_with = "present")]
    pub max_length: Value,
    #[serde(deserialize_with = "present")]
    pub min_length: Value,
    #[serde(deserialize_with = "present")]
    pub pattern: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFields {
    #[serde(deserialize_with = "present")]
    pub pattern: Value,
}

/// The closed set of defined variable shapes
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    CodeList(CodeListFields),
    Numeric(NumericFields),
    String(StringFields),
    Date(DateFields),
}

impl VariableKind {
    pub fn name(&self) -> &'static str {
        match self {
            VariableKind::CodeList(_) => "CodeList",
            VariableKind::Numeric(_) => "Numeric",
            VariableKind::String(_) => "String",
            VariableKind::Date(_) => "Date",
        }
    }
}

/// A defined variable as published by the source registry
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVariable {
    pub common: VariableCommon,
    pub kind: VariableKind,
}

impl SourceVariable {
    /// Decode a raw source record, validating the fields its type requires.
    pub fn from_value(value: &Value) -> Result<Self> {
        let tag = value
            .get(VARIABLE_TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| MigrationError::MissingField(VARIABLE_TYPE_KEY.to_string()))?;

        // Reject unknown shapes before looking at any other field
        let kind = match tag {
            "CodeList" => VariableKind::CodeList(decode("defined variable", value)?),
            "Numeric" => VariableKind::Numeric(decode("defined variable", value)?),
            "String" => VariableKind::String(decode("defined variable", value)?),
            "Date" => VariableKind::Date(decode("defined variable", value)?),
            other => return Err(MigrationError::UnsupportedVariant(other.to_string())),
        };
        let common = decode("defined variable", value)?;

        Ok(Self { common, kind })
    }

    pub fn identifier(&self) -> &str {
        &self.common.identifier
    }

    /// Code list to fetch alongside this variable, if it has one
    pub fn code_list_id(&self) -> Option<&str> {
        match &self.kind {
            VariableKind::CodeList(fields) => Some(&fields.code_list_id),
            _ => None,
        }
    }

    pub fn persons(&self) -> [&PersonReference; 2] {
        [
            &self.common.responsible_person,
            &self.common.responsible_deputy,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeListHeader {
    identifier: String,
    #[serde(deserialize_with = "present")]
    code_list_entry_value_type: Value,
    #[serde(deserialize_with = "present")]
    code_list_entry_value_max_length: Value,
}

/// A code list together with its raw entries
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCodeList {
    pub identifier: String,
    pub code_list_entry_value_type: Value,
    pub code_list_entry_value_max_length: Value,
    pub entries: Vec<Value>,
}

impl SourceCodeList {
    pub fn from_parts(code_list: &Value, entries: Vec<Value>) -> Result<Self> {
        let header: CodeListHeader = decode("code list", code_list)?;
        Ok(Self {
            identifier: header.identifier,
            code_list_entry_value_type: header.code_list_entry_value_type,
            code_list_entry_value_max_length: header.code_list_entry_value_max_length,
            entries,
        })
    }
}

fn decode<T: for<'de> Deserialize<'de>>(kind: &'static str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| MigrationError::InvalidRecord {
        kind,
        message: e.to_string(),
    })
}
