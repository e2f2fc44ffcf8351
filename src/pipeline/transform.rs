use crate::domain::{
    CodeListConceptFields, Concept, ConceptKind, ConceptPayload, DataEnvelope, EmailRef,
    EntryListPayload, PublisherRef, SourceCodeList, SourceVariable, VariableKind,
};
use crate::error::{MigrationError, Result};
use crate::pipeline::code_list_entry::map_entry;
use tracing::debug;

/// Payloads produced for one defined variable
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedVariable {
    pub concept: ConceptPayload,
    /// Only present for code list variables
    pub entry_list: Option<EntryListPayload>,
}

/// Maps source defined variables onto destination concepts
#[derive(Debug, Clone)]
pub struct SchemaTransformer {
    publisher_identifier: String,
}

impl SchemaTransformer {
    pub fn new(publisher_identifier: impl Into<String>) -> Self {
        Self {
            publisher_identifier: publisher_identifier.into(),
        }
    }

    /// Build the concept payload, and for code list variables the entry list.
    ///
    /// A code list variable without its code list fails with
    /// `MissingDependency`; the other types ignore `code_list`.
    pub fn transform(
        &self,
        variable: &SourceVariable,
        code_list: Option<&SourceCodeList>,
    ) -> Result<TransformedVariable> {
        let (kind, entry_list) = match &variable.kind {
            VariableKind::CodeList(fields) => {
                let code_list = code_list.ok_or_else(|| {
                    MigrationError::MissingDependency(format!(
                        "code list {} for defined variable {}",
                        fields.code_list_id,
                        variable.identifier()
                    ))
                })?;
                let entries: Vec<_> = code_list.entries.iter().map(map_entry).collect();
                debug!(
                    code_list = %code_list.identifier,
                    entries = entries.len(),
                    "Mapped code list entries"
                );
                (
                    ConceptKind::CodeList(CodeListConceptFields {
                        code_list_entry_value_type: code_list.code_list_entry_value_type.clone(),
                        code_list_entry_value_max_length: code_list
                            .code_list_entry_value_max_length
                            .clone(),
                    }),
                    Some(DataEnvelope::new(entries)),
                )
            }
            VariableKind::Numeric(fields) => (ConceptKind::Numeric(fields.clone()), None),
            VariableKind::String(fields) => (ConceptKind::String(fields.clone()), None),
            VariableKind::Date(fields) => (ConceptKind::Date(fields.clone()), None),
        };

        let common = &variable.common;
        let concept = Concept {
            kind,
            conforms_to: common.conforms_to.clone(),
            description: common.description.clone(),
            identifier: common.identifier.clone(),
            keywords: Vec::new(),
            name: common.name.clone(),
            publisher: PublisherRef {
                identifier: self.publisher_identifier.clone(),
            },
            responsible_deputy: EmailRef {
                email: common.responsible_deputy.email().to_string(),
            },
            responsible_person: EmailRef {
                email: common.responsible_person.email().to_string(),
            },
            themes: Vec::new(),
            valid_from: common.valid_from.clone(),
            valid_to: common.valid_to.clone(),
            version: common.version.clone(),
        };

        Ok(TransformedVariable {
            concept: DataEnvelope::new(concept),
            entry_list,
        })
    }
}
