//! Record shapes exchanged with the two registries

pub mod catalog;
pub mod concept;
pub mod environment;
pub mod variable;

pub use catalog::CatalogRecord;
pub use concept::{
    Annotation, CodeListConceptFields, CodeListEntry, Concept, ConceptKind, ConceptPayload,
    DataEnvelope, EmailRef, EntryListPayload, PersonPayload, PersonRecord, PublisherRef,
};
pub use environment::Environment;
pub use variable::{
    CodeListFields, DateFields, NumericFields, PersonReference, SourceCodeList, SourceVariable,
    StringFields, VariableCommon, VariableKind,
};
