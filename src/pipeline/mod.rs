pub mod code_list_entry;
pub mod persons;
pub mod reconcile;
pub mod transform;

pub use code_list_entry::map_entry;
pub use persons::{PersonResolution, PersonResolver};
pub use reconcile::{reconcile, ReconciliationReport, VersionMismatch};
pub use transform::{SchemaTransformer, TransformedVariable};
