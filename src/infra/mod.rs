pub mod destination_registry;
pub mod http_client;
pub mod snapshot_store;
pub mod source_registry;

pub use destination_registry::DestinationRegistryClient;
pub use snapshot_store::FsSnapshotStore;
pub use source_registry::SourceRegistryClient;
