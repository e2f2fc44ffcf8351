pub mod ports;
pub mod migrate_use_case;
pub mod reconcile_use_case;

pub use migrate_use_case::{MigrateUseCase, MigrationFailure, MigrationOutcome, MigrationState};
pub use reconcile_use_case::{ReconcileUseCase, ReconciliationRun};
