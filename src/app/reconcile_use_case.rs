use crate::app::ports::{DestinationRegistryPort, SnapshotPort, SourceRegistryPort};
use crate::constants::{
    REPORT_ONLY_IN_DESTINATION, REPORT_ONLY_IN_SOURCE, REPORT_VERSION_MISMATCHES,
    SNAPSHOT_DESTINATION_EXPORT, SNAPSHOT_SOURCE_EXPORT,
};
use crate::domain::CatalogRecord;
use crate::error::Result;
use crate::pipeline::reconcile::{filter_by_agency, index_records, reconcile_indexes};
use crate::pipeline::ReconciliationReport;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Counts gathered while reconciling, alongside the drift itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRun {
    pub source_records: usize,
    pub source_records_in_scope: usize,
    pub destination_records: usize,
    pub report: ReconciliationReport,
}

fn catalog_records(items: &[Value], side: &'static str) -> Vec<CatalogRecord> {
    let records: Vec<CatalogRecord> = items.iter().filter_map(CatalogRecord::from_value).collect();
    let skipped = items.len() - records.len();
    if skipped > 0 {
        warn!(side, skipped, "Skipped export items without identifier or version");
    }
    records
}

/// Compares the source registry's defined variables with the destination's
/// published concepts.
pub struct ReconcileUseCase {
    source: Arc<dyn SourceRegistryPort>,
    destination: Arc<dyn DestinationRegistryPort>,
    snapshots: Arc<dyn SnapshotPort>,
    agency_id: Option<String>,
}

impl ReconcileUseCase {
    pub fn new(
        source: Arc<dyn SourceRegistryPort>,
        destination: Arc<dyn DestinationRegistryPort>,
        snapshots: Arc<dyn SnapshotPort>,
    ) -> Self {
        Self {
            source,
            destination,
            snapshots,
            agency_id: None,
        }
    }

    /// Only consider source records owned by this agency
    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = Some(agency_id.into());
        self
    }

    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconciliationRun> {
        let source_items = self.source.list_variables().await?;
        self.snapshots
            .record(SNAPSHOT_SOURCE_EXPORT, &Value::Array(source_items.clone()))
            .await;
        let destination_items = self.destination.list_concepts().await?;
        self.snapshots
            .record(SNAPSHOT_DESTINATION_EXPORT, &Value::Array(destination_items.clone()))
            .await;
        info!(
            source = source_items.len(),
            destination = destination_items.len(),
            "Fetched catalog exports"
        );

        let source_records = catalog_records(&source_items, "source");
        let destination_records = catalog_records(&destination_items, "destination");

        let source_index = match &self.agency_id {
            Some(agency_id) => index_records(filter_by_agency(&source_records, agency_id)),
            None => index_records(&source_records),
        };
        let source_in_scope: usize = source_index.values().map(Vec::len).sum();
        let report = reconcile_indexes(&source_index, &index_records(&destination_records));

        info!(
            only_in_destination = report.only_in_destination.len(),
            only_in_source = report.only_in_source.len(),
            version_mismatches = report.version_mismatches.len(),
            "Reconciliation finished"
        );
        self.snapshot(REPORT_ONLY_IN_DESTINATION, &report.only_in_destination).await;
        self.snapshot(REPORT_ONLY_IN_SOURCE, &report.only_in_source).await;
        self.snapshot(REPORT_VERSION_MISMATCHES, &report.version_mismatches).await;

        Ok(ReconciliationRun {
            source_records: source_records.len(),
            source_records_in_scope: source_in_scope,
            destination_records: destination_records.len(),
            report,
        })
    }

    async fn snapshot<T: Serialize>(&self, name: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.snapshots.record(name, &value).await,
            Err(e) => warn!(name, "Could not serialize report: {}", e),
        }
    }
}
