use crate::domain::CatalogRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifier to the versions seen for it, in fetch order
pub type VersionIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMismatch {
    pub source_versions: Vec<String>,
    pub destination_versions: Vec<String>,
}

/// Drift between the two catalogs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub only_in_destination: VersionIndex,
    pub only_in_source: VersionIndex,
    pub version_mismatches: BTreeMap<String, VersionMismatch>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.only_in_destination.is_empty()
            && self.only_in_source.is_empty()
            && self.version_mismatches.is_empty()
    }
}

/// Group versions by identifier. Repeated identifiers keep every version.
pub fn index_records<'a, I>(records: I) -> VersionIndex
where
    I: IntoIterator<Item = &'a CatalogRecord>,
{
    let mut index = VersionIndex::new();
    for record in records {
        index
            .entry(record.identifier.clone())
            .or_default()
            .push(record.version.clone());
    }
    index
}

/// Keep only the records owned by `agency_id`
pub fn filter_by_agency<'a>(
    records: &'a [CatalogRecord],
    agency_id: &'a str,
) -> impl Iterator<Item = &'a CatalogRecord> + 'a {
    records
        .iter()
        .filter(move |r| r.agency_id.as_deref() == Some(agency_id))
}

fn sorted(versions: &[String]) -> Vec<String> {
    let mut versions = versions.to_vec();
    versions.sort();
    versions
}

/// Compare two version indexes.
///
/// Version lists are compared after sorting but without deduplication, so a
/// version listed twice on one side and once on the other is a mismatch.
pub fn reconcile_indexes(source: &VersionIndex, destination: &VersionIndex) -> ReconciliationReport {
    let only_in_destination = destination
        .iter()
        .filter(|(id, _)| !source.contains_key(*id))
        .map(|(id, v)| (id.clone(), v.clone()))
        .collect();

    let only_in_source = source
        .iter()
        .filter(|(id, _)| !destination.contains_key(*id))
        .map(|(id, v)| (id.clone(), v.clone()))
        .collect();

    let version_mismatches = destination
        .iter()
        .filter_map(|(id, dest_versions)| {
            let source_versions = sorted(source.get(id)?);
            let destination_versions = sorted(dest_versions);
            (source_versions != destination_versions).then(|| {
                (
                    id.clone(),
                    VersionMismatch {
                        source_versions,
                        destination_versions,
                    },
                )
            })
        })
        .collect();

    ReconciliationReport {
        only_in_destination,
        only_in_source,
        version_mismatches,
    }
}

pub fn reconcile(source: &[CatalogRecord], destination: &[CatalogRecord]) -> ReconciliationReport {
    reconcile_indexes(&index_records(source), &index_records(destination))
}
