mod common;

use common::*;
use concept_migrator::app::ports::NoSnapshots;
use concept_migrator::app::ReconcileUseCase;
use concept_migrator::infra::FsSnapshotStore;
use serde_json::{json, Value};
use std::sync::Arc;

const OUR_AGENCY: &str = "6e7f0c77-97de-44db-a32c-87bc73fa21c3";

fn source_export() -> Vec<Value> {
    vec![
        json!({"identifier": "AGE", "version": "1.0.0", "agencyId": OUR_AGENCY}),
        json!({"identifier": "AGE", "version": "2.0.0", "agencyId": OUR_AGENCY}),
        json!({"identifier": "CANTON", "version": "1.0.0", "agencyId": OUR_AGENCY}),
        json!({"identifier": "NEW_VAR", "version": "1.0.0", "agencyId": OUR_AGENCY}),
        json!({"identifier": "FOREIGN", "version": "1.0.0", "agencyId": "someone-else"}),
        json!({"identifier": null, "version": "1.0.0", "agencyId": OUR_AGENCY}),
    ]
}

fn destination_export() -> Vec<Value> {
    vec![
        json!({"identifier": "AGE", "version": "2.0.0"}),
        json!({"identifier": "AGE", "version": "1.0.0"}),
        json!({"identifier": "CANTON", "version": "1.1.0"}),
        json!({"identifier": "RETIRED", "version": "3.0.0"}),
    ]
}

fn mocks() -> (MockSource, MockDestination) {
    let calls = call_log();
    let mut source = MockSource::new(calls.clone());
    source.export = source_export();
    let mut destination = MockDestination::new(calls);
    destination.export = destination_export();
    (source, destination)
}

#[tokio::test]
async fn test_reconcile_scoped_to_agency() {
    let (source, destination) = mocks();
    let use_case = ReconcileUseCase::new(Arc::new(source), Arc::new(destination), Arc::new(NoSnapshots))
        .with_agency(OUR_AGENCY);

    let run = use_case.reconcile().await.unwrap();
    assert_eq!(run.source_records, 5);
    assert_eq!(run.source_records_in_scope, 4);
    assert_eq!(run.destination_records, 4);

    let report = run.report;
    assert_eq!(
        report.only_in_source.keys().collect::<Vec<_>>(),
        vec!["NEW_VAR"]
    );
    assert_eq!(
        report.only_in_destination.keys().collect::<Vec<_>>(),
        vec!["RETIRED"]
    );
    assert_eq!(
        report.version_mismatches.keys().collect::<Vec<_>>(),
        vec!["CANTON"]
    );
    let canton = &report.version_mismatches["CANTON"];
    assert_eq!(canton.source_versions, vec!["1.0.0".to_string()]);
    assert_eq!(canton.destination_versions, vec!["1.1.0".to_string()]);
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_reconcile_without_agency_filter_includes_foreign_records() {
    let (source, destination) = mocks();
    let use_case = ReconcileUseCase::new(Arc::new(source), Arc::new(destination), Arc::new(NoSnapshots));

    let run = use_case.reconcile().await.unwrap();
    assert_eq!(run.source_records_in_scope, 5);
    assert!(run.report.only_in_source.contains_key("FOREIGN"));
}

#[tokio::test]
async fn test_reconcile_writes_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FsSnapshotStore::new(dir.path()));
    let (source, destination) = mocks();
    let use_case = ReconcileUseCase::new(Arc::new(source), Arc::new(destination), store.clone())
        .with_agency(OUR_AGENCY);

    use_case.reconcile().await.unwrap();

    for name in [
        "source_export",
        "destination_export",
        "only_in_destination",
        "only_in_source",
        "version_mismatches",
    ] {
        assert!(store.path_for(name).exists(), "missing {name}.json");
    }

    let mismatches: Value =
        serde_json::from_str(&std::fs::read_to_string(store.path_for("version_mismatches")).unwrap())
            .unwrap();
    assert_eq!(
        mismatches,
        json!({"CANTON": {"sourceVersions": ["1.0.0"], "destinationVersions": ["1.1.0"]}})
    );
    let only_in_destination: Value =
        serde_json::from_str(&std::fs::read_to_string(store.path_for("only_in_destination")).unwrap())
            .unwrap();
    assert_eq!(only_in_destination, json!({"RETIRED": ["3.0.0"]}));
}

#[tokio::test]
async fn test_identical_catalogs_are_clean() {
    let calls = call_log();
    let mut source = MockSource::new(calls.clone());
    source.export = vec![json!({"identifier": "A", "version": "1"})];
    let mut destination = MockDestination::new(calls);
    destination.export = vec![json!({"identifier": "A", "version": "1"})];

    let run = ReconcileUseCase::new(Arc::new(source), Arc::new(destination), Arc::new(NoSnapshots))
        .reconcile()
        .await
        .unwrap();
    assert!(run.report.is_clean());
}
