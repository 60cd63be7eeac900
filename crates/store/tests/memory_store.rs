//! MemoryStore against the conformance suite and the sample fixtures.

use std::path::{Path, PathBuf};

use tolkit_interchange::DoyTime;
use tolkit_store::conformance::run_conformance_suite;
use tolkit_store::{MemoryStore, StoreError, TimelineStore};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

#[test]
fn memory_store_conformance() {
    let report = run_conformance_suite(|docs| MemoryStore::from_documents(docs).unwrap());
    assert!(report.total > 0);
    assert!(report.failed == 0, "{report}");
}

#[test]
fn load_fixture_dir() {
    let store = MemoryStore::load_dir(&fixtures_dir()).unwrap();
    assert_eq!(store.timeline_ids(), vec!["descendants", "telecom"]);

    let first = store.activity("telecom", "Downlink").unwrap();
    assert_eq!(first.activity_name, "Downlink_3125.0");

    let nested = store.activity("descendants", "Downlink.track.slew").unwrap();
    assert_eq!(nested.ancestors, vec!["Downlink", "Downlink.track"]);
}

#[test]
fn window_over_telecom_day_169() {
    let store = MemoryStore::load_dir(&fixtures_dir()).unwrap();
    let from = DoyTime::parse("2022-169T00:00:00").unwrap();
    let to = DoyTime::parse("2022-169T23:59:59.999").unwrap();
    let ids: Vec<_> = store
        .activities_between("telecom", from, to)
        .unwrap()
        .into_iter()
        .map(|r| r.activity_id.as_str())
        .collect();
    assert_eq!(ids, vec!["Downlink_2", "Downlink_3", "Downlink_4"]);
}

#[test]
fn duplicate_timeline_names_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let telecom = std::fs::read_to_string(fixtures_dir().join("telecom.js")).unwrap();
    std::fs::write(dir.path().join("a.js"), &telecom).unwrap();
    std::fs::write(dir.path().join("b.js"), &telecom).unwrap();

    match MemoryStore::load_dir(dir.path()) {
        Err(StoreError::DuplicateTimeline { timeline_id }) => assert_eq!(timeline_id, "telecom"),
        other => panic!("expected DuplicateTimeline, got {:?}", other),
    }
}

#[test]
fn invalid_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let bad =
        std::fs::read_to_string(fixtures_dir().join("invalid/end_before_start.json")).unwrap();
    std::fs::write(dir.path().join("bad.json"), bad).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    match MemoryStore::load_dir(dir.path()) {
        Err(StoreError::Load { path, message }) => {
            assert!(path.ends_with("bad.json"));
            assert!(message.contains("Downlink_1"));
        }
        other => panic!("expected Load error, got {:?}", other),
    }
}

#[test]
fn missing_dir_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        MemoryStore::load_dir(&dir.path().join("absent")),
        Err(StoreError::Io { .. })
    ));
}

#[test]
fn builder_rejects_duplicate_insert() {
    let store = MemoryStore::load_dir(&fixtures_dir()).unwrap();
    let doc = store.timeline("telecom").unwrap().clone();

    let mut builder = MemoryStore::builder();
    builder.insert("telecom", doc.clone()).unwrap();
    assert!(matches!(
        builder.insert("telecom", doc),
        Err(StoreError::DuplicateTimeline { .. })
    ));
    assert_eq!(builder.build().len(), 1);
}
