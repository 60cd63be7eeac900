use super::{document, passes, record, Seed, TestResult};
use crate::{StoreError, TimelineStore};

pub(super) fn run_activity_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    vec![
        TestResult::from_result("activity", "activity_found", activity_found(factory)),
        TestResult::from_result(
            "activity",
            "nested_child_found",
            nested_child_found(factory),
        ),
        TestResult::from_result(
            "activity",
            "unknown_activity_not_found",
            unknown_activity_not_found(factory),
        ),
        TestResult::from_result(
            "activity",
            "unknown_timeline_wins_over_activity",
            unknown_timeline_wins_over_activity(factory),
        ),
        TestResult::from_result(
            "activity",
            "duplicate_id_returns_first",
            duplicate_id_returns_first(factory),
        ),
    ]
}

fn activity_found<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    let rec = store.activity("telecom", "p2").map_err(|e| e.to_string())?;
    if rec.document_id != "doc-p2" {
        return Err(format!("expected doc-p2, got {}", rec.document_id));
    }
    Ok(())
}

fn nested_child_found<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    let rec = store
        .activity("telecom", "p1.track")
        .map_err(|e| e.to_string())?;
    if rec.activity_name != "p1.track pass" {
        return Err(format!("unexpected record {}", rec.activity_name));
    }
    Ok(())
}

fn unknown_activity_not_found<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    match store.activity("telecom", "p9") {
        Err(StoreError::ActivityNotFound {
            timeline_id,
            activity_id,
        }) if timeline_id == "telecom" && activity_id == "p9" => Ok(()),
        Err(other) => Err(format!("expected ActivityNotFound, got {}", other)),
        Ok(_) => Err("expected ActivityNotFound, got a record".to_string()),
    }
}

fn unknown_timeline_wins_over_activity<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    match store.activity("missing", "p1") {
        Err(StoreError::TimelineNotFound { .. }) => Ok(()),
        Err(other) => Err(format!("expected TimelineNotFound, got {}", other)),
        Ok(_) => Err("expected TimelineNotFound, got a record".to_string()),
    }
}

fn duplicate_id_returns_first<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let mut second = record("dup", "2022-002T00:00:00", "2022-002T01:00:00");
    second["__document_id"] = serde_json::json!("doc-dup-2");
    let doc = document(vec![
        record("dup", "2022-001T00:00:00", "2022-001T01:00:00"),
        second,
    ])?;
    let store = factory(vec![("dups".to_string(), doc)]);
    let rec = store.activity("dups", "dup").map_err(|e| e.to_string())?;
    if rec.document_id != "doc-dup" {
        return Err(format!("expected the first record, got {}", rec.document_id));
    }
    Ok(())
}
