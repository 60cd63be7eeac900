use super::{document, passes, record, Seed, TestResult};
use crate::{StoreError, TimelineStore};

pub(super) fn run_lookup_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    vec![
        TestResult::from_result(
            "lookup",
            "timeline_ids_sorted",
            timeline_ids_sorted(factory),
        ),
        TestResult::from_result(
            "lookup",
            "empty_store_has_no_ids",
            empty_store_has_no_ids(factory),
        ),
        TestResult::from_result(
            "lookup",
            "timeline_returns_stored_document",
            timeline_returns_stored_document(factory),
        ),
        TestResult::from_result(
            "lookup",
            "unknown_timeline_not_found",
            unknown_timeline_not_found(factory),
        ),
    ]
}

fn timeline_ids_sorted<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![
        ("telecom".to_string(), passes()?),
        ("array".to_string(), passes()?),
    ]);
    let ids = store.timeline_ids();
    if ids != ["array", "telecom"] {
        return Err(format!("expected [array, telecom], got {:?}", ids));
    }
    Ok(())
}

fn empty_store_has_no_ids<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(Vec::new());
    let ids = store.timeline_ids();
    if !ids.is_empty() {
        return Err(format!("expected no ids, got {:?}", ids));
    }
    Ok(())
}

fn timeline_returns_stored_document<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let single = document(vec![record("only", "2022-001T00:00:00", "2022-001T00:00:01")])?;
    let expected = single.clone();
    let store = factory(vec![("single".to_string(), single)]);
    let got = store.timeline("single").map_err(|e| e.to_string())?;
    if *got != expected {
        return Err("stored document differs from the seed".to_string());
    }
    Ok(())
}

fn unknown_timeline_not_found<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    match store.timeline("missing") {
        Err(StoreError::TimelineNotFound { timeline_id }) if timeline_id == "missing" => Ok(()),
        Err(other) => Err(format!("expected TimelineNotFound, got {}", other)),
        Ok(_) => Err("expected TimelineNotFound, got a document".to_string()),
    }
}
