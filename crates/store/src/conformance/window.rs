use tolkit_interchange::DoyTime;

use super::{passes, Seed, TestResult};
use crate::{StoreError, TimelineStore};

pub(super) fn run_window_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    vec![
        TestResult::from_result(
            "window",
            "window_includes_overlaps",
            window_includes_overlaps(factory),
        ),
        TestResult::from_result(
            "window",
            "window_edges_inclusive",
            window_edges_inclusive(factory),
        ),
        TestResult::from_result(
            "window",
            "window_in_gap_is_empty",
            window_in_gap_is_empty(factory),
        ),
        TestResult::from_result(
            "window",
            "inverted_window_rejected",
            inverted_window_rejected(factory),
        ),
    ]
}

fn t(text: &str) -> Result<DoyTime, String> {
    DoyTime::parse(text).map_err(|e| e.to_string())
}

fn ids_between<S: TimelineStore>(store: &S, from: &str, to: &str) -> Result<Vec<String>, String> {
    Ok(store
        .activities_between("telecom", t(from)?, t(to)?)
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|r| r.activity_id.clone())
        .collect())
}

fn window_includes_overlaps<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    let ids = ids_between(&store, "2022-100T01:00:00", "2022-100T07:00:00")?;
    if ids != ["p1", "p2", "p3"] {
        return Err(format!("expected [p1, p2, p3] in document order, got {:?}", ids));
    }
    Ok(())
}

fn window_edges_inclusive<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    let ids = ids_between(&store, "2022-100T05:00:00", "2022-100T06:00:00")?;
    if ids != ["p2", "p3"] {
        return Err(format!("expected [p2, p3], got {:?}", ids));
    }
    Ok(())
}

fn window_in_gap_is_empty<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    let ids = ids_between(&store, "2022-100T02:30:00", "2022-100T02:45:00")?;
    if !ids.is_empty() {
        return Err(format!("expected no records, got {:?}", ids));
    }
    Ok(())
}

fn inverted_window_rejected<S, F>(factory: &F) -> Result<(), String>
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let store = factory(vec![("telecom".to_string(), passes()?)]);
    match store.activities_between("telecom", t("2022-100T05:00:00")?, t("2022-100T01:00:00")?) {
        Err(StoreError::InvalidWindow { .. }) => Ok(()),
        Err(other) => Err(format!("expected InvalidWindow, got {}", other)),
        Ok(_) => Err("expected InvalidWindow, got records".to_string()),
    }
}
