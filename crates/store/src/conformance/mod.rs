//! Conformance test suite for `TimelineStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any
//! `TimelineStore` implementation can run to verify correctness. The
//! suite covers:
//!
//! - **Lookup**: timeline ids, whole documents, unknown ids
//! - **Activities**: lookup by `Activity ID`, nested children, duplicates
//! - **Windows**: overlap semantics, ordering, inverted windows
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory that
//! builds a store holding exactly the given timelines:
//!
//! ```ignore
//! use tolkit_store::conformance::run_conformance_suite;
//!
//! #[test]
//! fn memory_conformance() {
//!     let report = run_conformance_suite(|docs| MemoryStore::from_documents(docs).unwrap());
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod activity;
mod lookup;
mod window;

use std::fmt;

use serde_json::{json, Value};
use tolkit_interchange::{from_timeline, TimelineDocument};

use crate::TimelineStore;

/// Seed timelines handed to the factory.
pub type Seed = Vec<(String, TimelineDocument)>;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "lookup", "window").
    pub category: String,
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: result.is_ok(),
            message: result.err(),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a store implementation.
///
/// The `factory` is called once per test with that test's seed timelines,
/// so tests never observe each other's data.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: TimelineStore,
    F: Fn(Seed) -> S,
{
    let mut results = Vec::new();

    results.extend(lookup::run_lookup_tests(&factory));
    results.extend(activity::run_activity_tests(&factory));
    results.extend(window::run_window_tests(&factory));

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: seed documents ──────────────────────────────────────────────────

fn record(id: &str, start: &str, end: &str) -> Value {
    json!({
        "__file_id": "conformance",
        "__document_id": format!("doc-{}", id),
        "__kind": "tol_activity",
        "Activity ID": id,
        "Activity Name": format!("{} pass", id),
        "Activity Type": "Downlink",
        "Tstart Assigned": start,
        "Tend Assigned": end,
        "ancestors": []
    })
}

fn document(records: Vec<Value>) -> Result<TimelineDocument, String> {
    from_timeline(&json!({
        "Timeline Metadata": {"hasTimelineType": "activity"},
        "Timeline Data": records
    }))
    .map_err(|e| format!("seed document invalid: {}", e))
}

/// Three sequential passes on day 100, one with a nested child.
fn passes() -> Result<TimelineDocument, String> {
    let mut first = record("p1", "2022-100T00:00:00", "2022-100T02:00:00");
    first["children"] = json!([record("p1.track", "2022-100T00:10:00", "2022-100T00:20:00")]);
    document(vec![
        first,
        record("p2", "2022-100T03:00:00", "2022-100T05:00:00"),
        record("p3", "2022-100T06:00:00", "2022-100T08:00:00"),
    ])
}
