//! Identifier uniqueness: `Activity ID` and `__document_id` within one
//! document. Neither is unique across documents without the file id.

use std::collections::BTreeMap;

use serde::Serialize;
use tolkit_interchange::ActivityRecord;

/// Identifiers that occur more than once, with their occurrence counts.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityResult {
    pub duplicate_activity_ids: BTreeMap<String, usize>,
    pub duplicate_document_ids: BTreeMap<String, usize>,
}

pub fn analyze_identity(records: &[ActivityRecord]) -> IdentityResult {
    IdentityResult {
        duplicate_activity_ids: duplicates(records.iter().map(|r| r.activity_id.as_str())),
        duplicate_document_ids: duplicates(records.iter().map(|r| r.document_id.as_str())),
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, n)| (id.to_string(), n))
        .collect()
}
