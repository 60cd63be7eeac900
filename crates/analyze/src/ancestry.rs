//! Hierarchy shape. A document whose records all have empty `ancestors`
//! is a flat slice; deeper structure, if any, lives behind the
//! children/descendants endpoints.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tolkit_interchange::ActivityRecord;

#[derive(Debug, Clone, Serialize)]
pub struct AncestryResult {
    pub record_count: usize,
    /// Every record has an empty `ancestors` list.
    pub flat: bool,
    /// Activity id -> ancestor ids that no record in the document carries.
    pub unresolved: BTreeMap<String, Vec<String>>,
}

pub fn analyze_ancestry(records: &[ActivityRecord]) -> AncestryResult {
    let known: BTreeSet<&str> = records.iter().map(|r| r.activity_id.as_str()).collect();

    let mut unresolved = BTreeMap::new();
    for record in records {
        let missing: Vec<String> = record
            .ancestors
            .iter()
            .filter(|a| !known.contains(a.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            unresolved.insert(record.activity_id.clone(), missing);
        }
    }

    AncestryResult {
        record_count: records.len(),
        flat: records.iter().all(|r| r.ancestors.is_empty()),
        unresolved,
    }
}
