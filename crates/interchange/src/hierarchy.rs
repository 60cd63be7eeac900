//! Flattening of nested `children` into a single ordered list.
//!
//! Descendant responses from mpsserver nest the subtree under the
//! requested parent, one level of `children` per generation.

use crate::types::{ActivityRecord, TimelineDocument};

/// Depth-first, pre-order walk of `records` and all nested children.
/// The returned copies have `children` and `other_children` cleared.
pub fn flatten(records: &[ActivityRecord]) -> Vec<ActivityRecord> {
    let mut out = Vec::new();
    push_flattened(records, &mut out);
    out
}

fn push_flattened(records: &[ActivityRecord], out: &mut Vec<ActivityRecord>) {
    for record in records {
        let mut flat = record.clone();
        flat.children = Vec::new();
        flat.other_children = Vec::new();
        out.push(flat);
        push_flattened(&record.children, out);
    }
}

/// Everything below the first entry of a descendant response.
pub fn descendants(document: &TimelineDocument) -> Vec<ActivityRecord> {
    document
        .entries
        .first()
        .map(|root| flatten(&root.children))
        .unwrap_or_default()
}
