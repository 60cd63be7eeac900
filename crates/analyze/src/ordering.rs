//! Display order. Entries are chronological in practice but nothing
//! upstream enforces it, so this only reports.

use serde::Serialize;
use tolkit_interchange::ActivityRecord;

#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub chronological: bool,
    /// Activity ids of entries that start before their predecessor.
    pub out_of_order: Vec<String>,
}

pub fn analyze_order(entries: &[ActivityRecord]) -> OrderResult {
    let out_of_order: Vec<String> = entries
        .windows(2)
        .filter(|pair| pair[1].start < pair[0].start)
        .map(|pair| pair[1].activity_id.clone())
        .collect();

    OrderResult {
        chronological: out_of_order.is_empty(),
        out_of_order,
    }
}
