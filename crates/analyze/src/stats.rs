//! Summary statistics over a timeline.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use time::Duration;
use tolkit_interchange::{ActivityRecord, TimeRange, TimelineDocument};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TimelineStats {
    /// Top-level entries.
    pub entry_count: usize,
    /// Entries plus nested children.
    pub record_count: usize,
    pub activity_types: BTreeMap<String, usize>,
    /// Downlink band -> pass count.
    pub bands: BTreeMap<String, usize>,
    pub file_ids: BTreeSet<String>,
    pub time_range: Option<TimeRange>,
    /// Sum of every record's end - start.
    pub total_duration_ms: i64,
    /// Largest |span - (end - start)| over records with a parseable span.
    pub max_span_drift_ms: i64,
    pub skipped_records: usize,
}

impl TimelineStats {
    pub fn collect(document: &TimelineDocument, records: &[ActivityRecord]) -> Self {
        let mut stats = TimelineStats {
            entry_count: document.len(),
            record_count: records.len(),
            time_range: TimeRange::covering(records),
            skipped_records: document.skipped_records(),
            ..Default::default()
        };

        for record in records {
            *stats
                .activity_types
                .entry(record.activity_type.clone())
                .or_default() += 1;
            if let Some(band) = record.downlink().and_then(|d| d.band) {
                *stats.bands.entry(band).or_default() += 1;
            }
            stats.file_ids.insert(record.file_id.clone());
            stats.total_duration_ms += whole_ms(record.duration());
        }

        stats
    }

    pub fn total_duration(&self) -> Duration {
        Duration::milliseconds(self.total_duration_ms)
    }
}

pub(crate) fn whole_ms(duration: Duration) -> i64 {
    duration.whole_milliseconds() as i64
}
