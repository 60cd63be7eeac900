use tolkit_interchange::{ActivityRecord, DoyTime, TimelineDocument};

use crate::error::StoreError;

/// Read-only access to activity timelines keyed by timeline id.
///
/// Records are immutable once stored: there is no update path, and every
/// accessor hands out shared references. Implementations must be
/// `Send + Sync` so one store can back concurrent readers.
///
/// Only [`timeline_ids`](TimelineStore::timeline_ids) and
/// [`timeline`](TimelineStore::timeline) are required; record lookups are
/// derived from them.
pub trait TimelineStore: Send + Sync {
    /// Every stored timeline id, sorted.
    fn timeline_ids(&self) -> Vec<String>;

    /// The whole document stored under `timeline_id`.
    fn timeline(&self, timeline_id: &str) -> Result<&TimelineDocument, StoreError>;

    /// A record by `Activity ID`, searching nested children too.
    ///
    /// Returns the first match in document order.
    fn activity(
        &self,
        timeline_id: &str,
        activity_id: &str,
    ) -> Result<&ActivityRecord, StoreError> {
        let document = self.timeline(timeline_id)?;
        find_activity(&document.entries, activity_id).ok_or_else(|| {
            StoreError::ActivityNotFound {
                timeline_id: timeline_id.to_string(),
                activity_id: activity_id.to_string(),
            }
        })
    }

    /// Top-level records overlapping the closed window `[from, to]`, in
    /// document order.
    fn activities_between(
        &self,
        timeline_id: &str,
        from: DoyTime,
        to: DoyTime,
    ) -> Result<Vec<&ActivityRecord>, StoreError> {
        if from > to {
            return Err(StoreError::InvalidWindow { from, to });
        }
        let document = self.timeline(timeline_id)?;
        Ok(document
            .entries
            .iter()
            .filter(|r| r.range().overlaps(from, to))
            .collect())
    }
}

fn find_activity<'a>(
    records: &'a [ActivityRecord],
    activity_id: &str,
) -> Option<&'a ActivityRecord> {
    records.iter().find_map(|r| {
        if r.activity_id == activity_id {
            Some(r)
        } else {
            find_activity(&r.children, activity_id)
        }
    })
}
