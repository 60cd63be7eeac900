use std::path::PathBuf;

use tolkit_interchange::DoyTime;

/// All errors that can be returned by a TimelineStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No timeline is stored under the given id.
    #[error("timeline not found: {timeline_id}")]
    TimelineNotFound { timeline_id: String },

    /// The timeline exists but holds no record with this `Activity ID`.
    #[error("activity not found: {timeline_id}/{activity_id}")]
    ActivityNotFound {
        timeline_id: String,
        activity_id: String,
    },

    /// A timeline with this id was already added.
    #[error("timeline already loaded: {timeline_id}")]
    DuplicateTimeline { timeline_id: String },

    #[error("invalid window: {from} is after {to}")]
    InvalidWindow { from: DoyTime, to: DoyTime },

    /// A file in a store directory failed to load.
    #[error("failed to load '{}': {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
