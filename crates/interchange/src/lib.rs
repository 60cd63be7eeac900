//! tolkit-interchange: Activity timeline (TOL) document model and loader.
//!
//! Provides typed structs for the timeline document format (header,
//! activity records, name/value tag lists), DOY timestamps, duration
//! strings, and a single `from_timeline()` entry point that validates a
//! `serde_json::Value` into a `TimelineDocument`.
//!
//! Documents may arrive as plain JSON or as a JS fixture assigning the
//! JSON literal to a global; `load_str`/`load_path` accept both.

pub mod deserialize;
pub mod doy;
pub mod duration;
pub mod fixture;
pub mod hierarchy;
pub mod types;

pub use deserialize::{
    from_timeline, load_path, load_str, LoadError, LoadedTimeline, TimelineError,
};
pub use doy::{DoyParseError, DoyTime};
pub use duration::{dhms, format_duration, parse_duration};
pub use fixture::{unwrap_fixture, Fixture, FixtureError};
pub use types::*;
