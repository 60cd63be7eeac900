//! Typed structs representing an activity timeline (TOL) document.
//!
//! Field names follow the wire format exactly through serde renames, so
//! `serde_json::to_value(&doc)` produces a document the loader accepts
//! again. Name/value lists stay ordered `Vec`s: exports may repeat a name
//! and collapsing them into a map would drop entries.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use time::Duration;

use crate::doy::DoyTime;
use crate::duration::parse_duration;

/// `__kind` tag carried by activity records.
pub const ACTIVITY_KIND: &str = "tol_activity";

/// `hasTimelineType` of a timeline made of activity records.
pub const ACTIVITY_TIMELINE: &str = "activity";

/// Activity type of spacecraft downlink passes.
pub const DOWNLINK_TYPE: &str = "Downlink";

/// Downlink parameter holding the base data rate in bits per second.
pub const RATE_PARAMETER: &str = "Base Rate";
/// Downlink parameter holding the frequency band (`X`, `Ka`, ...).
pub const BAND_PARAMETER: &str = "Band";
/// Parameter holding the textual duration of the activity.
pub const DURATION_PARAMETER: &str = "Duration";

// ── Name/value pairs ────────────────────────────────────────────────

/// One `{ "Name": ..., "Value": ... }` element of `Metadata` or
/// `Activity Parameters`. The value is arbitrary JSON (strings, numbers,
/// and RGB arrays all occur).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameValue {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        NameValue {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The value if it is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

fn first_value<'a>(pairs: &'a [NameValue], name: &str) -> Option<&'a Value> {
    pairs.iter().find(|p| p.name == name).map(|p| &p.value)
}

fn first_str<'a>(pairs: &'a [NameValue], name: &str) -> Option<&'a str> {
    first_value(pairs, name).and_then(|v| v.as_str())
}

// ── Document ────────────────────────────────────────────────────────

/// The `Timeline Metadata` header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineMetadata {
    #[serde(rename = "hasObjectType", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    /// Always `"activity"` for documents this crate loads.
    #[serde(rename = "hasTimelineType")]
    pub timeline_type: String,
    #[serde(rename = "hasTimeSystem", skip_serializing_if = "Option::is_none")]
    pub time_system: Option<String>,
    /// Whether the server downsampled the data for display.
    #[serde(rename = "decimatedData")]
    pub decimated: bool,
    #[serde(rename = "hasObjectName", skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(rename = "hasObjectNamespace", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Header keys this crate does not interpret, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A whole timeline: header, ordered entries, annotations.
///
/// Serializes with `other_records` appended to `Timeline Data`, so a
/// reload yields an equal document.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDocument {
    pub metadata: TimelineMetadata,
    /// Entries in document order. Chronological in practice, not enforced.
    pub entries: Vec<ActivityRecord>,
    pub annotations: Vec<Value>,
    /// Top-level records whose `__kind` is not `tol_activity`, verbatim.
    pub other_records: Vec<Value>,
}

impl TimelineDocument {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given `Activity ID`.
    pub fn find(&self, activity_id: &str) -> Option<&ActivityRecord> {
        self.entries.iter().find(|e| e.activity_id == activity_id)
    }

    /// Earliest start and latest end over all entries.
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::covering(&self.entries)
    }

    /// Records of other kinds kept verbatim, nested ones included.
    pub fn skipped_records(&self) -> usize {
        self.other_records.len()
            + self
                .entries
                .iter()
                .map(ActivityRecord::skipped_children)
                .sum::<usize>()
    }
}

impl Serialize for TimelineDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("Timeline Metadata", &self.metadata)?;
        map.serialize_entry(
            "Timeline Data",
            &RecordList {
                records: &self.entries,
                other: &self.other_records,
            },
        )?;
        map.serialize_entry("Timeline Annotations", &self.annotations)?;
        map.end()
    }
}

/// Typed records followed by raw ones, as one JSON array.
struct RecordList<'a> {
    records: &'a [ActivityRecord],
    other: &'a [Value],
}

impl Serialize for RecordList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len() + self.other.len()))?;
        for record in self.records {
            seq.serialize_element(record)?;
        }
        for value in self.other {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// A closed `[start, end]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DoyTime,
    pub end: DoyTime,
}

impl TimeRange {
    /// The smallest range covering every record, `None` for no records.
    pub fn covering<'a>(records: impl IntoIterator<Item = &'a ActivityRecord>) -> Option<Self> {
        records.into_iter().fold(None, |acc: Option<TimeRange>, r| {
            Some(match acc {
                None => r.range(),
                Some(range) => TimeRange {
                    start: range.start.min(r.start),
                    end: range.end.max(r.end),
                },
            })
        })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True if `[start, end]` shares any instant with this range.
    pub fn overlaps(&self, start: DoyTime, end: DoyTime) -> bool {
        start <= self.end && end >= self.start
    }
}

// ── Activity record ─────────────────────────────────────────────────

/// Record kinds this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordKind {
    #[serde(rename = "tol_activity")]
    Activity,
}

/// One activity (for the telecom timeline, one downlink pass).
///
/// Field comments give the wire key where it differs from the field name.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// `__file_id`: owning plan/file grouping.
    pub file_id: String,
    /// `__document_id`: opaque primary key (hex in mpsserver exports).
    pub document_id: String,
    /// `__kind`
    pub kind: RecordKind,
    /// `Activity ID`: join key for child/descendant lookups.
    pub activity_id: String,
    /// `Activity Name`: display name. Not unique.
    pub activity_name: String,
    /// `Activity Type`
    pub activity_type: String,
    /// `Tstart Assigned`
    pub start: DoyTime,
    /// `Tend Assigned`
    pub end: DoyTime,
    /// Parent activity ids, outermost first.
    pub ancestors: Vec<String>,
    /// `Metadata`: display/legend tags such as legend, Color, pattern,
    /// start, description, subsystem, plan, span and status.
    pub metadata: Vec<NameValue>,
    /// `Activity Parameters`
    pub parameters: Vec<NameValue>,
    /// `childrenUrl`
    pub children_url: Option<String>,
    /// `descendantsUrl`
    pub descendants_url: Option<String>,
    /// Nested sub-activities, present in descendant responses.
    pub children: Vec<ActivityRecord>,
    /// Nested `children` of other kinds, verbatim. Serialized after
    /// `children`.
    pub other_children: Vec<Value>,
    /// `Arguments`
    pub arguments: Option<Value>,
    /// `Keyword Line`
    pub keyword_line: Option<String>,
    /// Record keys this crate does not interpret, kept verbatim.
    pub extra: BTreeMap<String, Value>,
}

impl Serialize for ActivityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("__file_id", &self.file_id)?;
        map.serialize_entry("__document_id", &self.document_id)?;
        map.serialize_entry("__kind", &self.kind)?;
        map.serialize_entry("Activity ID", &self.activity_id)?;
        map.serialize_entry("Activity Name", &self.activity_name)?;
        map.serialize_entry("Activity Type", &self.activity_type)?;
        map.serialize_entry("Tstart Assigned", &self.start)?;
        map.serialize_entry("Tend Assigned", &self.end)?;
        map.serialize_entry("ancestors", &self.ancestors)?;
        map.serialize_entry("Metadata", &self.metadata)?;
        map.serialize_entry("Activity Parameters", &self.parameters)?;
        if let Some(ref url) = self.children_url {
            map.serialize_entry("childrenUrl", url)?;
        }
        if let Some(ref url) = self.descendants_url {
            map.serialize_entry("descendantsUrl", url)?;
        }
        if !self.children.is_empty() || !self.other_children.is_empty() {
            map.serialize_entry(
                "children",
                &RecordList {
                    records: &self.children,
                    other: &self.other_children,
                },
            )?;
        }
        if let Some(ref arguments) = self.arguments {
            map.serialize_entry("Arguments", arguments)?;
        }
        if let Some(ref line) = self.keyword_line {
            map.serialize_entry("Keyword Line", line)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Typed view over the parameters of a downlink pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Downlink {
    pub rate_bps: Option<f64>,
    pub band: Option<String>,
    pub duration: Option<Duration>,
}

impl ActivityRecord {
    /// Elapsed time between `Tstart Assigned` and `Tend Assigned`.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `[Tstart Assigned, Tend Assigned]` as a window.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }

    /// The legend band name. The last `legend` tag wins.
    pub fn legend(&self) -> Option<&str> {
        self.metadata_values("legend").filter_map(|v| v.as_str()).last()
    }

    /// Every colour tag, matched case-insensitively, in document order.
    pub fn color_tags(&self) -> impl Iterator<Item = &Value> + '_ {
        self.metadata
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case("color"))
            .map(|p| &p.value)
    }

    /// Fill pattern index.
    pub fn pattern(&self) -> Option<i64> {
        first_value(&self.metadata, "pattern").and_then(|v| v.as_i64())
    }

    /// The human-readable duration tag, raw.
    pub fn span(&self) -> Option<&str> {
        first_str(&self.metadata, "span")
    }

    /// The `span` tag parsed as a duration.
    pub fn span_duration(&self) -> Option<Duration> {
        self.span().and_then(parse_duration)
    }

    /// Scheduling status, e.g. `scheduled`.
    pub fn status(&self) -> Option<&str> {
        first_str(&self.metadata, "status")
    }

    pub fn description(&self) -> Option<&str> {
        first_str(&self.metadata, "description")
    }

    pub fn subsystem(&self) -> Option<&str> {
        first_str(&self.metadata, "subsystem")
    }

    /// Source plan file path.
    pub fn plan(&self) -> Option<&str> {
        first_str(&self.metadata, "plan")
    }

    /// Warning/error/comment text. Activities carrying one are shown by
    /// message rather than by name.
    pub fn message(&self) -> Option<&str> {
        first_str(&self.metadata, "message")
    }

    /// Every metadata value under `name`, in document order.
    pub fn metadata_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.metadata
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        first_value(&self.parameters, name)
    }

    pub fn is_downlink(&self) -> bool {
        self.activity_type == DOWNLINK_TYPE
    }

    /// Raw records of other kinds anywhere below this one.
    pub fn skipped_children(&self) -> usize {
        self.other_children.len()
            + self
                .children
                .iter()
                .map(ActivityRecord::skipped_children)
                .sum::<usize>()
    }

    /// Rate, band and duration parameters of a downlink pass; `None` for
    /// other activity types.
    pub fn downlink(&self) -> Option<Downlink> {
        if !self.is_downlink() {
            return None;
        }
        Some(Downlink {
            rate_bps: self.parameter(RATE_PARAMETER).and_then(|v| v.as_f64()),
            band: self
                .parameter(BAND_PARAMETER)
                .and_then(|v| v.as_str())
                .map(str::to_owned),
            duration: self
                .parameter(DURATION_PARAMETER)
                .and_then(|v| v.as_str())
                .and_then(parse_duration),
        })
    }
}
