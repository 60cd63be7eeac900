//! Deserialization of timeline JSON into typed structs.
//!
//! The main entry point is [`from_timeline`], which takes a
//! `&serde_json::Value` and produces a [`TimelineDocument`]. Every record
//! is validated on the way in; the first invalid record fails the whole
//! load with an error naming its `Activity ID`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::doy::DoyTime;
use crate::fixture::{unwrap_fixture, FixtureError};
use crate::types::*;

/// Errors in the structure or content of a timeline document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// The document is missing a required top-level field.
    #[error("timeline missing required field: '{field}'")]
    MissingField { field: String },
    /// The document structure is invalid.
    #[error("invalid timeline: {0}")]
    InvalidDocument(String),
    /// `hasTimelineType` names something other than an activity timeline.
    #[error("unsupported timeline type '{0}' (expected 'activity')")]
    UnsupportedTimelineType(String),
    /// A record failed validation. `activity` is its `Activity ID`, or
    /// `#<index>` when the id itself is unusable.
    #[error("activity '{activity}' field '{field}': {message}")]
    EntryError {
        activity: String,
        field: String,
        message: String,
    },
}

/// Errors loading a timeline from text or disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// A loaded document together with the name it is known by.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTimeline {
    /// JS binding name, else the file stem, else `timeline`.
    pub name: String,
    pub document: TimelineDocument,
}

const DEFAULT_NAME: &str = "timeline";

const METADATA_KEY: &str = "Timeline Metadata";
const DATA_KEY: &str = "Timeline Data";
const ANNOTATIONS_KEY: &str = "Timeline Annotations";

const KNOWN_RECORD_FIELDS: &[&str] = &[
    "__file_id",
    "__document_id",
    "__kind",
    "Activity ID",
    "Activity Name",
    "Activity Type",
    "Tstart Assigned",
    "Tend Assigned",
    "ancestors",
    "Metadata",
    "Activity Parameters",
    "childrenUrl",
    "descendantsUrl",
    "children",
    "Arguments",
    "Keyword Line",
];

const KNOWN_METADATA_FIELDS: &[&str] = &[
    "hasObjectType",
    "hasTimelineType",
    "hasTimeSystem",
    "decimatedData",
    "hasObjectName",
    "hasObjectNamespace",
];

/// Deserialize a timeline JSON document into typed structs.
///
/// Records whose `__kind` is not `tol_activity` are not interpreted; they
/// are kept verbatim in `other_records` (or the parent's `other_children`)
/// and written back on serialization.
pub fn from_timeline(doc: &Value) -> Result<TimelineDocument, TimelineError> {
    let root = doc
        .as_object()
        .ok_or_else(|| TimelineError::InvalidDocument("top level is not an object".to_string()))?;

    let metadata = parse_metadata(root.get(METADATA_KEY).ok_or_else(|| {
        TimelineError::MissingField {
            field: METADATA_KEY.to_string(),
        }
    })?)?;

    let data = root
        .get(DATA_KEY)
        .ok_or_else(|| TimelineError::MissingField {
            field: DATA_KEY.to_string(),
        })?
        .as_array()
        .ok_or_else(|| TimelineError::InvalidDocument(format!("'{}' is not an array", DATA_KEY)))?;

    let annotations = match root.get(ANNOTATIONS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(TimelineError::InvalidDocument(format!(
                "'{}' is not an array",
                ANNOTATIONS_KEY
            )))
        }
    };

    let (entries, other_records) = parse_entries(data)?;

    tracing::debug!(
        entries = entries.len(),
        skipped = other_records.len(),
        name = metadata.object_name.as_deref().unwrap_or(""),
        "loaded activity timeline"
    );

    Ok(TimelineDocument {
        metadata,
        entries,
        annotations,
        other_records,
    })
}

/// Load a timeline from JSON or a JS fixture held in memory.
pub fn load_str(text: &str) -> Result<LoadedTimeline, LoadError> {
    load_named(text, DEFAULT_NAME)
}

/// Load a timeline from a `.json` or `.js` file.
pub fn load_path(path: &Path) -> Result<LoadedTimeline, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_NAME);
    tracing::debug!(path = %path.display(), "reading timeline file");
    load_named(&text, stem)
}

fn load_named(text: &str, fallback: &str) -> Result<LoadedTimeline, LoadError> {
    let fixture = unwrap_fixture(text)?;
    let document = from_timeline(&fixture.value)?;
    Ok(LoadedTimeline {
        name: fixture.binding.unwrap_or_else(|| fallback.to_string()),
        document,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn parse_metadata(value: &Value) -> Result<TimelineMetadata, TimelineError> {
    let obj = value.as_object().ok_or_else(|| {
        TimelineError::InvalidDocument(format!("'{}' is not an object", METADATA_KEY))
    })?;

    let timeline_type = obj
        .get("hasTimelineType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TimelineError::MissingField {
            field: format!("{}.hasTimelineType", METADATA_KEY),
        })?
        .to_string();

    if timeline_type != ACTIVITY_TIMELINE {
        return Err(TimelineError::UnsupportedTimelineType(timeline_type));
    }

    let decimated = match obj.get("decimatedData") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(TimelineError::InvalidDocument(format!(
                "'decimatedData' must be a boolean, got {}",
                other
            )))
        }
    };

    Ok(TimelineMetadata {
        object_type: optional_header_str(obj, "hasObjectType")?,
        timeline_type,
        time_system: optional_header_str(obj, "hasTimeSystem")?,
        decimated,
        object_name: optional_header_str(obj, "hasObjectName")?,
        namespace: optional_header_str(obj, "hasObjectNamespace")?,
        extra: unknown_fields(obj, KNOWN_METADATA_FIELDS),
    })
}

fn optional_header_str(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, TimelineError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(TimelineError::InvalidDocument(format!(
            "'{}' must be a string, got {}",
            field, other
        ))),
    }
}

fn unknown_fields(obj: &Map<String, Value>, known: &[&str]) -> BTreeMap<String, Value> {
    obj.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Activity records, and the raw records of other kinds.
fn parse_entries(items: &[Value]) -> Result<(Vec<ActivityRecord>, Vec<Value>), TimelineError> {
    let mut entries = Vec::with_capacity(items.len());
    let mut other = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match parse_entry(item, index)? {
            Some(record) => entries.push(record),
            None => other.push(item.clone()),
        }
    }
    Ok((entries, other))
}

/// Validation context for one record: knows how to name it in errors.
struct Entry<'a> {
    obj: &'a Map<String, Value>,
    label: String,
}

impl<'a> Entry<'a> {
    fn error(&self, field: &str, message: impl Into<String>) -> TimelineError {
        TimelineError::EntryError {
            activity: self.label.clone(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn required_str(&self, field: &str) -> Result<String, TimelineError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Err(self.error(field, "missing required field")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(self.error(field, "must not be empty"))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.error(field, format!("expected a string, got {}", other))),
        }
    }

    fn optional_str(&self, field: &str) -> Result<Option<String>, TimelineError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.error(field, format!("expected a string, got {}", other))),
        }
    }

    fn time(&self, field: &str) -> Result<DoyTime, TimelineError> {
        let raw = self.required_str(field)?;
        DoyTime::parse(&raw).map_err(|e| self.error(field, e.to_string()))
    }

    fn ancestors(&self) -> Result<Vec<String>, TimelineError> {
        let items = match self.obj.get("ancestors") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(self.error("ancestors", format!("expected an array, got {}", other)))
            }
        };
        items
            .iter()
            .map(|v| {
                v.as_str().map(str::to_owned).ok_or_else(|| {
                    self.error("ancestors", format!("ancestor ids must be strings, got {}", v))
                })
            })
            .collect()
    }

    /// A `Metadata`-style list: every element exactly `{Name, Value}`.
    fn pairs(&self, field: &str) -> Result<Vec<NameValue>, TimelineError> {
        let items = match self.obj.get(field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(self.error(field, format!("expected an array, got {}", other)))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let pair = item
                    .as_object()
                    .ok_or_else(|| self.error(field, format!("element {} is not an object", i)))?;
                if pair.len() != 2 || !pair.contains_key("Name") || !pair.contains_key("Value") {
                    let keys: Vec<&str> = pair.keys().map(String::as_str).collect();
                    return Err(self.error(
                        field,
                        format!(
                            "element {} must have exactly the keys Name and Value, found {:?}",
                            i, keys
                        ),
                    ));
                }
                let name = pair["Name"].as_str().ok_or_else(|| {
                    self.error(field, format!("element {} has a non-string Name", i))
                })?;
                Ok(NameValue::new(name, pair["Value"].clone()))
            })
            .collect()
    }
}

fn parse_entry(value: &Value, index: usize) -> Result<Option<ActivityRecord>, TimelineError> {
    let obj = value.as_object().ok_or_else(|| {
        TimelineError::InvalidDocument(format!("'{}' entry #{} is not an object", DATA_KEY, index))
    })?;

    let label = obj
        .get("Activity ID")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("#{}", index));

    let entry = Entry { obj, label };

    let kind = entry.required_str("__kind")?;
    if kind != ACTIVITY_KIND {
        tracing::warn!(
            activity = %entry.label,
            kind = %kind,
            "record of unsupported kind kept verbatim"
        );
        return Ok(None);
    }

    let file_id = entry.required_str("__file_id")?;
    let document_id = entry.required_str("__document_id")?;
    let activity_id = entry.required_str("Activity ID")?;
    let activity_name = entry.required_str("Activity Name")?;
    let activity_type = entry.required_str("Activity Type")?;

    let start = entry.time("Tstart Assigned")?;
    let end = entry.time("Tend Assigned")?;
    if end <= start {
        return Err(entry.error(
            "Tend Assigned",
            format!("end {} does not follow start {}", end, start),
        ));
    }

    let ancestors = entry.ancestors()?;
    let metadata = entry.pairs("Metadata")?;
    let parameters = entry.pairs("Activity Parameters")?;

    if activity_type == DOWNLINK_TYPE {
        if let Some(rate) = parameters.iter().find(|p| p.name == RATE_PARAMETER) {
            if !rate.value.is_number() {
                return Err(entry.error(
                    "Activity Parameters",
                    format!("'{}' must be numeric, got {}", RATE_PARAMETER, rate.value),
                ));
            }
        }
    }

    let children_url = entry.optional_str("childrenUrl")?;
    let descendants_url = entry.optional_str("descendantsUrl")?;
    let keyword_line = entry.optional_str("Keyword Line")?;

    let arguments = obj.get("Arguments").filter(|v| !v.is_null()).cloned();

    let (children, other_children) = match obj.get("children") {
        None | Some(Value::Null) => (Vec::new(), Vec::new()),
        Some(Value::Array(items)) => parse_entries(items)?,
        Some(other) => {
            return Err(entry.error("children", format!("expected an array, got {}", other)))
        }
    };

    Ok(Some(ActivityRecord {
        file_id,
        document_id,
        kind: RecordKind::Activity,
        activity_id,
        activity_name,
        activity_type,
        start,
        end,
        ancestors,
        metadata,
        parameters,
        children_url,
        descendants_url,
        children,
        other_children,
        arguments,
        keyword_line,
        extra: unknown_fields(obj, KNOWN_RECORD_FIELDS),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_timeline(entries: Vec<Value>) -> Value {
        json!({
            "Timeline Metadata": {
                "hasObjectType": "activity timeline",
                "hasTimelineType": "activity",
                "hasTimeSystem": "UTC",
                "decimatedData": false,
                "hasObjectName": "Telecom/Downlink",
                "hasObjectNamespace": "/mongo/leucadia/telecom/"
            },
            "Timeline Data": entries
        })
    }

    fn downlink(id: &str, start: &str, end: &str) -> Value {
        json!({
            "__file_id": "telecom/plan",
            "__document_id": format!("doc-{}", id),
            "__kind": "tol_activity",
            "Activity ID": id,
            "Activity Name": "Downlink_3125.0",
            "Activity Type": "Downlink",
            "Tstart Assigned": start,
            "Tend Assigned": end,
            "ancestors": [],
            "Metadata": [
                {"Name": "legend", "Value": "Downlink"},
                {"Name": "span", "Value": "22:13:57.634"}
            ],
            "Activity Parameters": [
                {"Name": "Base Rate", "Value": 3125.0},
                {"Name": "Band", "Value": "X"},
                {"Name": "Duration", "Value": "22:13:57.634"}
            ],
            "childrenUrl": format!("https://mps.example/children?parentId={}", id),
            "descendantsUrl": format!("https://mps.example/descendants?parentId={}", id)
        })
    }

    fn first_record() -> Value {
        downlink("Downlink", "2022-167T02:15:54.584", "2022-168T00:29:52.218")
    }

    fn expect_entry_error(
        result: Result<TimelineDocument, TimelineError>,
    ) -> (String, String, String) {
        match result {
            Err(TimelineError::EntryError {
                activity,
                field,
                message,
            }) => (activity, field, message),
            other => panic!("expected EntryError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_timeline() {
        let doc = from_timeline(&make_timeline(vec![])).unwrap();
        assert!(doc.is_empty());
        assert!(doc.annotations.is_empty());
        assert_eq!(doc.metadata.timeline_type, "activity");
        assert_eq!(doc.metadata.time_system.as_deref(), Some("UTC"));
        assert!(!doc.metadata.decimated);
        assert!(doc.time_range().is_none());
    }

    #[test]
    fn test_parse_downlink() {
        let doc = from_timeline(&make_timeline(vec![first_record()])).unwrap();
        assert_eq!(doc.len(), 1);
        let r = &doc.entries[0];
        assert_eq!(r.activity_id, "Downlink");
        assert_eq!(r.document_id, "doc-Downlink");
        assert_eq!(r.kind, RecordKind::Activity);
        assert_eq!(r.start.to_string(), "2022-167T02:15:54.584");
        assert_eq!(r.metadata.len(), 2);
        assert_eq!(r.parameters[1], NameValue::new("Band", "X"));
        assert!(r.children_url.as_deref().unwrap().contains("parentId=Downlink"));
        assert!(r.extra.is_empty());
    }

    #[test]
    fn test_missing_metadata() {
        let result = from_timeline(&json!({"Timeline Data": []}));
        match result.unwrap_err() {
            TimelineError::MissingField { field } => assert_eq!(field, "Timeline Metadata"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data() {
        let mut doc = make_timeline(vec![]);
        doc.as_object_mut().unwrap().remove("Timeline Data");
        match from_timeline(&doc).unwrap_err() {
            TimelineError::MissingField { field } => assert_eq!(field, "Timeline Data"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_state_timeline_rejected() {
        let mut doc = make_timeline(vec![]);
        doc["Timeline Metadata"]["hasTimelineType"] = json!("state");
        assert_eq!(
            from_timeline(&doc).unwrap_err(),
            TimelineError::UnsupportedTimelineType("state".to_string())
        );
    }

    #[test]
    fn test_annotations_kept() {
        let mut doc = make_timeline(vec![]);
        doc["Timeline Annotations"] = json!([{"text": "handover", "at": "2022-167T00:00:00"}]);
        let parsed = from_timeline(&doc).unwrap();
        assert_eq!(parsed.annotations.len(), 1);
        assert_eq!(parsed.annotations[0]["text"], "handover");
    }

    #[test]
    fn test_empty_required_string_names_activity() {
        let mut rec = first_record();
        rec["Activity Name"] = json!("");
        let (activity, field, message) =
            expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(activity, "Downlink");
        assert_eq!(field, "Activity Name");
        assert!(message.contains("empty"));
    }

    #[test]
    fn test_missing_activity_id_uses_index() {
        let mut rec = first_record();
        rec.as_object_mut().unwrap().remove("Activity ID");
        let doc = make_timeline(vec![first_record(), rec]);
        let (activity, field, _) = expect_entry_error(from_timeline(&doc));
        assert_eq!(activity, "#1");
        assert_eq!(field, "Activity ID");
    }

    #[test]
    fn test_malformed_timestamp() {
        let rec = downlink("D1", "2022-06-16T02:15:54", "2022-168T00:29:52.218");
        let (activity, field, message) =
            expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(activity, "D1");
        assert_eq!(field, "Tstart Assigned");
        assert!(message.contains("DOY"));
    }

    #[test]
    fn test_fraction_beyond_millis_rejected() {
        let rec = downlink("a", "2022-100T00:00:00.0001", "2022-100T00:00:00.0009");
        let (activity, field, _) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(activity, "a");
        assert_eq!(field, "Tstart Assigned");
    }

    #[test]
    fn test_millis_survive_round_trip() {
        let rec = downlink("a", "2022-100T00:00:00.001", "2022-100T00:00:00.009");
        let first = from_timeline(&make_timeline(vec![rec])).unwrap();
        let reserialized = serde_json::to_value(&first).unwrap();
        assert_eq!(
            reserialized["Timeline Data"][0]["Tend Assigned"],
            "2022-100T00:00:00.009"
        );
        assert_eq!(from_timeline(&reserialized).unwrap(), first);
    }

    #[test]
    fn test_end_must_follow_start() {
        let rec = downlink("D2", "2022-168T00:29:52.218", "2022-168T00:29:52.218");
        let (activity, field, _) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(activity, "D2");
        assert_eq!(field, "Tend Assigned");
    }

    #[test]
    fn test_pairs_require_exact_keys() {
        let mut rec = first_record();
        rec["Metadata"] = json!([{"Name": "legend", "Value": "x", "Extra": 1}]);
        let (_, field, message) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(field, "Metadata");
        assert!(message.contains("exactly the keys"));

        let mut rec = first_record();
        rec["Activity Parameters"] = json!([{"Name": "Band"}]);
        let (_, field, _) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(field, "Activity Parameters");

        let mut rec = first_record();
        rec["Metadata"] = json!([{"Name": 7, "Value": "x"}]);
        let (_, _, message) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert!(message.contains("non-string Name"));
    }

    #[test]
    fn test_duplicate_pair_names_preserved() {
        let mut rec = first_record();
        rec["Metadata"] = json!([
            {"Name": "legend", "Value": "a"},
            {"Name": "legend", "Value": "b"}
        ]);
        let doc = from_timeline(&make_timeline(vec![rec])).unwrap();
        assert_eq!(doc.entries[0].metadata.len(), 2);
    }

    #[test]
    fn test_non_numeric_rate_rejected() {
        let mut rec = first_record();
        rec["Activity Parameters"][0]["Value"] = json!("fast");
        let (activity, field, message) =
            expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(activity, "Downlink");
        assert_eq!(field, "Activity Parameters");
        assert!(message.contains("Base Rate"));
    }

    #[test]
    fn test_non_string_url_rejected() {
        let mut rec = first_record();
        rec["childrenUrl"] = json!(42);
        let (_, field, _) = expect_entry_error(from_timeline(&make_timeline(vec![rec])));
        assert_eq!(field, "childrenUrl");
    }

    #[test]
    fn test_unknown_kind_skipped() {
        let mut other = downlink("S1", "2022-167T00:00:00", "2022-167T01:00:00");
        other["__kind"] = json!("tol_state");
        let doc = from_timeline(&make_timeline(vec![first_record(), other])).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.skipped_records(), 1);
        assert_eq!(doc.other_records[0]["Activity ID"], "S1");
    }

    #[test]
    fn test_unknown_kind_survives_round_trip() {
        let mut state = downlink("S1", "2022-167T00:00:00", "2022-167T01:00:00");
        state["__kind"] = json!("tol_state");
        let mut nested_state = state.clone();
        nested_state["Activity ID"] = json!("S2");
        let mut parent = first_record();
        parent["children"] = json!([
            downlink("Child1", "2022-167T03:00:00", "2022-167T04:00:00"),
            nested_state
        ]);

        let first = from_timeline(&make_timeline(vec![parent, state])).unwrap();
        assert_eq!(first.skipped_records(), 2);
        assert_eq!(first.entries[0].other_children[0]["Activity ID"], "S2");

        let reserialized = serde_json::to_value(&first).unwrap();
        assert_eq!(reserialized["Timeline Data"].as_array().unwrap().len(), 2);
        assert_eq!(reserialized["Timeline Data"][1]["__kind"], "tol_state");
        assert_eq!(reserialized["Timeline Data"][0]["children"][1]["__kind"], "tol_state");

        let second = from_timeline(&reserialized).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_children() {
        let mut parent = first_record();
        let mut child = downlink("Child1", "2022-167T03:00:00", "2022-167T04:00:00");
        let grandchild = downlink("Grandchild", "2022-167T03:10:00", "2022-167T03:20:00");
        child["children"] = json!([grandchild]);
        parent["children"] = json!([child]);
        let doc = from_timeline(&make_timeline(vec![parent])).unwrap();
        let kids = &doc.entries[0].children;
        assert_eq!(kids.len(), 1);
        assert_eq!(kids[0].activity_id, "Child1");
        assert_eq!(kids[0].children[0].activity_id, "Grandchild");
    }

    #[test]
    fn test_invalid_child_fails_load() {
        let mut parent = first_record();
        parent["children"] = json!([downlink("Bad", "2022-167T05:00:00", "2022-167T04:00:00")]);
        let (activity, _, _) = expect_entry_error(from_timeline(&make_timeline(vec![parent])));
        assert_eq!(activity, "Bad");
    }

    #[test]
    fn test_unknown_fields_kept_in_extra() {
        let mut rec = first_record();
        rec["Keyword Line"] = json!("KEYWORD=1");
        rec["Custom Field"] = json!({"a": 1});
        let doc = from_timeline(&make_timeline(vec![rec])).unwrap();
        let r = &doc.entries[0];
        assert_eq!(r.keyword_line.as_deref(), Some("KEYWORD=1"));
        assert_eq!(r.extra["Custom Field"], json!({"a": 1}));
    }

    #[test]
    fn test_round_trip_is_identity() {
        let mut rec = first_record();
        rec["Custom Field"] = json!("kept");
        let mut doc = make_timeline(vec![
            rec,
            downlink("D2", "2022-168T04:00:00", "2022-168T05:30:00.250"),
        ]);
        doc["Timeline Metadata"]["server"] = json!("mps-1");
        let first = from_timeline(&doc).unwrap();
        let reserialized = serde_json::to_value(&first).unwrap();
        let second = from_timeline(&reserialized).unwrap();
        assert_eq!(first, second);
        assert_eq!(reserialized, serde_json::to_value(&second).unwrap());
    }

    #[test]
    fn test_load_str_uses_binding_name() {
        let text = format!(
            "window.telecom = {};",
            serde_json::to_string_pretty(&make_timeline(vec![first_record()])).unwrap()
        );
        let loaded = load_str(&text).unwrap();
        assert_eq!(loaded.name, "telecom");
        assert_eq!(loaded.document.len(), 1);
    }

    #[test]
    fn test_load_str_plain_json_default_name() {
        let text = make_timeline(vec![]).to_string();
        assert_eq!(load_str(&text).unwrap().name, "timeline");
    }
}
