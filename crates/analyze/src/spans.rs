//! Consistency of the textual duration renderings with the timestamps.
//!
//! The `span` tag and the `Duration` parameter both render
//! `end - start`. Exports round them, so drift below the tolerance is
//! expected and only tracked in `max_drift_ms`.

use serde::Serialize;
use time::Duration;
use tolkit_interchange::{parse_duration, ActivityRecord, DoyTime, DURATION_PARAMETER};

use crate::stats::whole_ms;

/// A tag whose value disagrees with the record's timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct SpanIssue {
    pub activity_id: String,
    /// The raw tag value.
    pub value: String,
    /// Absolute drift in ms; `None` when the value did not parse.
    pub drift_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpanResult {
    pub tolerance_ms: i64,
    /// Records carrying a parseable `span` tag.
    pub checked: usize,
    pub max_drift_ms: i64,
    pub span_issues: Vec<SpanIssue>,
    pub duration_issues: Vec<SpanIssue>,
    pub start_issues: Vec<SpanIssue>,
}

pub fn analyze_spans(records: &[ActivityRecord], tolerance: Duration) -> SpanResult {
    let mut result = SpanResult {
        tolerance_ms: whole_ms(tolerance),
        checked: 0,
        max_drift_ms: 0,
        span_issues: Vec::new(),
        duration_issues: Vec::new(),
        start_issues: Vec::new(),
    };

    for record in records {
        let actual = record.duration();

        if let Some(raw) = record.span() {
            match parse_duration(raw) {
                Some(span) => {
                    result.checked += 1;
                    let drift = (span - actual).abs();
                    result.max_drift_ms = result.max_drift_ms.max(whole_ms(drift));
                    if drift > tolerance {
                        result.span_issues.push(issue(record, raw, Some(drift)));
                    }
                }
                None => result.span_issues.push(issue(record, raw, None)),
            }
        }

        if let Some(value) = record.parameter(DURATION_PARAMETER) {
            let raw = value.as_str().map(str::to_owned).unwrap_or_else(|| value.to_string());
            match value.as_str().and_then(parse_duration) {
                Some(d) => {
                    let drift = (d - actual).abs();
                    if drift > tolerance {
                        result.duration_issues.push(issue(record, &raw, Some(drift)));
                    }
                }
                None => result.duration_issues.push(issue(record, &raw, None)),
            }
        }

        for value in record.metadata_values("start") {
            let raw = value.as_str().map(str::to_owned).unwrap_or_else(|| value.to_string());
            match value.as_str().map(DoyTime::parse) {
                Some(Ok(echo)) if echo == record.start => {}
                Some(Ok(echo)) => {
                    let drift = (echo - record.start).abs();
                    result.start_issues.push(issue(record, &raw, Some(drift)));
                }
                _ => result.start_issues.push(issue(record, &raw, None)),
            }
        }
    }

    tracing::debug!(
        checked = result.checked,
        max_drift_ms = result.max_drift_ms,
        "span consistency checked"
    );
    result
}

fn issue(record: &ActivityRecord, raw: &str, drift: Option<Duration>) -> SpanIssue {
    SpanIssue {
        activity_id: record.activity_id.clone(),
        value: raw.to_string(),
        drift_ms: drift.map(whole_ms),
    }
}
