//! AnalysisReport: aggregated output from every timeline check.
//!
//! The report collects the result of each check module and extracts
//! notable findings (errors, warnings, info) for summary display.

use serde::Serialize;

use crate::ancestry::AncestryResult;
use crate::identity::IdentityResult;
use crate::ordering::OrderResult;
use crate::spans::{SpanIssue, SpanResult};
use crate::stats::TimelineStats;

/// Severity level for an analysis finding. Declaration order is the
/// display order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingSeverity {
    Error,
    Warning,
    Info,
}

/// A notable finding from analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Name of the check that produced it, e.g. `span_consistency`.
    pub check: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub activity_id: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Aggregated analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub stats: TimelineStats,
    pub identity: Option<IdentityResult>,
    pub spans: Option<SpanResult>,
    pub ordering: Option<OrderResult>,
    pub ancestry: Option<AncestryResult>,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    /// Create a report with the given stats and no check results.
    pub fn new(stats: TimelineStats) -> Self {
        AnalysisReport {
            stats,
            identity: None,
            spans: None,
            ordering: None,
            ancestry: None,
            findings: Vec::new(),
        }
    }

    /// True if any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity == FindingSeverity::Error)
    }

    pub fn count(&self, severity: FindingSeverity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Extract findings from populated check results.
    pub fn extract_findings(&mut self) {
        self.findings.clear();

        if let Some(ref identity) = self.identity {
            for (id, count) in &identity.duplicate_activity_ids {
                self.findings.push(Finding {
                    check: "unique_activity_id".to_string(),
                    severity: FindingSeverity::Error,
                    message: format!("Activity ID '{}' appears {} times", id, count),
                    activity_id: Some(id.clone()),
                    details: Some(serde_json::json!({ "occurrences": count })),
                });
            }
            for (id, count) in &identity.duplicate_document_ids {
                self.findings.push(Finding {
                    check: "unique_document_id".to_string(),
                    severity: FindingSeverity::Error,
                    message: format!("document id '{}' appears {} times", id, count),
                    activity_id: None,
                    details: Some(serde_json::json!({
                        "document_id": id,
                        "occurrences": count,
                    })),
                });
            }
        }

        if let Some(ref spans) = self.spans {
            let tolerance = spans.tolerance_ms;
            for issue in &spans.span_issues {
                self.findings
                    .push(span_finding("span_consistency", "span tag", issue, tolerance));
            }
            for issue in &spans.duration_issues {
                self.findings.push(span_finding(
                    "duration_consistency",
                    "Duration parameter",
                    issue,
                    tolerance,
                ));
            }
            for issue in &spans.start_issues {
                let message = match issue.drift_ms {
                    Some(drift) => format!(
                        "Activity '{}' start tag '{}' differs from Tstart Assigned by {} ms",
                        issue.activity_id, issue.value, drift
                    ),
                    None => format!(
                        "Activity '{}' start tag '{}' is not a DOY timestamp",
                        issue.activity_id, issue.value
                    ),
                };
                self.findings.push(Finding {
                    check: "start_echo".to_string(),
                    severity: FindingSeverity::Warning,
                    message,
                    activity_id: Some(issue.activity_id.clone()),
                    details: None,
                });
            }
        }

        if let Some(ref ordering) = self.ordering {
            if !ordering.chronological {
                self.findings.push(Finding {
                    check: "chronological_order".to_string(),
                    severity: FindingSeverity::Info,
                    message: format!(
                        "{} entr{} start before the entry preceding them",
                        ordering.out_of_order.len(),
                        if ordering.out_of_order.len() == 1 { "y" } else { "ies" }
                    ),
                    activity_id: ordering.out_of_order.first().cloned(),
                    details: Some(serde_json::json!({
                        "out_of_order": ordering.out_of_order,
                    })),
                });
            }
        }

        if let Some(ref ancestry) = self.ancestry {
            if ancestry.flat && ancestry.record_count > 0 {
                self.findings.push(Finding {
                    check: "flat_hierarchy".to_string(),
                    severity: FindingSeverity::Info,
                    message: format!(
                        "All {} records have empty ancestors; any hierarchy is only \
                         reachable through childrenUrl/descendantsUrl",
                        ancestry.record_count
                    ),
                    activity_id: None,
                    details: None,
                });
            }
            for (activity_id, missing) in &ancestry.unresolved {
                self.findings.push(Finding {
                    check: "flat_hierarchy".to_string(),
                    severity: FindingSeverity::Info,
                    message: format!(
                        "Activity '{}' references ancestor(s) not in this document: {}",
                        activity_id,
                        missing.join(", ")
                    ),
                    activity_id: Some(activity_id.clone()),
                    details: Some(serde_json::json!({ "unresolved": missing })),
                });
            }
        }

        if self.stats.file_ids.len() > 1 {
            let ids: Vec<&str> = self.stats.file_ids.iter().map(String::as_str).collect();
            self.findings.push(Finding {
                check: "mixed_file_ids".to_string(),
                severity: FindingSeverity::Info,
                message: format!("Records span {} file ids: {}", ids.len(), ids.join(", ")),
                activity_id: None,
                details: Some(serde_json::json!({ "file_ids": ids })),
            });
        }

        // Sort findings for deterministic output
        self.findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.check.cmp(&b.check))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}

fn span_finding(check: &str, what: &str, issue: &SpanIssue, tolerance_ms: i64) -> Finding {
    let message = match issue.drift_ms {
        Some(drift) => format!(
            "Activity '{}' {} '{}' is off by {} ms (tolerance {} ms)",
            issue.activity_id, what, issue.value, drift, tolerance_ms
        ),
        None => format!(
            "Activity '{}' {} '{}' is not a duration",
            issue.activity_id, what, issue.value
        ),
    };
    Finding {
        check: check.to_string(),
        severity: FindingSeverity::Warning,
        message,
        activity_id: Some(issue.activity_id.clone()),
        details: Some(serde_json::json!({
            "value": issue.value,
            "drift_ms": issue.drift_ms,
        })),
    }
}
