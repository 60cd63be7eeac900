//! Timeline analyzer: consistency checks with structured output.
//!
//! The analyzer consumes a loaded `TimelineDocument`. Each check is a
//! separate module producing a serializable result struct. The
//! `analyze()` function runs every check over the document's records
//! (nested children included) and aggregates the results into an
//! `AnalysisReport`.
//!
//! Legend grouping and colour resolution for display live in [`legend`]
//! and [`color`].

pub mod ancestry;
pub mod color;
pub mod identity;
pub mod legend;
pub mod ordering;
pub mod report;
pub mod spans;
pub mod stats;

use time::Duration;
use tolkit_interchange::hierarchy::flatten;
use tolkit_interchange::TimelineDocument;

pub use ancestry::AncestryResult;
pub use color::{color_of, Rgb};
pub use identity::IdentityResult;
pub use legend::{filter_points, group_by_legend, ActivityPoint, LegendBand, LegendGroups};
pub use ordering::OrderResult;
pub use report::{AnalysisReport, Finding, FindingSeverity};
pub use spans::{SpanIssue, SpanResult};
pub use stats::TimelineStats;

/// Default allowance between a textual duration and `end - start`.
pub const DEFAULT_SPAN_TOLERANCE_MS: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub span_tolerance: Duration,
}

impl AnalysisOptions {
    pub fn with_tolerance_ms(ms: i64) -> Self {
        AnalysisOptions {
            span_tolerance: Duration::milliseconds(ms),
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::with_tolerance_ms(DEFAULT_SPAN_TOLERANCE_MS)
    }
}

/// Run every check on a timeline document.
///
/// Ordering is checked over the top-level entries only; every other check
/// sees nested children too.
pub fn analyze(document: &TimelineDocument, options: &AnalysisOptions) -> AnalysisReport {
    let records = flatten(&document.entries);

    let identity = identity::analyze_identity(&records);
    let spans = spans::analyze_spans(&records, options.span_tolerance);
    let ordering = ordering::analyze_order(&document.entries);
    let ancestry = ancestry::analyze_ancestry(&records);

    let mut stats = TimelineStats::collect(document, &records);
    stats.max_span_drift_ms = spans.max_drift_ms;

    let mut report = AnalysisReport::new(stats);
    report.identity = Some(identity);
    report.spans = Some(spans);
    report.ordering = Some(ordering);
    report.ancestry = Some(ancestry);

    report.extract_findings();

    tracing::debug!(
        records = records.len(),
        findings = report.findings.len(),
        errors = report.count(FindingSeverity::Error),
        "timeline analyzed"
    );

    report
}
