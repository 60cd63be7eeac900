//! Legend grouping for display.
//!
//! Records are projected to [`ActivityPoint`]s and bucketed by their
//! `legend` tag in first-seen order. Records without a legend land in a
//! band named after the source they were loaded from.

use serde::Serialize;
use tolkit_interchange::{ActivityRecord, DoyTime, TimeRange};

use crate::color::{color_of, Rgb};
use crate::stats::whole_ms;

/// Display projection of one activity record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    /// `__document_id`.
    pub id: String,
    pub activity_id: String,
    pub activity_name: String,
    pub activity_type: String,
    /// Empty when the record has no legend tag.
    pub legend: String,
    pub color: Rgb,
    pub start: DoyTime,
    pub end: DoyTime,
    pub duration_ms: i64,
    /// Shown instead of the name when present.
    pub message: Option<String>,
    /// `Keyword Line` of an advisory; shown like `message`.
    pub keyword_line: Option<String>,
    pub children_url: Option<String>,
    pub descendants_url: Option<String>,
    pub hidden: bool,
}

impl ActivityPoint {
    pub fn from_record(record: &ActivityRecord) -> Self {
        ActivityPoint {
            id: record.document_id.clone(),
            activity_id: record.activity_id.clone(),
            activity_name: record.activity_name.clone(),
            activity_type: record.activity_type.clone(),
            legend: record.legend().unwrap_or_default().to_string(),
            color: color_of(record),
            start: record.start,
            end: record.end,
            duration_ms: whole_ms(record.duration()),
            message: record.message().map(str::to_owned),
            keyword_line: record.keyword_line.clone(),
            children_url: record.children_url.clone(),
            descendants_url: record.descendants_url.clone(),
            hidden: false,
        }
    }

    /// Text a tooltip shows: the message, then the keyword line, then the name.
    pub fn label(&self) -> &str {
        self.message
            .as_deref()
            .or(self.keyword_line.as_deref())
            .unwrap_or(&self.activity_name)
    }

    /// A bare message marker. Advisories carry a keyword line as well and
    /// are drawn as regular activities.
    pub fn is_message_type(&self) -> bool {
        self.message.is_some() && self.keyword_line.is_none()
    }
}

/// One legend band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendBand {
    pub name: String,
    pub points: Vec<ActivityPoint>,
}

impl LegendBand {
    pub fn visible(&self) -> usize {
        self.points.iter().filter(|p| !p.hidden).count()
    }

    pub fn hidden(&self) -> usize {
        self.points.len() - self.visible()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendGroups {
    pub legends: Vec<LegendBand>,
    /// Earliest start and latest end over every grouped point.
    pub max_time_range: Option<TimeRange>,
}

impl LegendGroups {
    pub fn get(&self, name: &str) -> Option<&LegendBand> {
        self.legends.iter().find(|b| b.name == name)
    }

    /// Apply [`filter_points`] to every band.
    pub fn filter(&mut self, pattern: &str) -> Result<(), regex::Error> {
        let regex = compile_filter(pattern)?;
        for band in &mut self.legends {
            apply_filter(&mut band.points, regex.as_ref());
        }
        Ok(())
    }
}

/// Group records into legend bands.
pub fn group_by_legend(source_name: &str, records: &[ActivityRecord]) -> LegendGroups {
    let mut legends: Vec<LegendBand> = Vec::new();

    for record in records {
        let point = ActivityPoint::from_record(record);
        let band_name = if point.legend.is_empty() {
            source_name.to_string()
        } else {
            point.legend.clone()
        };

        match legends.iter_mut().find(|b| b.name == band_name) {
            Some(band) => band.points.push(point),
            None => legends.push(LegendBand {
                name: band_name,
                points: vec![point],
            }),
        }
    }

    LegendGroups {
        legends,
        max_time_range: TimeRange::covering(records),
    }
}

/// Hide points whose activity name does not match `pattern` (unanchored).
/// An empty pattern unhides everything.
pub fn filter_points(points: &mut [ActivityPoint], pattern: &str) -> Result<(), regex::Error> {
    let regex = compile_filter(pattern)?;
    apply_filter(points, regex.as_ref());
    Ok(())
}

fn compile_filter(pattern: &str) -> Result<Option<regex::Regex>, regex::Error> {
    if pattern.is_empty() {
        Ok(None)
    } else {
        regex::Regex::new(pattern).map(Some)
    }
}

fn apply_filter(points: &mut [ActivityPoint], regex: Option<&regex::Regex>) {
    for point in points {
        point.hidden = match regex {
            Some(re) => !re.is_match(&point.activity_name),
            None => false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tolkit_interchange::from_timeline;

    fn record(id: &str, name: &str, start: &str, end: &str, metadata: Value) -> Value {
        json!({
            "__file_id": "plan",
            "__document_id": format!("doc-{}", id),
            "__kind": "tol_activity",
            "Activity ID": id,
            "Activity Name": name,
            "Activity Type": "Downlink",
            "Tstart Assigned": start,
            "Tend Assigned": end,
            "Metadata": metadata
        })
    }

    fn records(entries: Vec<Value>) -> Vec<ActivityRecord> {
        from_timeline(&json!({
            "Timeline Metadata": {"hasTimelineType": "activity"},
            "Timeline Data": entries
        }))
        .unwrap()
        .entries
    }

    fn sample() -> Vec<ActivityRecord> {
        records(vec![
            record(
                "a",
                "Downlink_3125.0",
                "2022-167T02:00:00",
                "2022-167T03:00:00",
                json!([{"Name": "legend", "Value": "X band"}, {"Name": "Color", "Value": "Khaki"}]),
            ),
            record(
                "b",
                "Downlink_40000.0",
                "2022-166T23:00:00",
                "2022-167T01:00:00",
                json!([{"Name": "legend", "Value": "Ka band"}]),
            ),
            record("c", "Downlink_3125.0", "2022-168T00:00:00", "2022-168T05:00:00", json!([])),
            record(
                "d",
                "Downlink_2000.0",
                "2022-167T04:00:00",
                "2022-167T04:30:00",
                json!([{"Name": "legend", "Value": "X band"}]),
            ),
        ])
    }

    #[test]
    fn test_first_seen_band_order() {
        let groups = group_by_legend("telecom", &sample());
        let names: Vec<_> = groups.legends.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["X band", "Ka band", "telecom"]);
        assert_eq!(groups.get("X band").unwrap().points.len(), 2);
        assert_eq!(groups.get("telecom").unwrap().points[0].legend, "");
    }

    #[test]
    fn test_max_time_range() {
        let range = group_by_legend("telecom", &sample()).max_time_range.unwrap();
        assert_eq!(range.start.to_string(), "2022-166T23:00:00.000");
        assert_eq!(range.end.to_string(), "2022-168T05:00:00.000");
        assert!(group_by_legend("x", &[]).max_time_range.is_none());
    }

    #[test]
    fn test_point_projection() {
        let groups = group_by_legend("telecom", &sample());
        let p = &groups.get("X band").unwrap().points[0];
        assert_eq!(p.id, "doc-a");
        assert_eq!(p.color, Rgb(249, 217, 119));
        assert_eq!(p.duration_ms, 3_600_000);
        assert_eq!(p.label(), "Downlink_3125.0");
        assert!(!p.hidden);
    }

    #[test]
    fn test_message_replaces_label() {
        let recs = records(vec![record(
            "m",
            "Downlink_1.0",
            "2022-167T00:00:00",
            "2022-167T00:10:00",
            json!([{"Name": "message", "Value": "Rate reduced for station conflict"}]),
        )]);
        let point = ActivityPoint::from_record(&recs[0]);
        assert_eq!(point.label(), "Rate reduced for station conflict");
        assert!(point.is_message_type());
    }

    #[test]
    fn test_keyword_line_replaces_label() {
        let mut advisory = record(
            "k",
            "Advisory_1",
            "2022-167T00:00:00",
            "2022-167T00:10:00",
            json!([]),
        );
        advisory["Keyword Line"] = json!("DSS-14 UNAVAILABLE 167T00:00 167T00:10");
        let recs = records(vec![advisory]);
        let point = ActivityPoint::from_record(&recs[0]);
        assert_eq!(point.keyword_line.as_deref(), Some("DSS-14 UNAVAILABLE 167T00:00 167T00:10"));
        assert_eq!(point.label(), "DSS-14 UNAVAILABLE 167T00:00 167T00:10");
        assert!(!point.is_message_type());

        // An advisory with both shows the message and is not a message marker.
        let mut both = record(
            "kb",
            "Advisory_2",
            "2022-167T00:00:00",
            "2022-167T00:10:00",
            json!([{"Name": "message", "Value": "Station conflict"}]),
        );
        both["Keyword Line"] = json!("DSS-43 CONFLICT");
        let point = ActivityPoint::from_record(&records(vec![both])[0]);
        assert_eq!(point.label(), "Station conflict");
        assert!(!point.is_message_type());
    }

    #[test]
    fn test_filter_hides_non_matching() {
        let mut groups = group_by_legend("telecom", &sample());
        groups.filter("3125").unwrap();
        let x = groups.get("X band").unwrap();
        assert_eq!((x.visible(), x.hidden()), (1, 1));
        assert_eq!(groups.get("Ka band").unwrap().hidden(), 1);

        groups.filter("").unwrap();
        assert!(groups.legends.iter().all(|b| b.hidden() == 0));
    }

    #[test]
    fn test_filter_points_invalid_regex() {
        let mut points: Vec<_> = sample().iter().map(ActivityPoint::from_record).collect();
        assert!(filter_points(&mut points, "Downlink_(").is_err());
        filter_points(&mut points, "^Downlink_2").unwrap();
        assert_eq!(points.iter().filter(|p| !p.hidden).count(), 1);
    }

    #[test]
    fn test_color_resolution_order() {
        let recs = records(vec![
            record(
                "h",
                "n",
                "2022-167T00:00:00",
                "2022-167T00:10:00",
                json!([
                    {"Name": "Color", "Value": "Plum"},
                    {"Name": "color", "Value": [1, 2, 3]},
                    {"Name": "COLOR", "Value": "#ffffff"}
                ]),
            ),
            record(
                "n",
                "n",
                "2022-167T00:00:00",
                "2022-167T00:10:00",
                json!([
                    {"Name": "Color", "Value": "Plum"},
                    {"Name": "Color", "Value": "Yellow"}
                ]),
            ),
            record(
                "u",
                "n",
                "2022-167T00:00:00",
                "2022-167T00:10:00",
                json!([
                    {"Name": "Color", "Value": "Plum"},
                    {"Name": "Color", "Value": "Mauve"}
                ]),
            ),
        ]);
        assert_eq!(color_of(&recs[0]), Rgb(1, 2, 3));
        assert_eq!(color_of(&recs[1]), Rgb(245, 202, 46));
        assert_eq!(color_of(&recs[2]), crate::color::BLACK);
    }
}
