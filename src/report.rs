//! Groups a session's kicks into the tables a report renderer prints.

use crate::kick::{KickDetail, KickRecord, KickType};
use serde::Serialize;

pub const FIELD_GOAL_COLUMNS: [&str; 9] = [
    "Kick #", "Kicker", "Holder", "Snapper", "Yard Line", "Hash", "Distance", "Result", "Op Time",
];

pub const PUNT_COLUMNS: [&str; 10] = [
    "Kick #",
    "Kicker",
    "Snapper",
    "Yard Line",
    "Hash",
    "Distance",
    "Location",
    "Snap",
    "Hand-to-foot",
    "Hang",
];

pub const KICKOFF_COLUMNS: [&str; 7] = [
    "Kick #", "Kicker", "Yard Line", "Hash", "Distance", "Hang", "Location",
];

/// Rows per kick type, each numbered from 1 within its own group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportGroups {
    pub field_goals: Vec<Vec<String>>,
    pub kickoffs: Vec<Vec<String>>,
    pub punts: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Everything a renderer needs: a title and the non-empty sections in print order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

fn cell(distance: Option<u32>) -> String {
    distance.map(|d| d.to_string()).unwrap_or_default()
}

fn distance_of(record: &KickRecord) -> String {
    // Records saved before a rule existed may carry no cached value.
    cell(record.distance().or_else(|| record.detail.distance()))
}

/// Partitions records by kick type in insertion order. Records of an
/// unrecognized type have no table and are skipped.
pub fn group_for_report(records: &[KickRecord]) -> ReportGroups {
    let mut groups = ReportGroups::default();
    for record in records {
        let header = &record.header;
        let distance = distance_of(record);
        match &record.detail {
            KickDetail::FieldGoal(fg) => {
                let kick_no = groups.field_goals.len() + 1;
                groups.field_goals.push(vec![
                    kick_no.to_string(),
                    header.kicker.clone(),
                    header.holder.clone(),
                    header.long_snapper.clone(),
                    fg.yard_line.clone(),
                    fg.position.clone(),
                    distance,
                    fg.result.clone(),
                    fg.op_time.clone(),
                ]);
            }
            KickDetail::Punt(punt) => {
                let kick_no = groups.punts.len() + 1;
                groups.punts.push(vec![
                    kick_no.to_string(),
                    header.kicker.clone(),
                    header.long_snapper.clone(),
                    punt.kick_yard_line.clone(),
                    punt.kick_location.clone(),
                    distance,
                    punt.landing_location.clone(),
                    punt.snap_time.clone(),
                    punt.hand_to_foot_time.clone(),
                    punt.hang_time.clone(),
                ]);
            }
            KickDetail::Kickoff(ko) => {
                let kick_no = groups.kickoffs.len() + 1;
                groups.kickoffs.push(vec![
                    kick_no.to_string(),
                    header.kicker.clone(),
                    ko.yard_line.clone(),
                    ko.position.clone(),
                    distance,
                    ko.hang_time.clone(),
                    ko.landing_location.clone(),
                ]);
            }
            KickDetail::Unrecognized { .. } => {}
        }
    }
    groups
}

pub fn report_title(workout_date: &str) -> String {
    format!("Practice Results \u{2014} {workout_date}")
}

impl ReportDocument {
    /// Lays out field goals, punts, then kickoffs, omitting empty sections.
    pub fn new(workout_date: &str, groups: ReportGroups) -> Self {
        let layout: [(KickType, &[&str], Vec<Vec<String>>); 3] = [
            (KickType::FieldGoal, &FIELD_GOAL_COLUMNS[..], groups.field_goals),
            (KickType::Punt, &PUNT_COLUMNS[..], groups.punts),
            (KickType::Kickoff, &KICKOFF_COLUMNS[..], groups.kickoffs),
        ];
        let sections = layout
            .into_iter()
            .filter(|(_, _, rows)| !rows.is_empty())
            .map(|(kick_type, columns, rows)| ReportSection {
                heading: kick_type.to_string(),
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            })
            .collect();
        Self {
            title: report_title(workout_date),
            sections,
        }
    }

    pub fn section(&self, heading: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}
