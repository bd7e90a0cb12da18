//! Prefill memory for the entry form.
//!
//! Remembers the last non-empty value of each prefillable field. Stopwatch
//! readings belong to a single attempt and are never remembered.

use crate::kick::{KickDetail, KickRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const KICK_TYPE: &str = "kick_type";
pub const KICKER: &str = "kicker";
pub const HOLDER: &str = "holder";
pub const LONG_SNAPPER: &str = "longsnapper";
pub const FG_YARD_LINE: &str = "fg_yard_line";
pub const FG_HASH: &str = "fg_hash";
pub const FG_RESULT: &str = "fg_result";
pub const KO_YARD_LINE: &str = "ko_yard_line";
pub const KO_HASH: &str = "ko_hash";
pub const KO_RESULT_YARD_LINE: &str = "ko_result_yard_line";
pub const KO_LOCATION: &str = "ko_location";
pub const PUNT_KICK_YARD_LINE: &str = "punt_kick_yl";
pub const PUNT_KICK_LOCATION: &str = "punt_kick_loc";
pub const PUNT_LANDED_YARD_LINE: &str = "punt_landed_yl";
pub const PUNT_LANDED_LOCATION: &str = "punt_landed_loc";

/// Timing fields, one per stopwatch on the entry form.
pub const EXCLUDED_TIMING_KEYS: [&str; 5] = [
    "fg_op_time",
    "ko_hang_time",
    "punt_snap_time",
    "punt_hand_to_foot",
    "punt_hang_time",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LastUsedDefaults(BTreeMap<String, String>);

impl LastUsedDefaults {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Overwrites the default for every tracked field the record fills in.
    /// An unrecognized kick type keeps the previous `kick_type` default.
    pub fn update(&mut self, record: &KickRecord) {
        let type_name = record.kick_type().map(|t| t.to_string()).unwrap_or_default();
        for (key, value) in tracked_fields(record, &type_name) {
            if value.trim().is_empty() || EXCLUDED_TIMING_KEYS.contains(&key) {
                continue;
            }
            self.0.insert(key.to_string(), value.to_string());
        }
    }
}

// Timing fields (op_time, hang_time, snap_time, hand_to_foot_time) are left out
// of every arm below.
fn tracked_fields<'a>(
    record: &'a KickRecord,
    type_name: &'a str,
) -> Vec<(&'static str, &'a str)> {
    let mut fields = vec![
        (KICK_TYPE, type_name),
        (KICKER, record.header.kicker.as_str()),
        (HOLDER, record.header.holder.as_str()),
        (LONG_SNAPPER, record.header.long_snapper.as_str()),
    ];
    match &record.detail {
        KickDetail::FieldGoal(fg) => fields.extend([
            (FG_YARD_LINE, fg.yard_line.as_str()),
            (FG_HASH, fg.position.as_str()),
            (FG_RESULT, fg.result.as_str()),
        ]),
        KickDetail::Kickoff(ko) => fields.extend([
            (KO_YARD_LINE, ko.yard_line.as_str()),
            (KO_HASH, ko.position.as_str()),
            (KO_RESULT_YARD_LINE, ko.result_yard_line.as_str()),
            (KO_LOCATION, ko.landing_location.as_str()),
        ]),
        KickDetail::Punt(punt) => fields.extend([
            (PUNT_KICK_YARD_LINE, punt.kick_yard_line.as_str()),
            (PUNT_KICK_LOCATION, punt.kick_location.as_str()),
            (PUNT_LANDED_YARD_LINE, punt.landed_yard_line.as_str()),
            (PUNT_LANDED_LOCATION, punt.landing_location.as_str()),
        ]),
        KickDetail::Unrecognized { .. } => {}
    }
    fields
}
