use crate::distance::{field_goal_distance, kickoff_distance, punt_distance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw entry fields keyed by field name, as they arrive from the entry form.
pub type KickFields = BTreeMap<String, String>;

/// Field names accepted when saving or patching a kick.
pub mod keys {
    pub const KICKER: &str = "Kicker";
    pub const HOLDER: &str = "Holder";
    pub const LONG_SNAPPER: &str = "LongSnapper";

    pub const YARD_LINE: &str = "YardLine";
    pub const POSITION: &str = "Position";
    /// Alias for [`POSITION`]; the report labels this column "Hash".
    pub const HASH: &str = "Hash";
    pub const OP_TIME: &str = "OpTime";
    pub const RESULT: &str = "Result";

    pub const RESULT_YARD_LINE: &str = "ResultYardLine";
    pub const LANDING_LOCATION: &str = "LandingLocation";
    pub const HANG_TIME: &str = "HangTime";

    pub const KICK_YARD_LINE: &str = "KickYardLine";
    pub const KICK_LOCATION: &str = "KickLocation";
    pub const LANDED_YARD_LINE: &str = "LandedYardLine";
    pub const SNAP_TIME: &str = "SnapTime";
    pub const HAND_TO_FOOT_TIME: &str = "HandToFootTime";
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum KickType {
    #[strum(serialize = "Field Goal")]
    FieldGoal,
    Kickoff,
    Punt,
}

impl KickType {
    /// Lenient name lookup: "Field Goal", "FieldGoal", "field-goal", "fg", ...
    pub fn parse(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "fieldgoal" | "fg" => Some(KickType::FieldGoal),
            "kickoff" | "ko" => Some(KickType::Kickoff),
            "punt" | "p" => Some(KickType::Punt),
            _ => None,
        }
    }
}

/// Names shared by every kick type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickHeader {
    pub kicker: String,
    pub holder: String,
    pub long_snapper: String,
}

impl KickHeader {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            keys::KICKER => Some(&mut self.kicker),
            keys::HOLDER => Some(&mut self.holder),
            keys::LONG_SNAPPER => Some(&mut self.long_snapper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGoal {
    pub yard_line: String,
    pub position: String,
    pub op_time: String,
    pub result: String,
}

impl FieldGoal {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            keys::YARD_LINE => Some(&mut self.yard_line),
            keys::POSITION | keys::HASH => Some(&mut self.position),
            keys::OP_TIME => Some(&mut self.op_time),
            keys::RESULT => Some(&mut self.result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kickoff {
    pub yard_line: String,
    pub position: String,
    pub result_yard_line: String,
    pub landing_location: String,
    pub hang_time: String,
}

impl Kickoff {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            keys::YARD_LINE => Some(&mut self.yard_line),
            keys::POSITION | keys::HASH => Some(&mut self.position),
            keys::RESULT_YARD_LINE => Some(&mut self.result_yard_line),
            keys::LANDING_LOCATION => Some(&mut self.landing_location),
            keys::HANG_TIME => Some(&mut self.hang_time),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punt {
    pub kick_yard_line: String,
    pub kick_location: String,
    pub landed_yard_line: String,
    pub landing_location: String,
    pub snap_time: String,
    pub hand_to_foot_time: String,
    pub hang_time: String,
}

impl Punt {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            keys::KICK_YARD_LINE => Some(&mut self.kick_yard_line),
            keys::KICK_LOCATION => Some(&mut self.kick_location),
            keys::LANDED_YARD_LINE => Some(&mut self.landed_yard_line),
            keys::LANDING_LOCATION => Some(&mut self.landing_location),
            keys::SNAP_TIME => Some(&mut self.snap_time),
            keys::HAND_TO_FOOT_TIME => Some(&mut self.hand_to_foot_time),
            keys::HANG_TIME => Some(&mut self.hang_time),
            _ => None,
        }
    }
}

/// Type-specific payload, selected by the kick type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kick_type")]
pub enum KickDetail {
    FieldGoal(FieldGoal),
    Kickoff(Kickoff),
    Punt(Punt),
    /// A type name we do not know; the record keeps only its header.
    Unrecognized { name: String },
}

impl KickDetail {
    pub fn for_type(name: &str) -> Self {
        match KickType::parse(name) {
            Some(KickType::FieldGoal) => KickDetail::FieldGoal(FieldGoal::default()),
            Some(KickType::Kickoff) => KickDetail::Kickoff(Kickoff::default()),
            Some(KickType::Punt) => KickDetail::Punt(Punt::default()),
            None => KickDetail::Unrecognized {
                name: name.to_string(),
            },
        }
    }

    pub fn kick_type(&self) -> Option<KickType> {
        match self {
            KickDetail::FieldGoal(_) => Some(KickType::FieldGoal),
            KickDetail::Kickoff(_) => Some(KickType::Kickoff),
            KickDetail::Punt(_) => Some(KickType::Punt),
            KickDetail::Unrecognized { .. } => None,
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match self {
            KickDetail::FieldGoal(fg) => fg.slot(key),
            KickDetail::Kickoff(ko) => ko.slot(key),
            KickDetail::Punt(punt) => punt.slot(key),
            KickDetail::Unrecognized { .. } => None,
        }
    }

    /// Distance derived from the current raw fields.
    pub fn distance(&self) -> Option<u32> {
        match self {
            KickDetail::FieldGoal(fg) => field_goal_distance(&fg.yard_line),
            KickDetail::Kickoff(ko) => kickoff_distance(&ko.yard_line, &ko.result_yard_line),
            KickDetail::Punt(punt) => punt_distance(&punt.kick_yard_line, &punt.landed_yard_line),
            KickDetail::Unrecognized { .. } => None,
        }
    }
}

/// One kick attempt recorded during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickRecord {
    id: u32,
    pub header: KickHeader,
    pub detail: KickDetail,
    /// Cached result of [`KickDetail::distance`]; refreshed on every write.
    distance: Option<u32>,
}

impl KickRecord {
    /// Builds a record from raw entry fields. Keys that do not belong to the
    /// kick type are dropped.
    pub fn build(id: u32, kick_type: &str, fields: &KickFields) -> Self {
        let mut record = Self {
            id,
            header: KickHeader::default(),
            detail: KickDetail::for_type(kick_type),
            distance: None,
        };
        record.apply(fields);
        record
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn distance(&self) -> Option<u32> {
        self.distance
    }

    pub fn kick_type(&self) -> Option<KickType> {
        self.detail.kick_type()
    }

    /// Display name of the kick type, including unrecognized names.
    pub fn type_name(&self) -> String {
        match &self.detail {
            KickDetail::Unrecognized { name } => name.clone(),
            detail => detail
                .kick_type()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    /// Applies every recognized key in `patch`, re-derives the distance and
    /// returns the keys that were ignored.
    pub fn apply(&mut self, patch: &KickFields) -> Vec<String> {
        let mut ignored = Vec::new();
        for (key, value) in patch {
            let slot = match self.header.slot(key) {
                Some(slot) => Some(slot),
                None => self.detail.slot(key),
            };
            match slot {
                Some(slot) => *slot = value.clone(),
                None => ignored.push(key.clone()),
            }
        }
        self.distance = self.detail.distance();
        ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> KickFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn kick_type_names() {
        assert_eq!(KickType::parse("Field Goal"), Some(KickType::FieldGoal));
        assert_eq!(KickType::parse("field-goal"), Some(KickType::FieldGoal));
        assert_eq!(KickType::parse("FG"), Some(KickType::FieldGoal));
        assert_eq!(KickType::parse("Kickoff"), Some(KickType::Kickoff));
        assert_eq!(KickType::parse("punt"), Some(KickType::Punt));
        assert_eq!(KickType::parse("Onside"), None);
        assert_eq!(KickType::FieldGoal.to_string(), "Field Goal");
        assert_eq!(KickType::Kickoff.to_string(), "Kickoff");
    }

    #[test]
    fn build_field_goal_derives_distance() {
        let record = KickRecord::build(
            1,
            "Field Goal",
            &fields(&[
                (keys::KICKER, "Smith"),
                (keys::YARD_LINE, "-25"),
                (keys::HASH, "L"),
                (keys::RESULT, "Good"),
            ]),
        );
        assert_eq!(record.id(), 1);
        assert_eq!(record.header.kicker, "Smith");
        assert_eq!(record.distance(), Some(43));
        match &record.detail {
            KickDetail::FieldGoal(fg) => {
                assert_eq!(fg.position, "L");
                assert_eq!(fg.result, "Good");
            }
            other => panic!("expected field goal, got {other:?}"),
        }
    }

    #[test]
    fn build_drops_fields_of_other_types() {
        let record = KickRecord::build(
            2,
            "Kickoff",
            &fields(&[(keys::YARD_LINE, "-35"), (keys::OP_TIME, "1.30")]),
        );
        assert_eq!(
            record.detail,
            KickDetail::Kickoff(Kickoff {
                yard_line: "-35".into(),
                ..Kickoff::default()
            })
        );
        assert_eq!(record.distance(), None);
    }

    #[test]
    fn unrecognized_type_keeps_common_fields_only() {
        let record = KickRecord::build(
            3,
            "Onside",
            &fields(&[(keys::KICKER, "Jones"), (keys::YARD_LINE, "-35")]),
        );
        assert_eq!(record.kick_type(), None);
        assert_eq!(record.type_name(), "Onside");
        assert_eq!(record.header.kicker, "Jones");
        assert_eq!(record.distance(), None);
    }

    #[test]
    fn apply_reports_ignored_keys_and_rederives() {
        let mut record = KickRecord::build(
            4,
            "Punt",
            &fields(&[(keys::KICK_YARD_LINE, "-40"), (keys::LANDED_YARD_LINE, "10")]),
        );
        assert_eq!(record.distance(), Some(50));

        let ignored = record.apply(&fields(&[
            (keys::LANDED_YARD_LINE, "20"),
            ("Distance", "99"),
            (keys::RESULT, "Good"),
        ]));
        assert_eq!(ignored, vec!["Distance".to_string(), keys::RESULT.to_string()]);
        assert_eq!(record.distance(), Some(40));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut record = KickRecord::build(
            5,
            "Kickoff",
            &fields(&[(keys::YARD_LINE, "-35"), (keys::RESULT_YARD_LINE, "20")]),
        );
        let before = record.clone();
        assert!(record.apply(&KickFields::new()).is_empty());
        assert_eq!(record, before);
    }
}
