use crate::defaults::LastUsedDefaults;
use crate::error::{KickError, Result};
use crate::kick::{KickFields, KickRecord};
use crate::report::{group_for_report, ReportDocument};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Everything recorded during one practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub workout_date: String,
    records: Vec<KickRecord>,
    next_id: u32,
    last_used_defaults: LastUsedDefaults,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(today())
    }
}

impl SessionState {
    pub fn new(workout_date: impl Into<String>) -> Self {
        Self {
            workout_date: workout_date.into(),
            records: Vec::new(),
            next_id: 1,
            last_used_defaults: LastUsedDefaults::default(),
        }
    }

    /// Starts over: new workout date, no kicks, ids from 1 again.
    ///
    /// The prefill defaults survive so the next entry form is still filled in.
    pub fn start(&mut self, client_date: Option<&str>) {
        self.workout_date = match client_date.map(str::trim) {
            Some(date) if !date.is_empty() => date.to_string(),
            _ => today(),
        };
        self.records.clear();
        self.next_id = 1;
        info!(workout_date = %self.workout_date, "session started");
    }

    pub fn save_kick(&mut self, kick_type: &str, fields: &KickFields) -> KickRecord {
        let record = KickRecord::build(self.next_id, kick_type, fields);
        self.next_id = self.next_id.saturating_add(1);

        if record.kick_type().is_none() {
            warn!(kick_type, id = record.id(), "unrecognized kick type, keeping common fields only");
        }
        info!(
            id = record.id(),
            kick_type = %record.type_name(),
            distance = ?record.distance(),
            "kick saved"
        );

        self.last_used_defaults.update(&record);
        self.records.push(record.clone());
        record
    }

    pub fn kicks(&self) -> &[KickRecord] {
        &self.records
    }

    pub fn get_kick(&self, id: u32) -> Result<&KickRecord> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or(KickError::NotFound { id })
    }

    pub fn update_kick(&mut self, id: u32, patch: &KickFields) -> Result<KickRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(KickError::NotFound { id })?;

        let ignored = record.apply(patch);
        if !ignored.is_empty() {
            debug!(id, ?ignored, "ignoring fields the kick type does not have");
        }
        info!(id, distance = ?record.distance(), "kick updated");

        let updated = record.clone();
        self.last_used_defaults.update(&updated);
        Ok(updated)
    }

    pub fn last_used_defaults(&self) -> &LastUsedDefaults {
        &self.last_used_defaults
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// `None` when there is nothing to report.
    pub fn export_report(&self) -> Option<ReportDocument> {
        if self.records.is_empty() {
            debug!("export requested for an empty session");
            return None;
        }
        let doc = ReportDocument::new(&self.workout_date, group_for_report(&self.records));
        info!(sections = doc.sections.len(), kicks = self.records.len(), "report built");
        Some(doc)
    }
}
