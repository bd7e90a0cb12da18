//! The session boundary: one operation in flight per session key.

use crate::error::{KickError, Result};
use crate::kick::{KickFields, KickRecord};
use crate::report::ReportDocument;
use crate::session::SessionState;
use crate::store::SessionStore;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct SessionManager<S: SessionStore> {
    store: S,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock_for(&self, key: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| KickError::LockPoisoned)?;
        Ok(locks.entry(key.to_string()).or_default().clone())
    }

    /// Runs `op` against the session under its key lock. The store applies
    /// it atomically, which also covers other processes sharing the same
    /// database. A failed operation leaves the stored session untouched.
    fn mutate<R>(
        &self,
        key: &str,
        op: impl FnOnce(&mut SessionState) -> Result<R>,
    ) -> Result<R> {
        let lock = self.lock_for(key)?;
        let _guard = lock.lock().map_err(|_| KickError::LockPoisoned)?;
        self.store.update(key, op)
    }

    /// Reads a consistent snapshot under the key lock without writing back.
    fn read<R>(&self, key: &str, op: impl FnOnce(&SessionState) -> Result<R>) -> Result<R> {
        let lock = self.lock_for(key)?;
        let _guard = lock.lock().map_err(|_| KickError::LockPoisoned)?;
        let state = self.store.load(key)?.unwrap_or_default();
        op(&state)
    }

    pub fn start_session(&self, key: &str, client_date: Option<&str>) -> Result<()> {
        self.mutate(key, |state| {
            state.start(client_date);
            Ok(())
        })
    }

    pub fn save_kick(&self, key: &str, kick_type: &str, fields: &KickFields) -> Result<KickRecord> {
        self.mutate(key, |state| Ok(state.save_kick(kick_type, fields)))
    }

    pub fn list_kicks(&self, key: &str) -> Result<Vec<KickRecord>> {
        self.read(key, |state| Ok(state.kicks().to_vec()))
    }

    pub fn get_kick(&self, key: &str, id: u32) -> Result<KickRecord> {
        self.read(key, |state| state.get_kick(id).cloned())
    }

    pub fn update_kick(&self, key: &str, id: u32, patch: &KickFields) -> Result<KickRecord> {
        self.mutate(key, |state| state.update_kick(id, patch))
    }

    pub fn last_used_defaults(&self, key: &str) -> Result<BTreeMap<String, String>> {
        self.read(key, |state| Ok(state.last_used_defaults().as_map().clone()))
    }

    pub fn workout_date(&self, key: &str) -> Result<String> {
        self.read(key, |state| Ok(state.workout_date.clone()))
    }

    pub fn export_report(&self, key: &str) -> Result<Option<ReportDocument>> {
        self.read(key, |state| Ok(state.export_report()))
    }

    /// Discards the session entirely, prefill defaults included.
    pub fn end_session(&self, key: &str) -> Result<()> {
        let mut locks = self.locks.lock().map_err(|_| KickError::LockPoisoned)?;
        let lock = locks.entry(key.to_string()).or_default().clone();
        let _guard = lock.lock().map_err(|_| KickError::LockPoisoned)?;
        self.store.remove(key)?;
        locks.remove(key);
        info!(session = key, "session ended");
        Ok(())
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}
