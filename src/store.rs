use crate::error::{KickError, Result};
use crate::session::SessionState;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Backing storage for session state, keyed by session identifier.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<SessionState>>;

    fn save(&self, key: &str, state: &SessionState) -> Result<()>;

    /// Loads the session (a fresh one when the key is unknown), runs `op` and
    /// writes the result back as one atomic step. Nothing is written when
    /// `op` fails.
    fn update<R, F>(&self, key: &str, op: F) -> Result<R>
    where
        Self: Sized,
        F: FnOnce(&mut SessionState) -> Result<R>;

    /// Removes the session; removing an unknown key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// Process-local store, mostly useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &str) -> Result<Option<SessionState>> {
        let sessions = self.sessions.lock().map_err(|_| KickError::LockPoisoned)?;
        Ok(sessions.get(key).cloned())
    }

    fn save(&self, key: &str, state: &SessionState) -> Result<()> {
        let mut sessions = self.sessions.lock().map_err(|_| KickError::LockPoisoned)?;
        sessions.insert(key.to_string(), state.clone());
        Ok(())
    }

    fn update<R, F>(&self, key: &str, op: F) -> Result<R>
    where
        F: FnOnce(&mut SessionState) -> Result<R>,
    {
        let mut sessions = self.sessions.lock().map_err(|_| KickError::LockPoisoned)?;
        let mut state = sessions.get(key).cloned().unwrap_or_default();
        let out = op(&mut state)?;
        sessions.insert(key.to_string(), state);
        Ok(out)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().map_err(|_| KickError::LockPoisoned)?;
        sessions.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let sessions = self.sessions.lock().map_err(|_| KickError::LockPoisoned)?;
        let mut keys: Vec<String> = sessions.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// SQLite-backed store so a session outlives a single CLI invocation.
///
/// Several processes may open the same file; `update` takes the database
/// write lock up front so their read-modify-write cycles never interleave.
#[derive(Debug)]
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening session database");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                key TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn read_state(conn: &Connection, key: &str) -> Result<Option<SessionState>> {
    let state: Option<String> = conn
        .query_row(
            "SELECT state FROM sessions WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    match state {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn write_state(conn: &Connection, key: &str, state: &SessionState) -> Result<()> {
    let json = serde_json::to_string(state)?;
    conn.execute(
        r#"
        INSERT INTO sessions (key, state, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at
        "#,
        params![key, json, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, key: &str) -> Result<Option<SessionState>> {
        let conn = self.conn.lock().map_err(|_| KickError::LockPoisoned)?;
        read_state(&conn, key)
    }

    fn save(&self, key: &str, state: &SessionState) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| KickError::LockPoisoned)?;
        write_state(&conn, key, state)
    }

    fn update<R, F>(&self, key: &str, op: F) -> Result<R>
    where
        F: FnOnce(&mut SessionState) -> Result<R>,
    {
        let mut conn = self.conn.lock().map_err(|_| KickError::LockPoisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut state = read_state(&tx, key)?.unwrap_or_default();
        // dropping `tx` on error rolls back
        let out = op(&mut state)?;
        write_state(&tx, key, &state)?;
        tx.commit()?;
        Ok(out)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| KickError::LockPoisoned)?;
        conn.execute("DELETE FROM sessions WHERE key = ?1", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().map_err(|_| KickError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT key FROM sessions ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }
}
