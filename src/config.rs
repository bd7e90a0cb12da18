use crate::render::ReportFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_SESSION_KEY: &str = "default";
const APP_NAME: &str = "kicklog";
const DATABASE_FILE: &str = "sessions.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub session_key: String,
    pub report_format: ReportFormat,
    pub report_dir: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_string(),
            report_format: ReportFormat::Text,
            report_dir: None,
            database_path: None,
        }
    }
}

impl Config {
    /// Database to open when no `--db` flag is given: the configured path,
    /// else the per-user state directory.
    pub fn resolve_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .or_else(|| {
                state_database_path(
                    std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
                    std::env::var_os("HOME").map(PathBuf::from),
                )
            })
            .or_else(|| {
                ProjectDirs::from("", "", APP_NAME)
                    .map(|pd| pd.data_local_dir().join(DATABASE_FILE))
            })
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_{DATABASE_FILE}")))
    }
}

/// `$XDG_STATE_HOME/kicklog/sessions.db`, or `~/.local/state/...` when the
/// variable is unset. Relative XDG paths are ignored, as the basedir rules ask.
fn state_database_path(xdg_state_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let state_dir = xdg_state_home
        .filter(|dir| dir.is_absolute())
        .or_else(|| {
            home.filter(|dir| !dir.as_os_str().is_empty())
                .map(|home| home.join(".local").join("state"))
        })?;
    Some(state_dir.join(APP_NAME).join(DATABASE_FILE))
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from(format!("{APP_NAME}_config.json"))
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %self.path.display(), error = %e, "ignoring unreadable config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            session_key: "tuesday".into(),
            report_format: ReportFormat::Csv,
            report_dir: Some(dir.path().join("reports")),
            database_path: Some(dir.path().join("sessions.db")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_or_corrupt_config_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"report_format": "json"}"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.report_format, ReportFormat::Json);
        assert_eq!(loaded.session_key, DEFAULT_SESSION_KEY);
    }

    #[test]
    fn configured_database_path_wins() {
        let cfg = Config {
            database_path: Some(PathBuf::from("/data/kicks.db")),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_database_path(), PathBuf::from("/data/kicks.db"));
    }

    #[test]
    fn state_dir_prefers_xdg_then_home() {
        assert_eq!(
            state_database_path(Some("/xdg/state".into()), Some("/home/coach".into())),
            Some(PathBuf::from("/xdg/state/kicklog/sessions.db"))
        );
        assert_eq!(
            state_database_path(None, Some("/home/coach".into())),
            Some(PathBuf::from("/home/coach/.local/state/kicklog/sessions.db"))
        );
        assert_eq!(
            state_database_path(Some("relative".into()), Some("/home/coach".into())),
            Some(PathBuf::from("/home/coach/.local/state/kicklog/sessions.db"))
        );
        assert_eq!(state_database_path(None, None), None);
    }
}
