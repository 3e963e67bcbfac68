//! Key-value persistence for annotations, sessions, and the GitHub
//! connection.
//!
//! The storage area is an opaque string blob store. Reads never fail:
//! missing entries, malformed JSON, and unavailable backends all degrade
//! to an empty result. Writes log and swallow their failures.

use crate::domain::{Annotation, QaSession};
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;

/// A per-origin string key-value blob store.
pub trait StorageArea {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// Ephemeral in-memory storage, for tests and hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageArea for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// File-backed storage: one JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data directory, overridable with `GRABQA_DATA_HOME`.
    pub fn default_dir() -> PathBuf {
        if let Ok(path) = std::env::var("GRABQA_DATA_HOME") {
            return PathBuf::from(path);
        }

        #[cfg(target_os = "macos")]
        {
            if let Some(home) = home::home_dir() {
                return home
                    .join("Library")
                    .join("Application Support")
                    .join("GrabQA");
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(appdata) = std::env::var_os("APPDATA") {
                return PathBuf::from(appdata).join("GrabQA");
            }
        }

        #[cfg(target_os = "linux")]
        {
            if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
                return PathBuf::from(xdg).join("grabqa");
            }
            if let Some(home) = home::home_dir() {
                return home.join(".local").join("share").join("grabqa");
            }
        }

        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".grabqa")
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StorageArea for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("create storage directory")?;
        std::fs::write(self.path_for(key), value).context("write storage entry")
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path_for(key));
    }
}

/// Load the annotation collection under `key`. Never fails: a missing
/// entry, a malformed value, or an unavailable backend all yield an
/// empty list.
pub fn load_annotations(storage: &dyn StorageArea, key: &str) -> Vec<Annotation> {
    let Some(raw) = storage.get(key) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Annotation>>(&raw) {
        Ok(annotations) => annotations,
        Err(err) => {
            log::warn!("failed to load annotations from storage: {err}");
            Vec::new()
        }
    }
}

/// Serialize and write the full collection, overwriting any prior value.
/// Failures are logged and swallowed.
pub fn save_annotations(storage: &mut dyn StorageArea, key: &str, annotations: &[Annotation]) {
    let raw = match serde_json::to_string(annotations) {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("failed to serialize annotations: {err}");
            return;
        }
    };
    if let Err(err) = storage.set(key, &raw) {
        log::error!("failed to save annotations: {err}");
    }
}

/// Load a named session. Declared for forward compatibility; no current
/// flow reads sessions.
pub fn load_session(storage: &dyn StorageArea, key: &str) -> Option<QaSession> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(err) => {
            log::warn!("failed to load session from storage: {err}");
            None
        }
    }
}

/// Save a named session. Declared for forward compatibility.
pub fn save_session(storage: &mut dyn StorageArea, key: &str, session: &QaSession) {
    let raw = match serde_json::to_string(session) {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("failed to serialize session: {err}");
            return;
        }
    };
    if let Err(err) = storage.set(key, &raw) {
        log::error!("failed to save session: {err}");
    }
}

/// Produce an identifier unique enough for a single-user, single-tab
/// collection: millisecond epoch plus a short random suffix. Collisions
/// are accepted as negligible, not eliminated.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("{millis}-{suffix}")
}
