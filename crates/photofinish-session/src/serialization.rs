//! Session persistence with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible
//! persistence. Timestamps serialize as RFC 3339 / ISO-8601 through
//! chrono; durations are plain seconds.

use photofinish_core::{PhotoFinishError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::session::SessionRecord;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned session file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version for migration.
    pub version: u32,
    /// The session data.
    pub session: SessionRecord,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl SessionFile {
    /// Wrap a session record for writing.
    pub fn new(session: SessionRecord) -> Self {
        Self {
            version: CURRENT_VERSION,
            session,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            PhotoFinishError::Serialization(format!("Failed to serialize session: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| PhotoFinishError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(PhotoFinishError::Serialization(format!(
                "Session file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| PhotoFinishError::Serialization(format!("Failed to parse session: {}", e)))
    }

    /// Save session to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load session from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare record without the version wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "session": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(PhotoFinishError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

/// Session file store bound to one race-type directory.
///
/// The directory comes from the configuration collaborator; one file per
/// race, named `<race name>.json` (sanitized).
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store over a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a race name: `<dir>/<sanitized name>.json`.
    pub fn session_path(&self, race_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_filename(race_name)))
    }

    /// Persist a session record.
    pub fn save(&self, session: &SessionRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        SessionFile::new(session.clone()).save_to_file(&self.session_path(&session.race_name))
    }

    /// Load a session record by race name.
    pub fn load(&self, race_name: &str) -> Result<SessionRecord> {
        Ok(SessionFile::load_from_file(&self.session_path(race_name))?.session)
    }

    /// Load a session, degrading gracefully: any read or parse failure
    /// yields a fresh default-roster record instead of an error.
    pub fn load_or_new(&self, race_name: &str) -> SessionRecord {
        match self.load(race_name) {
            Ok(session) => session,
            Err(e) => {
                warn!(race = race_name, error = %e, "no usable session file, starting fresh");
                SessionRecord::with_default_lanes(race_name)
            }
        }
    }
}

/// Replace filesystem-hostile characters so any race name maps to a
/// usable filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
