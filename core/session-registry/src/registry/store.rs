//! File-backed session registry persistence.
//!
//! Every public operation loads the whole document, mutates it, and saves it.
//! Nothing is cached between calls, so a caller never sees state another
//! caller has already replaced on disk.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "sessions": {
//!     "my-repo": {
//!       "dir": "/my-repo--a1b2c3d4",
//!       "repo": "github.com/user/my-repo",
//!       "window_name": "my-repo",
//!       "created_at": "2026-01-01T00:00:00Z"
//!     }
//!   }
//! }
//! ```
//!
//! # Defensive Loading
//!
//! The registry is an optimistic record and is always recoverable by reset.
//! Each of these loads as an empty registry, never partially adopted:
//! - Missing file
//! - Unreadable file, empty file, or invalid JSON
//! - `version` other than [`REGISTRY_VERSION`]
//! - `sessions` that is not an object, or a record missing required fields
//!
//! # Atomic Writes
//!
//! Uses a sibling temp file + rename so readers see either the complete prior
//! document or the complete new one. The temp file is removed on any failure.

use std::io::{self, Write};
use std::path::Path;

use chrono::{SubsecRound, Utc};
use fs_err as fs;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};

use super::types::{Registry, SessionMap, SessionRecord, REGISTRY_VERSION};

const TEMP_FILE_PREFIX: &str = ".sessions.tmp.";

/// How [`load_with_status`] arrived at the registry it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The document on disk was valid and adopted.
    Loaded,
    /// No document existed yet.
    Fresh,
    /// A document existed but was discarded.
    Recovered(RecoveryReason),
}

/// Why an existing registry document was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryReason {
    Unreadable(String),
    InvalidJson(String),
    /// `None` when `version` is absent or not an unsigned integer.
    UnsupportedVersion(Option<u64>),
    InvalidShape(String),
}

impl std::fmt::Display for RecoveryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoveryReason::Unreadable(details) => write!(f, "unreadable: {}", details),
            RecoveryReason::InvalidJson(details) => write!(f, "invalid JSON: {}", details),
            RecoveryReason::UnsupportedVersion(Some(version)) => write!(
                f,
                "unsupported version {} (expected {})",
                version, REGISTRY_VERSION
            ),
            RecoveryReason::UnsupportedVersion(None) => write!(f, "missing or invalid version"),
            RecoveryReason::InvalidShape(details) => write!(f, "invalid shape: {}", details),
        }
    }
}

/// Loads the registry, returning an empty one for any missing or malformed
/// document. Never fails.
pub fn load(path: &Path) -> Registry {
    load_with_status(path).0
}

/// Like [`load`], but also reports whether the document was adopted, absent,
/// or discarded.
pub fn load_with_status(path: &Path) -> (Registry, LoadStatus) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No session registry yet, starting fresh");
            return (Registry::default(), LoadStatus::Fresh);
        }
        Err(err) => return recovered(path, RecoveryReason::Unreadable(err.to_string())),
    };

    match parse(&content) {
        Ok(registry) => (registry, LoadStatus::Loaded),
        Err(reason) => recovered(path, reason),
    }
}

fn recovered(path: &Path, reason: RecoveryReason) -> (Registry, LoadStatus) {
    warn!(
        path = %path.display(),
        reason = %reason,
        "Discarding session registry, starting empty"
    );
    (Registry::default(), LoadStatus::Recovered(reason))
}

fn parse(content: &str) -> std::result::Result<Registry, RecoveryReason> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| RecoveryReason::InvalidJson(e.to_string()))?;

    let Some(document) = value.as_object() else {
        return Err(RecoveryReason::InvalidShape(
            "document is not an object".to_string(),
        ));
    };

    match document.get("version").and_then(Value::as_u64) {
        Some(version) if version == u64::from(REGISTRY_VERSION) => {}
        found => return Err(RecoveryReason::UnsupportedVersion(found)),
    }

    if !document.get("sessions").is_some_and(Value::is_object) {
        return Err(RecoveryReason::InvalidShape(
            "sessions is not an object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| RecoveryReason::InvalidShape(e.to_string()))
}

/// Atomically writes the registry to `path`.
///
/// The parent directory must already exist; see
/// [`StorageConfig::ensure_root`](crate::storage::StorageConfig::ensure_root).
pub fn save(path: &Path, registry: &Registry) -> Result<()> {
    let mut content = serde_json::to_string_pretty(registry)
        .map_err(|source| RegistryError::Serialize { source })?;
    content.push('\n');

    let parent_dir = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(RegistryError::NoParentDir(path.to_path_buf())),
    };

    let write_err = |source: io::Error| RegistryError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Dropping the temp file on any early return deletes it.
    let mut temp_file = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(parent_dir)
        .map_err(write_err)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|e| RegistryError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    debug!(
        path = %path.display(),
        sessions = registry.sessions.len(),
        "Saved session registry"
    );
    Ok(())
}

/// Records a session, fully replacing any record already stored under `name`.
pub fn add_session(
    path: &Path,
    name: &str,
    dir: &str,
    repo: Option<&str>,
) -> Result<SessionRecord> {
    let mut registry = load(path);
    let record = SessionRecord {
        dir: dir.to_string(),
        repo: repo.unwrap_or_default().to_string(),
        window_name: name.to_string(),
        created_at: Utc::now().trunc_subsecs(3),
    };
    registry.sessions.insert(name.to_string(), record.clone());
    save(path, &registry)?;
    Ok(record)
}

/// Forgets a session. Absent names are not an error; the registry is saved
/// either way. Returns whether a record was removed.
pub fn remove_session(path: &Path, name: &str) -> Result<bool> {
    let mut registry = load(path);
    let removed = registry.sessions.remove(name).is_some();
    save(path, &registry)?;
    Ok(removed)
}

/// Returns every session from a fresh load.
pub fn get_all_sessions(path: &Path) -> SessionMap {
    load(path).sessions
}

/// Returns one session from a fresh load.
pub fn get_session(path: &Path, name: &str) -> Option<SessionRecord> {
    load(path).sessions.remove(name)
}
