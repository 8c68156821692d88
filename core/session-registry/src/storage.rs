//! Storage configuration and path management.
//!
//! Centralizes where the registry lives so callers resolve the path once and
//! then thread it explicitly through every registry call.
//!
//! ## Resolution Order
//!
//! 1. `SESSION_REGISTRY_HOME` environment variable
//! 2. `~/.session-registry`
//!
//! Tests use [`StorageConfig::with_root`] to point at a temp directory.

use std::env;
use std::path::{Path, PathBuf};

use fs_err as fs;

use crate::error::{RegistryError, Result};

/// Environment variable overriding the storage root.
pub const HOME_ENV_VAR: &str = "SESSION_REGISTRY_HOME";

const DEFAULT_DIR_NAME: &str = ".session-registry";
const REGISTRY_FILE_NAME: &str = "sessions.json";

/// Central configuration for session-registry storage paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Root directory for registry data (default: ~/.session-registry)
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the storage root from the environment, falling back to the
    /// home directory.
    pub fn discover() -> Result<Self> {
        if let Some(root) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return Ok(Self {
                root: PathBuf::from(root),
            });
        }
        let home = dirs::home_dir().ok_or(RegistryError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(DEFAULT_DIR_NAME),
        })
    }

    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to sessions.json (the session registry document).
    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE_NAME)
    }

    /// Creates the root directory if needed. Saving into a missing directory
    /// is a write failure, so first-run callers invoke this before saving.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| RegistryError::Write {
            path: self.root.clone(),
            source,
        })
    }
}
