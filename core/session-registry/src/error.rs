//! Error types for session-registry operations.
//!
//! Only write-side failures surface here. A registry that cannot be read or
//! parsed is never an error: it loads as empty (see [`crate::registry::load`]).

use std::path::PathBuf;

/// All errors that can occur in session-registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Registry path has no parent directory: {0}")]
    NoParentDir(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Persistence Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Failed to serialize registry: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write registry: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace registry file: {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using RegistryError.
pub type Result<T> = std::result::Result<T, RegistryError>;
