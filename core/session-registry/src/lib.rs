//! # session-registry
//!
//! Bookkeeping core for ephemeral development sessions. Each session pairs a
//! working directory with a named window managed by an external process
//! manager (tmux), optionally backed by a cloned repository.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Every operation is one file
//!   read and/or one file write.
//! - **Not thread-safe**: No internal locking. Callers that churn sessions
//!   concurrently serialize access to the registry path themselves.
//! - **Graceful degradation**: A missing or corrupt registry loads as empty.
//! - **Explicit paths**: The registry path is threaded through every call;
//!   there is no process-wide registry state.
//! - **No side effects on the outside world**: This crate produces identifiers
//!   and persists records. It never spawns or inspects external processes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use session_registry::{add_session, generate_session_dir, generate_window_name, reconcile};
//!
//! let name = generate_window_name(Some("github.com/u/repo.git"), None, None);
//! let dir = generate_session_dir(Some("github.com/u/repo.git"), None);
//! add_session(&path, &name, &dir, Some("github.com/u/repo.git"))?;
//!
//! let pruned = reconcile(&path, ["main", name.as_str()])?;
//! ```

pub mod error;
pub mod naming;
pub mod plan;
pub mod registry;
pub mod sanitize;
pub mod storage;

pub use error::{RegistryError, Result};
pub use naming::{
    generate_session_dir, generate_session_dir_with_rng, generate_window_name,
    generate_window_name_at, repo_slug, slugify,
};
pub use plan::{build_prompt, SessionPlan, SessionRequest};
pub use registry::{
    add_session, get_all_sessions, get_session, load, load_with_status, prune_stale, reconcile,
    remove_session, save, LoadStatus, RecoveryReason, Registry, SessionMap, SessionRecord,
    REGISTRY_VERSION,
};
pub use sanitize::sanitize;
pub use storage::StorageConfig;
