//! Durable session registry.
//!
//! Maps window name → [`SessionRecord`] in a single JSON document. The
//! registry is an optimistic record of sessions that should exist;
//! [`reconcile`] brings it back in line with the windows that actually do.
//!
//! ```text
//! create workflow ──add_session──┐
//! teardown        ──remove_session─┼──► sessions.json (atomic replace)
//! periodic task   ──reconcile─────┘
//! ```
//!
//! # Concurrency
//!
//! Each operation is an unguarded load → mutate → save. Atomic replace keeps
//! readers from ever seeing a torn document, but two racing writers both load
//! the same state and the later save wins in full. Route concurrent churn
//! through one owner.
//!
//! # Module Structure
//!
//! - [`store`]: load/save and the add/remove/get operations
//! - `reconcile`: pruning against a live window set
//! - `types`: the on-disk document and its ordered session map

mod reconcile;
pub mod store;
mod types;

pub use reconcile::{prune_stale, reconcile};
pub use store::{
    add_session, get_all_sessions, get_session, load, load_with_status, remove_session, save,
    LoadStatus, RecoveryReason,
};
pub use types::{Registry, SessionMap, SessionRecord, REGISTRY_VERSION};
