//! Reconciles the registry against the windows that actually exist.
//!
//! The registry records sessions that *should* exist. Windows die out of band
//! (manual kill, crash, reboot), so a periodic caller hands us the live window
//! names from the process manager and we drop every record not backed by one.
//!
//! Live names with no record are ignored, not adopted.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::Result;

use super::store::{load, save};
use super::types::Registry;

/// Removes records whose key is not in `live`, returning the removed keys in
/// registry order.
pub fn prune_stale(registry: &mut Registry, live: &HashSet<&str>) -> Vec<String> {
    let stale: Vec<String> = registry
        .sessions
        .keys()
        .filter(|name| !live.contains(name))
        .map(str::to_string)
        .collect();

    if !stale.is_empty() {
        registry.sessions.retain(|name, _| live.contains(name));
    }
    stale
}

/// Prunes registry entries with no live window and returns their names.
///
/// Writes only when something was pruned, so a steady-state reconcile leaves
/// the file (and its mtime) untouched.
pub fn reconcile<I, S>(path: &Path, live: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let live: Vec<S> = live.into_iter().collect();
    let live: HashSet<&str> = live.iter().map(AsRef::as_ref).collect();

    let mut registry = load(path);
    let pruned = prune_stale(&mut registry, &live);

    if !pruned.is_empty() {
        save(path, &registry)?;
        for name in &pruned {
            info!(window = %name, "Pruned session with no live window");
        }
    }

    Ok(pruned)
}
