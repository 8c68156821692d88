//! Session creation planning.
//!
//! Turns a raw spawn request into everything the launcher needs: a window
//! name, a session directory, and the initial prompt. Planning is side-effect
//! free; [`SessionPlan::register`] is the only step that touches disk, and it
//! runs before the caller asks the process manager to create the window.
//!
//! ```text
//! SessionRequest ──sanitized()──► SessionRequest ──allocate()──► SessionPlan ──register()──► registry
//! ```

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::naming::{generate_session_dir, generate_window_name};
use crate::registry::{add_session, SessionRecord};
use crate::sanitize::sanitize;

/// Caller-supplied inputs for a new session. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRequest {
    /// Repository to clone, e.g. `github.com/user/repo`.
    pub repo: Option<String>,
    pub window_name: Option<String>,
    /// Human-readable name, slugified into the window name and directory.
    pub session_name: Option<String>,
    /// Task for the session. Natural language, never sanitized.
    pub instruction: Option<String>,
}

impl SessionRequest {
    /// Runs every identifier-bearing field through the sanitizer.
    ///
    /// `repo` keeps `/` and `@`. `instruction` is left as written; it reaches
    /// the launcher only as a single argv element.
    pub fn sanitized(&self) -> Self {
        let clean = |value: &Option<String>, extended: bool| {
            value
                .as_deref()
                .map(|v| sanitize(v, extended))
                .filter(|v| !v.is_empty())
        };
        SessionRequest {
            repo: clean(&self.repo, true),
            window_name: clean(&self.window_name, false),
            session_name: clean(&self.session_name, false),
            instruction: self.instruction.clone(),
        }
    }
}

/// Identifiers and prompt for one session, ready to persist and launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPlan {
    pub window_name: String,
    pub dir: String,
    /// Empty when the session has no repository.
    pub repo: String,
    pub prompt: String,
}

impl SessionPlan {
    /// Allocates a window name and directory for `request`.
    ///
    /// Does not sanitize; pass [`SessionRequest::sanitized`] for untrusted
    /// input.
    pub fn allocate(request: &SessionRequest) -> Self {
        let repo = request.repo.as_deref().filter(|r| !r.is_empty());
        let session_name = request.session_name.as_deref();

        SessionPlan {
            window_name: generate_window_name(repo, request.window_name.as_deref(), session_name),
            dir: generate_session_dir(repo, session_name),
            repo: repo.unwrap_or_default().to_string(),
            prompt: build_prompt(repo, request.instruction.as_deref()),
        }
    }

    /// Records the planned session in the registry at `registry_path`.
    pub fn register(&self, registry_path: &Path) -> Result<SessionRecord> {
        let repo = Some(self.repo.as_str()).filter(|r| !r.is_empty());
        add_session(registry_path, &self.window_name, &self.dir, repo)
    }
}

/// Builds the launcher's opening prompt.
///
/// With a repo the session clones it into its directory and restarts itself
/// to pick up project settings before doing anything else.
pub fn build_prompt(repo: Option<&str>, instruction: Option<&str>) -> String {
    let repo = repo.filter(|r| !r.is_empty());
    let instruction = instruction.filter(|i| !i.is_empty());

    match (repo, instruction) {
        (Some(repo), Some(instruction)) => format!(
            "Clone {repo} into current directory with 'git clone {repo} .', then call restart_self to pick up settings, then {instruction}"
        ),
        (Some(repo), None) => format!(
            "Clone {repo} into current directory with 'git clone {repo} .', then call restart_self to pick up CLAUDE.md and settings"
        ),
        (None, Some(instruction)) => instruction.to_string(),
        (None, None) => String::new(),
    }
}
