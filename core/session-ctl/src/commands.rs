//! Subcommand implementations.
//!
//! Each command takes the registry path explicitly and writes its output to a
//! caller-supplied writer, so tests drive them without touching stdout.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use session_registry::{
    add_session, get_all_sessions, get_session, reconcile, remove_session, RegistryError,
    SessionPlan, SessionRequest, StorageConfig,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CtlError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

pub type CtlResult<T> = Result<T, CtlError>;

/// Uses `--registry` when given, otherwise the default storage location
/// (created on first use).
pub fn resolve_registry_path(flag: Option<PathBuf>) -> CtlResult<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let config = StorageConfig::discover()?;
    config.ensure_root()?;
    Ok(config.registry_file())
}

pub fn add(
    path: &Path,
    name: &str,
    dir: &str,
    repo: Option<&str>,
    out: &mut impl Write,
) -> CtlResult<()> {
    let record = add_session(path, name, dir, repo)?;
    tracing::debug!(window = %name, dir = %dir, "Recorded session");
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

pub fn remove(path: &Path, name: &str, out: &mut impl Write) -> CtlResult<()> {
    if remove_session(path, name)? {
        writeln!(out, "Removed {}", name)?;
    } else {
        writeln!(out, "No session named {}", name)?;
    }
    Ok(())
}

pub fn list(path: &Path, json: bool, out: &mut impl Write) -> CtlResult<()> {
    let sessions = get_all_sessions(path);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&sessions)?)?;
        return Ok(());
    }

    if sessions.is_empty() {
        writeln!(out, "No sessions")?;
        return Ok(());
    }
    for (name, record) in sessions.iter() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            name,
            record.dir,
            record.repo,
            record.created_at.to_rfc3339()
        )?;
    }
    Ok(())
}

pub fn get(path: &Path, name: &str, out: &mut impl Write) -> CtlResult<()> {
    let record =
        get_session(path, name).ok_or_else(|| CtlError::SessionNotFound(name.to_string()))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

/// Prunes sessions whose window is not in `live` (plus any names read from
/// `stdin`, one per line) and prints each pruned name.
///
/// Stdin lines are taken verbatim apart from the line terminator; window
/// names may carry leading or trailing spaces.
pub fn reconcile_live(
    path: &Path,
    mut live: Vec<String>,
    stdin: Option<&mut dyn BufRead>,
    out: &mut impl Write,
) -> CtlResult<()> {
    if let Some(reader) = stdin {
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                live.push(line);
            }
        }
    }

    let pruned = reconcile(path, &live)?;
    for name in &pruned {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

/// Sanitizes the request, allocates identifiers, records the session when a
/// registry is given, and prints the plan as JSON.
pub fn allocate(
    registry: Option<&Path>,
    request: &SessionRequest,
    out: &mut impl Write,
) -> CtlResult<()> {
    let plan = SessionPlan::allocate(&request.sanitized());
    if let Some(path) = registry {
        plan.register(path)?;
        tracing::info!(window = %plan.window_name, dir = %plan.dir, "Registered planned session");
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_add_then_list_text() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");

        add(
            &path,
            "repo",
            "/repo--abcd1234",
            Some("github.com/u/repo"),
            &mut Vec::new(),
        )
        .unwrap();
        let mut out = Vec::new();
        list(&path, false, &mut out).unwrap();

        let text = output(out);
        assert!(text.starts_with("repo\t/repo--abcd1234\tgithub.com/u/repo\t"));
    }

    #[test]
    fn test_list_empty() {
        let temp = tempdir().unwrap();
        let mut out = Vec::new();
        list(&temp.path().join("sessions.json"), false, &mut out).unwrap();
        assert_eq!(output(out), "No sessions\n");
    }

    #[test]
    fn test_list_json_is_keyed_by_window_name() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");
        add(&path, "a", "/a--1", None, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        list(&path, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["a"]["dir"], "/a--1");
        assert_eq!(value["a"]["repo"], "");
    }

    #[test]
    fn test_get_missing_session_errors() {
        let temp = tempdir().unwrap();
        let err = get(&temp.path().join("sessions.json"), "nope", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CtlError::SessionNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_remove_reports_outcome() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");
        add(&path, "a", "/a--1", None, &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        remove(&path, "a", &mut out).unwrap();
        remove(&path, "a", &mut out).unwrap();

        assert_eq!(output(out), "Removed a\nNo session named a\n");
    }

    #[test]
    fn test_reconcile_merges_args_and_stdin() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");
        for name in ["from-args", "from-stdin", "dead"] {
            add(&path, name, "/d", None, &mut Vec::new()).unwrap();
        }

        let mut stdin = Cursor::new("main\nfrom-stdin\n\n");
        let mut out = Vec::new();
        reconcile_live(
            &path,
            vec!["from-args".to_string()],
            Some(&mut stdin as &mut dyn BufRead),
            &mut out,
        )
        .unwrap();

        assert_eq!(output(out), "dead\n");
        assert_eq!(
            get_all_sessions(&path).keys().collect::<Vec<_>>(),
            vec!["from-args", "from-stdin"]
        );
    }

    #[test]
    fn test_allocate_sanitizes_and_registers() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");
        let request = SessionRequest {
            repo: Some("github.com/user/repo;reboot".to_string()),
            ..SessionRequest::default()
        };

        let mut out = Vec::new();
        allocate(Some(&path), &request, &mut out).unwrap();

        let plan: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(plan["window_name"], "reporeboot");
        assert_eq!(plan["repo"], "github.com/user/reporeboot");
        let record = get_session(&path, "reporeboot").unwrap();
        assert_eq!(record.dir, plan["dir"].as_str().unwrap());
    }

    #[test]
    fn test_allocate_without_registry_only_prints_plan() {
        let mut out = Vec::new();
        allocate(None, &SessionRequest::default(), &mut out).unwrap();

        let plan: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(plan["window_name"]
            .as_str()
            .unwrap()
            .starts_with("session-"));
    }

    #[test]
    fn test_reconcile_stdin_keeps_padded_window_names() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sessions.json");
        let request = SessionRequest {
            window_name: Some(" dev ".to_string()),
            ..SessionRequest::default()
        };
        allocate(Some(&path), &request, &mut Vec::new()).unwrap();
        assert_eq!(
            get_all_sessions(&path).keys().collect::<Vec<_>>(),
            vec![" dev "]
        );

        let mut stdin = Cursor::new(" dev \r\n");
        let mut out = Vec::new();
        reconcile_live(&path, Vec::new(), Some(&mut stdin as &mut dyn BufRead), &mut out).unwrap();

        assert_eq!(output(out), "");
        assert!(get_session(&path, " dev ").is_some());
    }

    #[test]
    fn test_resolve_registry_path_prefers_flag() {
        let path = PathBuf::from("/tmp/explicit/sessions.json");
        assert_eq!(resolve_registry_path(Some(path.clone())).unwrap(), path);
    }
}
