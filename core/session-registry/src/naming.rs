//! Window names and session directory paths.
//!
//! Names are derived from whatever the caller supplied (session name, explicit
//! window name, repository URL) and fall back to a timestamp. Directories get
//! a random suffix so two sessions with the same slug land in different places.
//!
//! ## Directory Layout
//!
//! ```text
//! (none)            /session--<suffix8>
//! session only      /<session-slug>--<suffix4>
//! repo only         /<repo-slug>--<suffix8>
//! repo + session    /<repo-slug>--<session-slug>--<suffix4>
//! ```
//!
//! The suffix avoids collisions; it is not a secret and is never checked
//! against existing sessions or directories.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::sanitize::sanitize;

/// Joins the components of a session directory name.
pub const DIR_DELIMITER: &str = "--";

/// Maximum length of a [`slugify`] result.
pub const SLUG_MAX_LEN: usize = 30;

const FALLBACK_PREFIX: &str = "session";
const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LONG_SUFFIX_LEN: usize = 8;
const SHORT_SUFFIX_LEN: usize = 4;

/// Treats empty strings the same as missing input.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Lowercases, turns spaces into dashes, drops anything outside `[a-z0-9-]`,
/// and truncates to [`SLUG_MAX_LEN`].
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(SLUG_MAX_LEN)
        .collect()
}

/// Final `/`-separated segment of a repository URL, minus a trailing `.git`.
///
/// Not sanitized: callers that accept URLs from untrusted sources sanitize
/// them before they get here.
pub fn repo_slug(repo_url: &str) -> &str {
    let segment = repo_url.rsplit('/').next().unwrap_or(repo_url);
    segment.strip_suffix(".git").unwrap_or(segment)
}

/// Picks the window name for a new session.
///
/// Priority: slugified `session_name` > `explicit_name` verbatim > sanitized
/// repo slug > `session-<epoch-ms>`. A candidate that comes out empty falls
/// through to the next one.
pub fn generate_window_name(
    repo_url: Option<&str>,
    explicit_name: Option<&str>,
    session_name: Option<&str>,
) -> String {
    generate_window_name_at(repo_url, explicit_name, session_name, Utc::now())
}

/// [`generate_window_name`] with the fallback clock supplied by the caller.
pub fn generate_window_name_at(
    repo_url: Option<&str>,
    explicit_name: Option<&str>,
    session_name: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    if let Some(slug) = present(session_name)
        .map(slugify)
        .filter(|slug| !slug.is_empty())
    {
        return slug;
    }

    if let Some(name) = present(explicit_name) {
        return name.to_string();
    }

    if let Some(name) = present(repo_url)
        .map(|url| sanitize(repo_slug(url), false))
        .filter(|name| !name.is_empty())
    {
        return name;
    }

    format!("{}-{}", FALLBACK_PREFIX, now.timestamp_millis())
}

/// Builds a fresh session directory path (see the module docs for layout).
pub fn generate_session_dir(repo_url: Option<&str>, session_name: Option<&str>) -> String {
    generate_session_dir_with_rng(repo_url, session_name, &mut rand::thread_rng())
}

/// [`generate_session_dir`] drawing its suffix from `rng`.
pub fn generate_session_dir_with_rng<R: Rng>(
    repo_url: Option<&str>,
    session_name: Option<&str>,
    rng: &mut R,
) -> String {
    let token = random_token(rng, LONG_SUFFIX_LEN);
    let long = token.as_str();
    let short = &token[..SHORT_SUFFIX_LEN];

    let repo = present(repo_url)
        .map(repo_slug)
        .filter(|slug| !slug.is_empty());
    let session = present(session_name)
        .map(slugify)
        .filter(|slug| !slug.is_empty());

    let parts: Vec<&str> = match (repo, session.as_deref()) {
        (None, None) => vec![FALLBACK_PREFIX, long],
        (None, Some(session)) => vec![session, short],
        (Some(repo), None) => vec![repo, long],
        (Some(repo), Some(session)) => vec![repo, session, short],
    };

    format!("/{}", parts.join(DIR_DELIMITER))
}

fn random_token<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
