//! Version string sanitizing for archive names.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of whitespace and parentheses, each replaced by a single `_`.
static UNSAFE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s()]+").expect("valid regex"));

/// Sanitize a version string for use in an archive file name.
///
/// Each run of whitespace/parenthesis characters becomes one underscore;
/// leading and trailing underscores are trimmed so `"1.0.0 (beta)"` maps
/// to `1.0.0_beta`.
pub fn sanitize_version(version: &str) -> String {
    UNSAFE_RUNS
        .replace_all(version, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_version() {
        assert_eq!(sanitize_version("2.4.1"), "2.4.1");
    }

    #[test]
    fn test_sanitize_prerelease_version() {
        assert_eq!(sanitize_version("1.0.0 (beta)"), "1.0.0_beta");
    }

    #[test]
    fn test_sanitize_inner_runs() {
        assert_eq!(sanitize_version("2.0 (rc 1)"), "2.0_rc_1");
    }
}
