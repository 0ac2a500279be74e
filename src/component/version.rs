//! Semantic version ordering for component deduplication.
//!
//! Component manifests in the wild carry loose version strings (`v1.2.3`,
//! `1.2`, `=2.0.0`). They are normalized before parsing so that ordinary
//! releases still compare; anything else is treated as unversioned.

use semver::{Version, VersionReq};

/// Parse a manifest version leniently.
///
/// - `"1.2.3"` -> `1.2.3`
/// - `"v1.2.3"` / `"=1.2.3"` -> `1.2.3`
/// - `"1.2"` -> `1.2.0`
/// - `"latest"` -> `None`
pub fn parse_version(raw: &str) -> Option<Version> {
    let s = raw.trim().trim_start_matches('=').trim_start_matches('v');

    if let Ok(v) = Version::parse(s) {
        return Some(v);
    }

    // major.minor shorthand
    Version::parse(&format!("{s}.0")).ok()
}

/// Returns `true` if `candidate` should replace `current`.
///
/// A parseable candidate supersedes an unparseable one; otherwise the
/// candidate must be strictly greater. Equal versions keep `current`.
pub fn supersedes(candidate: Option<&str>, current: Option<&str>) -> bool {
    let Some(candidate) = candidate.and_then(parse_version) else {
        return false;
    };
    match current.and_then(parse_version) {
        Some(current) => candidate > current,
        None => true,
    }
}

/// Check whether `version` satisfies a bower-style range.
///
/// Ranges that cannot be parsed (git urls, tags, `*`-like words) yield `None`
/// so that callers do not report false mismatches.
pub fn satisfies(version: &str, range: &str) -> Option<bool> {
    let version = parse_version(version)?;
    // bower separates comparators with spaces, semver expects commas
    let normalized = range.split_whitespace().collect::<Vec<_>>().join(", ");
    let req = VersionReq::parse(&normalized).ok()?;
    Some(req.matches(&version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_plain() {
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_parse_version_prefixed() {
        assert_eq!(parse_version("v2.0.1"), Some(Version::new(2, 0, 1)));
        assert_eq!(parse_version("=0.9.0"), Some(Version::new(0, 9, 0)));
    }

    #[test]
    fn test_parse_version_shorthand() {
        assert_eq!(parse_version("1.4"), Some(Version::new(1, 4, 0)));
    }

    #[test]
    fn test_parse_version_invalid() {
        assert_eq!(parse_version("latest"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_supersedes_strictly_greater() {
        assert!(supersedes(Some("1.3.0"), Some("1.2.9")));
        assert!(!supersedes(Some("1.2.9"), Some("1.3.0")));
        assert!(!supersedes(Some("1.2.0"), Some("1.2.0")));
    }

    #[test]
    fn test_supersedes_prerelease_ordering() {
        assert!(supersedes(Some("2.0.0"), Some("2.0.0-rc.1")));
        assert!(!supersedes(Some("2.0.0-rc.1"), Some("2.0.0")));
    }

    #[test]
    fn test_supersedes_unparseable() {
        // parseable beats unparseable
        assert!(supersedes(Some("0.1.0"), None));
        assert!(supersedes(Some("0.1.0"), Some("master")));
        // unparseable never replaces
        assert!(!supersedes(None, Some("1.0.0")));
        assert!(!supersedes(Some("master"), None));
    }

    #[test]
    fn test_satisfies() {
        assert_eq!(satisfies("1.2.3", "~1.2.0"), Some(true));
        assert_eq!(satisfies("1.3.0", "~1.2.0"), Some(false));
        assert_eq!(satisfies("1.5.0", ">=1.0.0 <2.0.0"), Some(true));
        assert_eq!(satisfies("1.5.0", "git://example.com/lib.git"), None);
    }
}
