//! Version tags
//!
//! Parses tags shaped like `v1`, `1.2` or `v1.2.3`, compares them numerically and renders
//! them in one canonical form. Tags that do not parse are compared as plain strings; that is
//! an expected case (branch names, `latest`, `next`), not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

static VERSION_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v?([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    /// The tag as written.
    pub tag: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a version tag. Missing minor and patch components default to 0.
    ///
    /// A component too large for `u64` makes the whole tag unparseable, so it is compared
    /// as a plain string like any other non-version tag.
    pub fn parse(tag: &str) -> Option<Version> {
        let caps = VERSION_TAG.captures(tag)?;
        let component = |index: usize| -> Option<u64> {
            match caps.get(index) {
                Some(digits) => digits.as_str().parse().ok(),
                None => Some(0),
            }
        };
        Some(Version {
            tag: tag.to_string(),
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
        })
    }

    /// Compare by major, then minor, then patch. The written tag plays no part.
    pub fn compare(&self, other: &Version) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compare two tags as versions, falling back to string order when either does not parse.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Some(left), Some(right)) => left.compare(&right),
        _ => a.cmp(b),
    }
}

/// Canonical `v{major}.{minor}.{patch}` form; tags that do not parse are returned unchanged.
pub fn format_tag(tag: &str) -> String {
    match Version::parse(tag) {
        Some(version) => version.to_string(),
        None => tag.to_string(),
    }
}

/// Order tags newest first.
///
/// Parsed versions come first, newest to oldest (ties broken by the written tag), followed by
/// the remaining tags in descending string order. Sorting on this split key keeps the order
/// total even though [compare_tags] mixes two orderings.
pub fn sort_tags_desc<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut versions: Vec<Version> = Vec::new();
    let mut others: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        match Version::parse(tag) {
            Some(version) => versions.push(version),
            None => others.push(tag.to_string()),
        }
    }
    versions.sort_by(|a, b| b.compare(a).then_with(|| b.tag.cmp(&a.tag)));
    others.sort_by(|a, b| b.cmp(a));

    versions
        .into_iter()
        .map(|version| version.tag)
        .chain(others)
        .collect()
}
