//! Line classification for the block parser.

use super::tokens::{whole_line_tag, TagHeader};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").unwrap());
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:([-*+])|([0-9]+)[.)])[ \t]+(.*)$").unwrap());
static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( {0,3})(`{3,}|~{3,})[ \t]*([^`]*?)[ \t]*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Blank,
    FenceOpen {
        indent: usize,
        marker: &'a str,
        info: &'a str,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    /// A line holding exactly one tag.
    Tag(TagHeader),
    ListItem {
        ordered: bool,
        text: &'a str,
    },
    Text(&'a str),
}

pub fn classify_line(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(caps) = FENCE.captures(line) {
        let group = |i| caps.get(i).map_or("", |m| m.as_str());
        return Line::FenceOpen {
            indent: group(1).len(),
            marker: group(2),
            info: group(3),
        };
    }
    if let Some(caps) = HEADING.captures(line) {
        return Line::Heading {
            level: caps[1].len() as u8,
            text: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    if let Some(header) = whole_line_tag(line) {
        return Line::Tag(header);
    }
    if let Some(caps) = LIST_ITEM.captures(line) {
        return Line::ListItem {
            ordered: caps.get(2).is_some(),
            text: caps.get(3).map_or("", |m| m.as_str()),
        };
    }
    Line::Text(line)
}

/// Whether `line` closes a fence opened with `marker`: same character, at least as long,
/// nothing else on the line.
pub fn closes_fence(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    let Some(first) = marker.chars().next() else {
        return false;
    };
    trimmed.len() >= marker.len() && trimmed.chars().all(|c| c == first)
}

/// Remove up to `indent` leading spaces.
pub fn strip_indent(line: &str, indent: usize) -> &str {
    let spaces = line.bytes().take(indent).take_while(|b| *b == b' ').count();
    &line[spaces..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Line::Blank)]
    #[case("   \t", Line::Blank)]
    #[case("## Install", Line::Heading { level: 2, text: "Install" })]
    #[case("#", Line::Heading { level: 1, text: "" })]
    #[case("- one", Line::ListItem { ordered: false, text: "one" })]
    #[case("12. twelve", Line::ListItem { ordered: true, text: "twelve" })]
    #[case("#hashtag", Line::Text("#hashtag"))]
    #[case("plain words", Line::Text("plain words"))]
    #[case("-not a list", Line::Text("-not a list"))]
    fn test_classify(#[case] line: &str, #[case] expected: Line) {
        assert_eq!(classify_line(line), expected);
    }

    #[test]
    fn test_fence_open() {
        assert_eq!(
            classify_line("```rust"),
            Line::FenceOpen {
                indent: 0,
                marker: "```",
                info: "rust"
            }
        );
        assert_eq!(
            classify_line("  ~~~~"),
            Line::FenceOpen {
                indent: 2,
                marker: "~~~~",
                info: ""
            }
        );
    }

    #[test]
    fn test_tag_line() {
        assert!(matches!(classify_line("{% diff %}"), Line::Tag(TagHeader::Open { .. })));
        assert!(matches!(classify_line("{% /diff %}"), Line::Tag(TagHeader::Close { .. })));
    }

    #[test]
    fn test_closes_fence() {
        assert!(closes_fence("```", "```"));
        assert!(closes_fence("  ````  ", "```"));
        assert!(!closes_fence("``", "```"));
        assert!(!closes_fence("~~~", "```"));
        assert!(!closes_fence("``` js", "```"));
    }

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("    code", 2), "  code");
        assert_eq!(strip_indent(" x", 3), "x");
        assert_eq!(strip_indent("\tx", 2), "\tx");
    }
}
