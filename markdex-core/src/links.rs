//! Link extraction and the backlink index
//!
//!     Pages refer to each other in two ways: markdown links `[text](/target)` and diagram
//!     click directives `click NodeId "/target"`. This module pulls both out of raw page
//!     source and inverts them into an index from target route to the pages pointing at it.
//!
//! Normalization
//!
//!     Every href is normalized before it is stored or looked up, so equivalent spellings of a
//!     route share one bucket: the `#fragment` is dropped, then a trailing `.md`, then a
//!     trailing `/`. `/docs/page.md`, `/docs/page/` and `/docs/page#setup` all land on
//!     `/docs/page`. The root `/` is kept as is.
//!
//! Ordering
//!
//!     Buckets keep insertion order: pages in the order they were given, and within a page
//!     markdown links first, then diagram links, each in order of appearance.

use crate::page::Page;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[[^\]]*\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap());

static DIAGRAM_CLICK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"click\s+\S+\s+(?:href\s+)?"([^"]+)""#).unwrap());

/// Which href prefixes count as internal links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRules {
    pub markdown_prefixes: Vec<String>,
    pub diagram_prefixes: Vec<String>,
}

impl Default for LinkRules {
    fn default() -> Self {
        LinkRules {
            markdown_prefixes: vec!["/".into(), "./".into(), "../".into()],
            diagram_prefixes: vec!["/".into()],
        }
    }
}

impl LinkRules {
    fn accepts_markdown(&self, href: &str) -> bool {
        has_prefix(&self.markdown_prefixes, href)
    }

    fn accepts_diagram(&self, href: &str) -> bool {
        has_prefix(&self.diagram_prefixes, href)
    }
}

fn has_prefix(prefixes: &[String], href: &str) -> bool {
    prefixes.iter().any(|prefix| href.starts_with(prefix.as_str()))
}

/// Internal links found in one page, as written (not normalized).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedLinks {
    pub markdown_links: Vec<String>,
    pub diagram_links: Vec<String>,
}

/// Extract internal links using the default prefix rules.
pub fn extract_links(content: &str) -> ExtractedLinks {
    extract_links_with(content, &LinkRules::default())
}

pub fn extract_links_with(content: &str, rules: &LinkRules) -> ExtractedLinks {
    let markdown_links = MARKDOWN_LINK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|href| href.as_str())
        .filter(|href| rules.accepts_markdown(href))
        .map(str::to_string)
        .collect();
    let diagram_links = DIAGRAM_CLICK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|href| href.as_str())
        .filter(|href| rules.accepts_diagram(href))
        .map(str::to_string)
        .collect();

    ExtractedLinks {
        markdown_links,
        diagram_links,
    }
}

/// Collapse equivalent spellings of a route, see the module docs.
pub fn normalize_link_path(href: &str) -> String {
    let path = match href.find('#') {
        Some(hash) => &href[..hash],
        None => href,
    };
    let path = path.strip_suffix(".md").unwrap_or(path);
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };
    path.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Markdown,
    Diagram,
}

/// One page pointing at a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backlink {
    pub source_path: String,
    pub source_title: String,
    pub link_type: LinkType,
}

/// Normalized target route → pages linking to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BacklinkIndex {
    entries: BTreeMap<String, Vec<Backlink>>,
}

impl BacklinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index over `pages` with the default link rules.
    pub fn build(pages: &[Page]) -> Self {
        Self::build_with(pages, &LinkRules::default())
    }

    pub fn build_with(pages: &[Page], rules: &LinkRules) -> Self {
        let mut index = Self::new();
        for page in pages {
            index.add_page(page, rules);
        }
        tracing::debug!(
            pages = pages.len(),
            targets = index.len(),
            "built backlink index"
        );
        index
    }

    /// Index the links of one page.
    pub fn add_page(&mut self, page: &Page, rules: &LinkRules) {
        let links = extract_links_with(&page.content, rules);
        let markdown = links
            .markdown_links
            .iter()
            .map(|href| (href, LinkType::Markdown));
        let diagram = links
            .diagram_links
            .iter()
            .map(|href| (href, LinkType::Diagram));

        for (href, link_type) in markdown.chain(diagram) {
            self.entries
                .entry(normalize_link_path(href))
                .or_default()
                .push(Backlink {
                    source_path: page.path.clone(),
                    source_title: page.title.clone(),
                    link_type,
                });
        }
    }

    /// Append every bucket of `other` after the existing entries.
    ///
    /// Indices built per page and merged in page order equal the index built in one pass.
    pub fn merge(&mut self, other: BacklinkIndex) {
        for (target, backlinks) in other.entries {
            self.entries.entry(target).or_default().extend(backlinks);
        }
    }

    /// Pages linking to `path`. The path is normalized first; unknown targets yield `[]`.
    pub fn get(&self, path: &str) -> &[Backlink] {
        self.entries
            .get(&normalize_link_path(path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Targets in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/docs/page.md", "/docs/page")]
    #[case("/docs/page/", "/docs/page")]
    #[case("/docs/page#section", "/docs/page")]
    #[case("/docs/page.md#section", "/docs/page")]
    #[case("/docs/page/#section", "/docs/page")]
    #[case("/docs/page", "/docs/page")]
    #[case("./sibling.md", "./sibling")]
    #[case("/", "/")]
    #[case("#top", "")]
    fn test_normalize_link_path(#[case] href: &str, #[case] expected: &str) {
        assert_eq!(normalize_link_path(href), expected);
    }

    #[test]
    fn test_extracts_internal_markdown_links() {
        let content = "See [intro](/guide/intro), [sib](./sib.md), [up](../up/) \
                       and [ext](https://example.com) or [anchor](#local).";
        let links = extract_links(content);
        assert_eq!(
            links.markdown_links,
            vec!["/guide/intro", "./sib.md", "../up/"]
        );
        assert!(links.diagram_links.is_empty());
    }

    #[test]
    fn test_markdown_link_with_title() {
        let links = extract_links(r#"[api](/reference/api "API reference")"#);
        assert_eq!(links.markdown_links, vec!["/reference/api"]);
    }

    #[test]
    fn test_extracts_diagram_clicks() {
        let content = "```mermaid\nflowchart LR\n  A --> B\n  click A \"/guide/intro\"\n  \
                       click B href \"/reference/api#auth\"\n  click C \"https://example.com\"\n```\n";
        let links = extract_links(content);
        assert_eq!(
            links.diagram_links,
            vec!["/guide/intro", "/reference/api#auth"]
        );
    }

    #[test]
    fn test_diagram_links_require_absolute_paths() {
        let links = extract_links("click A \"./relative\"");
        assert!(links.diagram_links.is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let rules = LinkRules {
            markdown_prefixes: vec!["/".into()],
            diagram_prefixes: vec!["/".into(), "./".into()],
        };
        let links = extract_links_with("[a](./a) [b](/b)\nclick X \"./x\"", &rules);
        assert_eq!(links.markdown_links, vec!["/b"]);
        assert_eq!(links.diagram_links, vec!["./x"]);
    }

    #[test]
    fn test_equivalent_links_share_one_bucket() {
        let pages = vec![
            Page::new("/a", "A", "[p](/docs/page.md)"),
            Page::new("/b", "B", "[p](/docs/page/)"),
            Page::new("/c", "C", "[p](/docs/page#section)"),
        ];
        let index = BacklinkIndex::build(&pages);

        assert_eq!(index.len(), 1);
        assert_eq!(index.targets().collect::<Vec<_>>(), vec!["/docs/page"]);
        let sources: Vec<&str> = index
            .get("/docs/page")
            .iter()
            .map(|link| link.source_path.as_str())
            .collect();
        assert_eq!(sources, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_bucket_order_follows_pages_then_occurrence() {
        let pages = vec![
            Page::new(
                "/one",
                "One",
                "click N \"/t\"\n[first](/t) [second](/t#x)",
            ),
            Page::new("/two", "Two", "[again](/t.md)"),
        ];
        let index = BacklinkIndex::build(&pages);
        let bucket: Vec<(&str, LinkType)> = index
            .get("/t")
            .iter()
            .map(|link| (link.source_path.as_str(), link.link_type))
            .collect();

        assert_eq!(
            bucket,
            vec![
                ("/one", LinkType::Markdown),
                ("/one", LinkType::Markdown),
                ("/one", LinkType::Diagram),
                ("/two", LinkType::Markdown),
            ]
        );
    }

    #[test]
    fn test_lookup_normalizes_and_never_fails() {
        let index = BacklinkIndex::build(&[Page::new("/a", "A", "[x](/target)")]);
        assert_eq!(index.get("/target.md").len(), 1);
        assert_eq!(index.get("/target/#frag").len(), 1);
        assert!(index.get("/missing").is_empty());
        assert!(BacklinkIndex::new().get("/anything").is_empty());
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let pages = vec![
            Page::new("/a", "A", "[x](/t) [y](/u)"),
            Page::new("/b", "B", "[x](/t/)"),
        ];
        let rules = LinkRules::default();
        let mut merged = BacklinkIndex::new();
        for page in &pages {
            let mut single = BacklinkIndex::new();
            single.add_page(page, &rules);
            merged.merge(single);
        }
        assert_eq!(merged, BacklinkIndex::build(&pages));
    }

    #[test]
    fn test_serialized_shape() {
        let index = BacklinkIndex::build(&[Page::new("/a", "Alpha", "[x](/t)")]);
        assert_eq!(
            serde_json::to_value(&index).unwrap(),
            serde_json::json!({
                "/t": [{"sourcePath": "/a", "sourceTitle": "Alpha", "linkType": "markdown"}]
            })
        );
    }
}
