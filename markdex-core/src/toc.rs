//! Page outline collection
//!
//! Walks a rendered tree depth-first, pre-order, and lists its headings. Decision records
//! appear as a single level-3 entry each; their bodies are not searched, so headings inside a
//! record never reach the page outline.

use crate::ast::{Element, RenderNode};
use crate::schema::names;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Level given to decision records in the outline.
pub const DECISION_RECORD_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub level: u8,
    pub title: String,
}

/// Collect the outline of a rendered document, in document order.
pub fn collect_headings(root: &RenderNode) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    walk(root, &mut entries);
    entries
}

fn walk(node: &RenderNode, entries: &mut Vec<TocEntry>) {
    match node {
        RenderNode::Text(_) => {}
        RenderNode::Fragment(children) => {
            for child in children {
                walk(child, entries);
            }
        }
        RenderNode::Element(element) if element.name == names::DECISION_RECORD => {
            entries.push(decision_record_entry(element));
        }
        RenderNode::Element(element) => {
            if element.name == names::HEADING {
                if let Some(entry) = heading_entry(element) {
                    entries.push(entry);
                }
            }
            for child in &element.children {
                walk(child, entries);
            }
        }
    }
}

/// A heading counts only when its first child is plain text.
fn heading_entry(element: &Element) -> Option<TocEntry> {
    let title = match element.children.first() {
        Some(RenderNode::Text(title)) => title.clone(),
        _ => return None,
    };
    let level = element
        .attributes
        .get("level")
        .and_then(serde_json::Value::as_u64)
        .map(|level| level.min(u64::from(u8::MAX)) as u8)
        .unwrap_or(1);
    Some(TocEntry {
        id: element.attr_string("id").unwrap_or_default(),
        level,
        title,
    })
}

fn decision_record_entry(element: &Element) -> TocEntry {
    let id = element.attr_string("id").unwrap_or_default();
    let title = element.attr_string("title").unwrap_or_default();
    TocEntry {
        id: decision_record_slug(&id, &title),
        level: DECISION_RECORD_LEVEL,
        title,
    }
}

/// Anchor for a decision record: `adr-<id>-<slugified title>`.
///
/// The title is lower-cased, every run of characters outside `[a-z0-9]` becomes a single
/// `-`, and leading or trailing dashes are dropped.
pub fn decision_record_slug(id: &str, title: &str) -> String {
    let lowered = title.to_lowercase();
    let dashed = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    format!("adr-{}-{}", id, dashed.trim_matches('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(id: &str, level: u64, title: &str) -> RenderNode {
        Element::new(names::HEADING)
            .with_attr("id", id)
            .with_attr("level", level)
            .with_child(title)
            .into()
    }

    fn decision_record(id: &str, title: &str, children: Vec<RenderNode>) -> RenderNode {
        Element::new(names::DECISION_RECORD)
            .with_attr("id", id)
            .with_attr("title", title)
            .with_attr("status", "accepted")
            .with_attr("date", "2024-03-01")
            .with_children(children)
            .into()
    }

    #[test]
    fn test_headings_in_document_order() {
        let root: RenderNode = Element::new("article")
            .with_child(heading("intro", 1, "Intro"))
            .with_child(
                Element::new("Callout").with_child(heading("nested", 2, "Nested")),
            )
            .with_child(RenderNode::Fragment(vec![heading("last", 2, "Last")]))
            .into();

        let ids: Vec<String> = collect_headings(&root).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["intro", "nested", "last"]);
    }

    #[test]
    fn test_heading_fields_are_copied() {
        let entries = collect_headings(&heading("setup", 2, "Setup"));
        assert_eq!(
            entries,
            vec![TocEntry {
                id: "setup".into(),
                level: 2,
                title: "Setup".into()
            }]
        );
    }

    #[test]
    fn test_heading_without_leading_text_is_skipped() {
        let root: RenderNode = Element::new(names::HEADING)
            .with_attr("id", "x")
            .with_child(Element::new("code").with_child("x"))
            .into();
        assert!(collect_headings(&root).is_empty());
    }

    #[test]
    fn test_decision_record_prunes_descendants() {
        let root: RenderNode = Element::new("article")
            .with_child(heading("before", 2, "Before"))
            .with_child(decision_record(
                "0007",
                "Use Postgres for storage",
                vec![heading("context", 2, "Context"), heading("decision", 2, "Decision")],
            ))
            .with_child(heading("after", 2, "After"))
            .into();

        let entries = collect_headings(&root);
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[1],
            TocEntry {
                id: "adr-0007-use-postgres-for-storage".into(),
                level: 3,
                title: "Use Postgres for storage".into()
            }
        );
        assert_eq!(entries[2].id, "after");
    }

    #[test]
    fn test_decision_record_slug() {
        assert_eq!(
            decision_record_slug("12", "  Hello, World!  "),
            "adr-12-hello-world"
        );
        assert_eq!(decision_record_slug("1", "C++ & Rust"), "adr-1-c-rust");
        assert_eq!(decision_record_slug("3", "v2.0 rollout"), "adr-3-v2-0-rollout");
        assert_eq!(decision_record_slug("4", "???"), "adr-4-");
    }

    #[test]
    fn test_text_root_has_no_entries() {
        assert!(collect_headings(&RenderNode::text("plain")).is_empty());
    }
}
