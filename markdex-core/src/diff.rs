//! Diff tag resolution
//!
//!     A diff tag shows a before and an after version of some code. Two spellings exist:
//!
//!     {% diff %}
//!     ```js
//!     old();
//!     ```
//!     ```js
//!     next();
//!     ```
//!     {% /diff %}
//!
//!     and the older form with explicit parts:
//!
//!     {% diff %}
//!     {% original %}old();{% /original %}
//!     {% new %}next();{% /new %}
//!     {% /diff %}
//!
//! Resolution Order
//!
//!     1. Direct fence children: the first is the original, the second the new text, any
//!        further fences are ignored. A single fence fills only the original.
//!     2. Fields still missing are looked up among the transformed children: the `original`
//!        and `new` schemas render `DiffPart` markers carrying their extracted text.
//!     3. Fields still missing after that are extracted straight from untransformed
//!        `original` / `new` children, including ones sitting inline in a paragraph.
//!
//!     Fence content is read from the raw `content` attribute and never trimmed. Missing
//!     fields end up as empty strings.

use crate::ast::{Node, RenderNode, Tag};
use crate::extraction::extract_children;
use crate::schema::{names, RenderContext, Transformer};
use serde::Serialize;

pub const ORIGINAL_KIND: &str = "original";
pub const NEW_KIND: &str = "new";

/// Marker attributes set on `DiffPart` elements.
pub const PART_TAG_ATTR: &str = "__tag";
pub const PART_CONTENT_ATTR: &str = "__content";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffText {
    pub original_text: String,
    pub new_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    Original,
    New,
}

impl DiffSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffSide::Original => ORIGINAL_KIND,
            DiffSide::New => NEW_KIND,
        }
    }

    pub fn from_kind(kind: &str) -> Option<DiffSide> {
        match kind {
            ORIGINAL_KIND => Some(DiffSide::Original),
            NEW_KIND => Some(DiffSide::New),
            _ => None,
        }
    }
}

/// Fields found so far; the first value found for a side wins.
#[derive(Default)]
struct Resolution {
    original: Option<String>,
    new: Option<String>,
}

impl Resolution {
    fn offer(&mut self, side: DiffSide, text: String) {
        let slot = match side {
            DiffSide::Original => &mut self.original,
            DiffSide::New => &mut self.new,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    fn is_complete(&self) -> bool {
        self.original.is_some() && self.new.is_some()
    }
}

/// Resolve the original and new text of a diff tag.
pub fn resolve_diff_text(tag: &Tag, transformer: &Transformer) -> DiffText {
    let mut resolution = Resolution::default();

    let mut fences = tag.children.iter().filter_map(Node::as_tag).filter(|t| t.kind == "fence");
    if let Some(first) = fences.next() {
        resolution.offer(DiffSide::Original, fence_content(first));
    }
    if let Some(second) = fences.next() {
        resolution.offer(DiffSide::New, fence_content(second));
    }

    if !resolution.is_complete() {
        // Scratch context: ids generated inside a diff are not part of the page
        let mut scratch = RenderContext::new();
        for rendered in transformer.transform_children(&tag.children, &mut scratch) {
            collect_markers(&rendered, &mut resolution);
        }
    }

    if !resolution.is_complete() {
        for child in &tag.children {
            collect_raw_parts(child, &mut resolution);
        }
    }

    DiffText {
        original_text: resolution.original.unwrap_or_default(),
        new_text: resolution.new.unwrap_or_default(),
    }
}

fn fence_content(fence: &Tag) -> String {
    fence.attr_string("content").unwrap_or_default()
}

fn collect_markers(node: &RenderNode, resolution: &mut Resolution) {
    match node {
        RenderNode::Element(element) if element.name == names::DIFF_PART => {
            let side = element.attr_str(PART_TAG_ATTR).and_then(DiffSide::from_kind);
            if let Some(side) = side {
                let content = element.attr_string(PART_CONTENT_ATTR).unwrap_or_default();
                resolution.offer(side, content);
            }
        }
        RenderNode::Fragment(items) => {
            for item in items {
                collect_markers(item, resolution);
            }
        }
        _ => {}
    }
}

fn collect_raw_parts(node: &Node, resolution: &mut Resolution) {
    let Some(tag) = node.as_tag() else {
        return;
    };
    if let Some(side) = DiffSide::from_kind(&tag.kind) {
        resolution.offer(side, extract_children(&tag.children));
    } else if tag.kind == "paragraph" {
        for inline in &tag.children {
            if let Some(part) = inline.as_tag() {
                if let Some(side) = DiffSide::from_kind(&part.kind) {
                    resolution.offer(side, extract_children(&part.children));
                }
            }
        }
    }
}

/// Resolve every diff tag in a document, in document order. Diffs nested inside a diff are
/// part of its content and are not reported separately.
pub fn collect_diffs(root: &Node, transformer: &Transformer) -> Vec<DiffText> {
    let mut diffs = Vec::new();
    walk_diffs(root, transformer, &mut diffs);
    diffs
}

fn walk_diffs(node: &Node, transformer: &Transformer, diffs: &mut Vec<DiffText>) {
    match node {
        Node::Text(_) => {}
        Node::Sequence(items) => {
            for item in items {
                walk_diffs(item, transformer, diffs);
            }
        }
        Node::Tag(tag) if tag.kind == "diff" => diffs.push(resolve_diff_text(tag, transformer)),
        Node::Tag(tag) => {
            for child in &tag.children {
                walk_diffs(child, transformer, diffs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn diff(children: Vec<Node>) -> Tag {
        Tag::new("diff").with_children(children)
    }

    fn part(kind: &str, text: &str) -> Node {
        Tag::new(kind).with_child(Tag::paragraph(text)).into()
    }

    #[test]
    fn test_two_fences() {
        let tag = diff(vec![
            Tag::fence("let a = 1;\n").into(),
            Tag::fence("let a = 2;\n").into(),
        ]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(
            resolved,
            DiffText {
                original_text: "let a = 1;\n".into(),
                new_text: "let a = 2;\n".into(),
            }
        );
    }

    #[test]
    fn test_extra_fences_are_ignored() {
        let tag = diff(vec![
            Tag::fence("a").into(),
            Tag::paragraph("between").into(),
            Tag::fence("b").into(),
            Tag::fence("c").into(),
        ]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, "a");
        assert_eq!(resolved.new_text, "b");
    }

    #[test]
    fn test_fence_whitespace_is_preserved() {
        let original = "\n  indented\n\t\ttabbed  \n\n";
        let new = "   \n";
        let tag = diff(vec![Tag::fence(original).into(), Tag::fence(new).into()]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, original);
        assert_eq!(resolved.new_text, new);
    }

    #[test]
    fn test_single_fence_fills_original_only() {
        let tag = diff(vec![Tag::fence("only\n").into()]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, "only\n");
        assert_eq!(resolved.new_text, "");
    }

    #[test]
    fn test_single_fence_with_legacy_new_part() {
        let tag = diff(vec![Tag::fence("old\n").into(), part("new", "fresh")]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, "old\n");
        assert_eq!(resolved.new_text, "fresh\n");
    }

    #[test]
    fn test_legacy_parts_through_markers() {
        let tag = diff(vec![part("original", "before"), part("new", "after")]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, "before\n");
        assert_eq!(resolved.new_text, "after\n");
    }

    #[test]
    fn test_legacy_parts_without_part_schemas() {
        let mut registry = SchemaRegistry::new();
        registry.register(crate::schema::builtin::ParagraphSchema);
        let transformer = Transformer::new(registry);

        let tag = diff(vec![part("original", "before"), part("new", "after")]);
        let resolved = resolve_diff_text(&tag, &transformer);
        assert_eq!(resolved.original_text, "before\n");
        assert_eq!(resolved.new_text, "after\n");
    }

    #[test]
    fn test_inline_parts_inside_paragraph() {
        let paragraph = Tag::new("paragraph")
            .with_child(Tag::new("original").with_child(Tag::text("x = 1")))
            .with_child(Tag::text(" "))
            .with_child(Tag::new("new").with_child(Tag::text("x = 2")));
        let tag = diff(vec![paragraph.into()]);
        let resolved = resolve_diff_text(&tag, &Transformer::default());
        assert_eq!(resolved.original_text, "x = 1");
        assert_eq!(resolved.new_text, "x = 2");
    }

    #[test]
    fn test_nothing_to_resolve() {
        let resolved = resolve_diff_text(&diff(vec![]), &Transformer::default());
        assert_eq!(resolved, DiffText::default());

        let prose = diff(vec![Tag::paragraph("just words").into()]);
        assert_eq!(
            resolve_diff_text(&prose, &Transformer::default()),
            DiffText::default()
        );
    }

    #[test]
    fn test_collect_diffs_in_order() {
        let doc: Node = Tag::new("document")
            .with_child(diff(vec![Tag::fence("1").into(), Tag::fence("2").into()]))
            .with_child(
                Tag::new("callout")
                    .with_child(diff(vec![Tag::fence("3").into(), Tag::fence("4").into()])),
            )
            .into();
        let diffs = collect_diffs(&doc, &Transformer::default());
        let pairs: Vec<(&str, &str)> = diffs
            .iter()
            .map(|d| (d.original_text.as_str(), d.new_text.as_str()))
            .collect();
        assert_eq!(pairs, vec![("1", "2"), ("3", "4")]);
    }

    #[test]
    fn test_serialized_shape() {
        let text = DiffText {
            original_text: "a".into(),
            new_text: "b".into(),
        };
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            serde_json::json!({"originalText": "a", "newText": "b"})
        );
    }
}
