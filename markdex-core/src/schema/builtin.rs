//! Built-in tag schemas
//!
//! Standard nodes (document, paragraph, text, heading, fence, list, item) and the custom
//! documentation tags (diff and its parts, filetree, adr, callout).

use super::{names, RenderContext, TagSchema, Transformer};
use crate::ast::{scalar_to_string, Element, RenderNode, Tag};
use crate::diff::{resolve_diff_text, DiffSide, PART_CONTENT_ATTR, PART_TAG_ATTR};
use crate::extraction::{extract_children, extract_tag};
use crate::filetree::parse_tree;
use serde_json::Value;

/// Renders a tag kind under a fixed element name, nothing else.
pub struct ElementSchema {
    kind: String,
    render_name: String,
}

impl ElementSchema {
    pub fn new(kind: impl Into<String>, render_name: impl Into<String>) -> Self {
        ElementSchema {
            kind: kind.into(),
            render_name: render_name.into(),
        }
    }
}

impl TagSchema for ElementSchema {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn render_name(&self) -> &str {
        &self.render_name
    }
}

pub struct ParagraphSchema;

impl TagSchema for ParagraphSchema {
    fn kind(&self) -> &str {
        "paragraph"
    }

    fn render_name(&self) -> &str {
        names::PARAGRAPH
    }
}

/// Text nodes render as bare strings.
pub struct TextSchema;

impl TagSchema for TextSchema {
    fn kind(&self) -> &str {
        "text"
    }

    fn render_name(&self) -> &str {
        "text"
    }

    fn transform(&self, tag: &Tag, _: &mut RenderContext, _: &Transformer) -> RenderNode {
        RenderNode::Text(extract_tag(tag))
    }
}

/// Headings keep an explicit `id`; otherwise one is generated from the render context.
pub struct HeadingSchema;

impl TagSchema for HeadingSchema {
    fn kind(&self) -> &str {
        "heading"
    }

    fn render_name(&self) -> &str {
        names::HEADING
    }

    fn description(&self) -> &str {
        "Section heading with a stable anchor id"
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        let id = match tag.attr_string("id") {
            Some(id) if !id.is_empty() => id,
            _ => context.next_heading_id(),
        };
        let level = tag
            .attributes
            .get("level")
            .and_then(Value::as_u64)
            .unwrap_or(1);

        Element::new(names::HEADING)
            .with_attributes(tag.attributes.clone())
            .with_attr("id", id)
            .with_attr("level", level)
            .with_children(transformer.transform_children(&tag.children, context))
            .into()
    }
}

/// Code fences render their raw content as the only child.
pub struct FenceSchema;

impl TagSchema for FenceSchema {
    fn kind(&self) -> &str {
        "fence"
    }

    fn render_name(&self) -> &str {
        names::FENCE
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        let children = match tag.attr_string("content") {
            Some(content) => vec![RenderNode::Text(content)],
            None => transformer.transform_children(&tag.children, context),
        };
        Element::new(names::FENCE)
            .with_attributes(tag.attributes.clone())
            .with_children(children)
            .into()
    }
}

/// Lists render as `ol` when `ordered` is set, `ul` otherwise.
pub struct ListSchema;

impl TagSchema for ListSchema {
    fn kind(&self) -> &str {
        "list"
    }

    fn render_name(&self) -> &str {
        "ul"
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        let ordered = tag
            .attributes
            .get("ordered")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let name = if ordered { "ol" } else { self.render_name() };
        Element::new(name)
            .with_attributes(tag.attributes.clone())
            .with_children(transformer.transform_children(&tag.children, context))
            .into()
    }
}

/// Diffs render with their resolved `originalText` and `newText`; the children are consumed.
pub struct DiffSchema;

impl TagSchema for DiffSchema {
    fn kind(&self) -> &str {
        "diff"
    }

    fn render_name(&self) -> &str {
        names::DIFF
    }

    fn description(&self) -> &str {
        "Side-by-side comparison of an original and a new code block"
    }

    fn transform(&self, tag: &Tag, _: &mut RenderContext, transformer: &Transformer) -> RenderNode {
        let resolved = resolve_diff_text(tag, transformer);
        Element::new(names::DIFF)
            .with_attributes(tag.attributes.clone())
            .with_attr("originalText", resolved.original_text)
            .with_attr("newText", resolved.new_text)
            .into()
    }
}

/// `original` / `new` parts of the legacy diff syntax, rendered as markers for the diff.
pub struct DiffPartSchema {
    side: DiffSide,
}

impl DiffPartSchema {
    pub fn original() -> Self {
        DiffPartSchema {
            side: DiffSide::Original,
        }
    }

    pub fn new_side() -> Self {
        DiffPartSchema {
            side: DiffSide::New,
        }
    }
}

impl TagSchema for DiffPartSchema {
    fn kind(&self) -> &str {
        self.side.as_str()
    }

    fn render_name(&self) -> &str {
        names::DIFF_PART
    }

    fn transform(&self, tag: &Tag, _: &mut RenderContext, _: &Transformer) -> RenderNode {
        Element::new(names::DIFF_PART)
            .with_attr(PART_TAG_ATTR, self.side.as_str())
            .with_attr(PART_CONTENT_ATTR, extract_children(&tag.children))
            .into()
    }
}

/// File trees render with the parsed `tree` attribute.
///
/// The source text is the `content` attribute when given, otherwise the extracted children
/// (usually a single fence).
pub struct FileTreeSchema;

impl TagSchema for FileTreeSchema {
    fn kind(&self) -> &str {
        "filetree"
    }

    fn render_name(&self) -> &str {
        names::FILE_TREE
    }

    fn transform(&self, tag: &Tag, _: &mut RenderContext, _: &Transformer) -> RenderNode {
        let source = tag
            .attr_string("content")
            .unwrap_or_else(|| extract_children(&tag.children));
        let tree = serde_json::to_value(parse_tree(&source)).unwrap_or_default();
        Element::new(names::FILE_TREE)
            .with_attributes(tag.attributes.clone())
            .with_attr("tree", tree)
            .into()
    }
}

/// Decision records (`adr` tags) render as `DecisionRecord` elements with string `id`,
/// `title`, `status` and `date`.
pub struct DecisionRecordSchema;

const DECISION_RECORD_FIELDS: [&str; 4] = ["id", "title", "status", "date"];

impl TagSchema for DecisionRecordSchema {
    fn kind(&self) -> &str {
        "adr"
    }

    fn render_name(&self) -> &str {
        names::DECISION_RECORD
    }

    fn description(&self) -> &str {
        "Architecture decision record"
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        let mut element = Element::new(names::DECISION_RECORD).with_attributes(tag.attributes.clone());
        for field in DECISION_RECORD_FIELDS {
            let value = tag.attributes.get(field).and_then(scalar_to_string);
            if value.is_none() {
                tracing::warn!(field, "decision record is missing an attribute");
            }
            element = element.with_attr(field, value.unwrap_or_default());
        }
        element
            .with_children(transformer.transform_children(&tag.children, context))
            .into()
    }
}

pub const CALLOUT_TYPES: [&str; 5] = ["note", "tip", "info", "warning", "danger"];

/// Callouts default to the `note` type.
pub struct CalloutSchema;

impl TagSchema for CalloutSchema {
    fn kind(&self) -> &str {
        "callout"
    }

    fn render_name(&self) -> &str {
        names::CALLOUT
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        let kind = tag
            .attr_string("type")
            .unwrap_or_else(|| CALLOUT_TYPES[0].to_string());
        if !CALLOUT_TYPES.contains(&kind.as_str()) {
            tracing::debug!(%kind, "unknown callout type");
        }
        Element::new(names::CALLOUT)
            .with_attributes(tag.attributes.clone())
            .with_attr("type", kind)
            .with_children(transformer.transform_children(&tag.children, context))
            .into()
    }
}
