//! Plain text extraction
//!
//!     Flattens a content tree into the plain string that tag schemas compute their derived
//!     attributes from. Two entry points share one joining policy:
//!
//!     - [extract_text] walks parsed [Node]s.
//!     - [extract_rendered_text] walks already rendered [RenderNode]s, for tags whose children
//!       were transformed before anyone asked for their text.
//!
//!     Both must produce byte-identical output for the same content, so paragraph handling is
//!     shared: a paragraph is its children run together plus one trailing newline.
//!
//! Joining Siblings
//!
//!     Bare text siblings and `text` tags are inline runs and are appended as they are. A
//!     `text` tag renders to bare text, so both trees see the same run. Every other sibling is
//!     a block: it starts on a new line, so a newline is inserted before it unless the output
//!     so far is empty or already ends with one. Paragraphs bring their own newline, hence
//!     `[paragraph "a", paragraph "b"]` flattens to `"a\nb\n"` with nothing in between.
//!
//! Totality
//!
//!     Extraction never fails. Shapes it does not recognise contribute nothing.

use crate::ast::{scalar_to_string, Element, Node, RenderNode, Tag};
use crate::schema::names;

/// Flatten a parsed node into plain text.
pub fn extract_text(node: &Node) -> String {
    match node {
        Node::Text(text) => text.clone(),
        Node::Sequence(items) => extract_children(items),
        Node::Tag(tag) => extract_tag(tag),
    }
}

/// Flatten a list of sibling nodes, see the module docs for the joining rule.
pub fn extract_children(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Tag(tag) if tag.kind == "text" => out.push_str(&extract_tag(tag)),
            other => push_block(&mut out, &extract_text(other)),
        }
    }
    out
}

/// Flatten a single tag according to its kind.
pub fn extract_tag(tag: &Tag) -> String {
    match tag.kind.as_str() {
        "fence" => match tag.attr_string("content") {
            // Raw code, never re-tokenized
            Some(content) => content,
            None => extract_generic(tag),
        },
        "paragraph" => {
            let mut line = extract_inline(&tag.children);
            line.push('\n');
            line
        }
        "text" => literal_value(tag).unwrap_or_else(|| {
            tag.children
                .iter()
                .filter_map(|child| match child {
                    Node::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }),
        _ => extract_generic(tag),
    }
}

fn extract_generic(tag: &Tag) -> String {
    literal_value(tag).unwrap_or_else(|| extract_children(&tag.children))
}

/// Children of an inline container, concatenated without separators.
fn extract_inline(children: &[Node]) -> String {
    children.iter().map(extract_text).collect()
}

fn push_block(out: &mut String, block: &str) {
    if block.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(block);
}

/// Flatten a rendered node, treating elements named `p` as paragraphs.
pub fn extract_rendered_text(node: &RenderNode) -> String {
    extract_rendered_text_with(node, names::PARAGRAPH)
}

/// Flatten a rendered node with a custom paragraph element name.
pub fn extract_rendered_text_with(node: &RenderNode, paragraph_name: &str) -> String {
    match node {
        RenderNode::Text(text) => text.clone(),
        RenderNode::Fragment(items) => extract_rendered_children(items, paragraph_name),
        RenderNode::Element(element) => extract_element(element, paragraph_name),
    }
}

fn extract_element(element: &Element, paragraph_name: &str) -> String {
    if element.name == paragraph_name {
        let mut line: String = element
            .children
            .iter()
            .map(|child| extract_rendered_text_with(child, paragraph_name))
            .collect();
        line.push('\n');
        return line;
    }
    extract_rendered_children(&element.children, paragraph_name)
}

fn extract_rendered_children(children: &[RenderNode], paragraph_name: &str) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            RenderNode::Text(text) => out.push_str(text),
            other => push_block(&mut out, &extract_rendered_text_with(other, paragraph_name)),
        }
    }
    out
}

/// Stringified `content` or `value` of a tag, whichever is found first.
pub(crate) fn literal_value(tag: &Tag) -> Option<String> {
    ["content", "value"]
        .iter()
        .find_map(|key| tag.attributes.get(*key).and_then(scalar_to_string))
}
