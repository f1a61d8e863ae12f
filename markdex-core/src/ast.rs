//! Content tree types
//!
//!     Two unions carry content through the pipeline. [Node] is the parsed shape, produced by
//!     the reader or the JSON adapter and consumed by tag schemas and the text extractor.
//!     [RenderNode] is the rendered shape, produced by the transformer and consumed by the
//!     outline collector and the rendered-text extractor.
//!
//!     Neither type knows where it came from. External shapes are normalized before they get
//!     here, see [crate::adapter].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag attributes, keyed by name. Ordered so serialized output is stable.
pub type Attributes = BTreeMap<String, Value>;

/// A parsed content node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Literal text, the only source of characters during extraction.
    Text(String),
    /// Sibling nodes. Flattening is the extractor's job, nesting is allowed.
    Sequence(Vec<Node>),
    Tag(Tag),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn empty() -> Self {
        Node::Sequence(Vec::new())
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// True for a tag node of the given kind.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.as_tag().is_some_and(|tag| tag.kind == kind)
    }
}

impl From<Tag> for Node {
    fn from(tag: Tag) -> Self {
        Node::Tag(tag)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

/// A node with a kind, attributes and children: `paragraph`, `fence`, `heading`, or any
/// custom Markdoc tag such as `diff` or `adr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub kind: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Tag {
    pub fn new(kind: impl Into<String>) -> Self {
        Tag {
            kind: kind.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// A `text` node carrying `content`.
    pub fn text(content: impl Into<String>) -> Self {
        Tag::new("text").with_attr("content", Value::String(content.into()))
    }

    /// A `fence` node with raw `content`.
    pub fn fence(content: impl Into<String>) -> Self {
        Tag::new("fence").with_attr("content", Value::String(content.into()))
    }

    /// A `paragraph` holding a single text run.
    pub fn paragraph(content: impl Into<String>) -> Self {
        Tag::new("paragraph").with_child(Tag::text(content))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attribute as a string slice, only when it is stored as a JSON string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Attribute rendered as text. See [scalar_to_string].
    pub fn attr_string(&self, key: &str) -> Option<String> {
        self.attributes.get(key).and_then(scalar_to_string)
    }
}

/// Render a scalar attribute as text.
///
/// Strings are returned as-is, numbers and booleans through their display form. `null`,
/// arrays and objects count as absent.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A rendered node: the output of tag transforms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderNode {
    Text(String),
    Fragment(Vec<RenderNode>),
    Element(Element),
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    pub fn empty() -> Self {
        RenderNode::Fragment(Vec::new())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

impl From<&str> for RenderNode {
    fn from(text: &str) -> Self {
        RenderNode::Text(text.to_string())
    }
}

/// A rendered element, named after the component that displays it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn with_child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn attr_string(&self, key: &str) -> Option<String> {
        self.attributes.get(key).and_then(scalar_to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("a b")), Some("a b".to_string()));
        assert_eq!(scalar_to_string(&json!(3)), Some("3".to_string()));
        assert_eq!(scalar_to_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(scalar_to_string(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_to_string(&Value::Null), None);
        assert_eq!(scalar_to_string(&json!(["x"])), None);
        assert_eq!(scalar_to_string(&json!({"x": 1})), None);
    }

    #[test]
    fn test_tag_builders() {
        let tag = Tag::new("callout")
            .with_attr("type", "warning")
            .with_child(Tag::paragraph("Careful"));

        assert_eq!(tag.attr_str("type"), Some("warning"));
        assert_eq!(tag.children.len(), 1);
        assert!(tag.children[0].is_kind("paragraph"));
        assert!(!tag.children[0].is_kind("fence"));
    }

    #[test]
    fn test_node_serializes_untagged() {
        let node = Node::Sequence(vec![Node::text("a"), Tag::fence("b\n").into()]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!(["a", {"kind": "fence", "attributes": {"content": "b\n"}}])
        );
    }
}
