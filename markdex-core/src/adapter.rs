//! JSON adapters
//!
//!     Content trees also arrive as JSON: Markdoc ASTs dumped by other tools, rendered tag
//!     trees, UI element trees with `props.children`. This module is the one place those
//!     shapes are recognised; everything past it works on [Node] and [RenderNode] only.
//!
//!     Parsed shapes ([node_from_json]):
//!
//!     - string or number: text
//!     - array: sequence
//!     - object with `type`: a tag of that kind, or of kind `tag` when `type` is "tag"
//!     - object with only `name`: a tag of that kind
//!
//!     Rendered shapes ([render_from_json]):
//!
//!     - string or number: text
//!     - array: fragment
//!     - object with `name`: element with `attributes` and `children`
//!     - object with `type` and `props`: element named after `type`, children from
//!       `props.children`, the remaining props as attributes
//!
//!     Anything else (null, booleans, objects matching no shape) becomes an empty sequence.

use crate::ast::{Attributes, Element, Node, RenderNode, Tag};
use serde_json::{Map, Value};

fn attributes_of(object: &Map<String, Value>, key: &str) -> Attributes {
    match object.get(key) {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => Attributes::new(),
    }
}

/// Children may be an array or a single node.
fn children_of(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(single) => vec![single],
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert a parsed-tree JSON value into a [Node].
pub fn node_from_json(value: &Value) -> Node {
    if let Some(text) = scalar_text(value) {
        return Node::Text(text);
    }
    match value {
        Value::Array(items) => Node::Sequence(items.iter().map(node_from_json).collect()),
        Value::Object(object) => match node_kind(object) {
            Some(kind) => {
                let mut tag = Tag::new(kind);
                tag.attributes = attributes_of(object, "attributes");
                tag.children = children_of(object.get("children"))
                    .into_iter()
                    .map(node_from_json)
                    .collect();
                tag.into()
            }
            None => {
                tracing::debug!("unrecognised node object, dropped");
                Node::empty()
            }
        },
        _ => Node::empty(),
    }
}

fn node_kind(object: &Map<String, Value>) -> Option<String> {
    match object.get("type").and_then(Value::as_str) {
        // Markdoc tag nodes carry their name in `tag`
        Some("tag") => Some(
            object
                .get("tag")
                .and_then(Value::as_str)
                .unwrap_or("tag")
                .to_string(),
        ),
        Some(kind) => Some(kind.to_string()),
        None => object.get("name").and_then(Value::as_str).map(str::to_string),
    }
}

/// Convert a rendered-tree JSON value into a [RenderNode].
pub fn render_from_json(value: &Value) -> RenderNode {
    if let Some(text) = scalar_text(value) {
        return RenderNode::Text(text);
    }
    match value {
        Value::Array(items) => RenderNode::Fragment(items.iter().map(render_from_json).collect()),
        Value::Object(object) => {
            if let Some(name) = object.get("name").and_then(Value::as_str) {
                let children = children_of(object.get("children"))
                    .into_iter()
                    .map(render_from_json)
                    .collect();
                return Element::new(name)
                    .with_attributes(attributes_of(object, "attributes"))
                    .with_children(children)
                    .into();
            }
            match (object.get("type"), object.get("props")) {
                (Some(Value::String(name)), Some(Value::Object(props))) => {
                    let children = children_of(props.get("children"))
                        .into_iter()
                        .map(render_from_json)
                        .collect();
                    let attributes = props
                        .iter()
                        .filter(|(key, _)| key.as_str() != "children")
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    Element::new(name.as_str())
                        .with_attributes(attributes)
                        .with_children(children)
                        .into()
                }
                _ => RenderNode::empty(),
            }
        }
        _ => RenderNode::empty(),
    }
}
