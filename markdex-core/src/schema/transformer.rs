use super::{RenderContext, SchemaRegistry};
use crate::ast::{Element, Node, RenderNode};

/// Walks parsed trees and hands every tag to the schema registered for its kind.
///
/// Tags with no registered schema are still rendered: the element takes the tag's kind as
/// its name and keeps attributes and transformed children.
pub struct Transformer {
    registry: SchemaRegistry,
    heading_prefix: String,
}

impl Transformer {
    pub fn new(registry: SchemaRegistry) -> Self {
        Transformer {
            registry,
            heading_prefix: "heading".to_string(),
        }
    }

    /// Prefix for generated heading ids (default `heading`).
    pub fn with_heading_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.heading_prefix = prefix.into();
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Transform one document with a fresh [RenderContext].
    pub fn transform_document(&self, root: &Node) -> RenderNode {
        let mut context = RenderContext::with_heading_prefix(self.heading_prefix.clone());
        self.transform(root, &mut context)
    }

    pub fn transform(&self, node: &Node, context: &mut RenderContext) -> RenderNode {
        match node {
            Node::Text(text) => RenderNode::Text(text.clone()),
            Node::Sequence(items) => RenderNode::Fragment(self.transform_children(items, context)),
            Node::Tag(tag) => match self.registry.get(&tag.kind) {
                Some(schema) => schema.transform(tag, context, self),
                None => {
                    tracing::debug!(kind = %tag.kind, "no schema registered, rendering generically");
                    Element::new(tag.kind.clone())
                        .with_attributes(tag.attributes.clone())
                        .with_children(self.transform_children(&tag.children, context))
                        .into()
                }
            },
        }
    }

    pub fn transform_children(
        &self,
        children: &[Node],
        context: &mut RenderContext,
    ) -> Vec<RenderNode> {
        children
            .iter()
            .map(|child| self.transform(child, context))
            .collect()
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(SchemaRegistry::with_defaults())
    }
}
