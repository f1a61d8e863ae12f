//! Tag schemas and the transformer
//!
//!     A tag schema decides how one kind of parsed [Tag] becomes a [RenderNode]: which
//!     component name it renders as, which attributes it derives, what happens to its
//!     children. Schemas are looked up by tag kind in a [SchemaRegistry]; the [Transformer]
//!     walks a parsed tree and dispatches every tag to its schema.
//!
//!     The file structure :
//!     .
//!     ├── builtin.rs        # schemas for the standard and custom documentation tags
//!     ├── context.rs        # per-document render state
//!     └── transformer.rs    # tree walk and dispatch
//!
//! Render State
//!
//!     Schemas that need to remember something across a document (heading id numbering) get
//!     it from the [RenderContext] passed down the call chain. A context is created per
//!     document, there is no global counter to reset.

pub mod builtin;
mod context;
mod transformer;

pub use context::RenderContext;
pub use transformer::Transformer;

use crate::ast::{Element, RenderNode, Tag};
use std::collections::HashMap;

/// Component names used in rendered trees.
pub mod names {
    pub const PARAGRAPH: &str = "p";
    pub const HEADING: &str = "Heading";
    pub const FENCE: &str = "Fence";
    pub const DIFF: &str = "Diff";
    pub const DIFF_PART: &str = "DiffPart";
    pub const FILE_TREE: &str = "FileTree";
    pub const DECISION_RECORD: &str = "DecisionRecord";
    pub const CALLOUT: &str = "Callout";
    pub const ARTICLE: &str = "article";
    pub const LIST_ITEM: &str = "li";
}

/// How one tag kind is rendered.
///
/// The default transform keeps the tag's attributes, transforms its children and names the
/// element after [render_name](TagSchema::render_name). Schemas override it when they derive
/// attributes or drop children.
pub trait TagSchema: Send + Sync {
    /// The tag kind this schema handles (e.g., "diff", "heading")
    fn kind(&self) -> &str;

    /// Name of the rendered element
    fn render_name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn transform(
        &self,
        tag: &Tag,
        context: &mut RenderContext,
        transformer: &Transformer,
    ) -> RenderNode {
        Element::new(self.render_name())
            .with_attributes(tag.attributes.clone())
            .with_children(transformer.transform_children(&tag.children, context))
            .into()
    }
}

/// Registry of tag schemas, keyed by tag kind.
pub struct SchemaRegistry {
    schemas: HashMap<String, Box<dyn TagSchema>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        SchemaRegistry {
            schemas: HashMap::new(),
        }
    }

    /// Register a schema
    ///
    /// If a schema for the same kind already exists, it will be replaced.
    pub fn register<S: TagSchema + 'static>(&mut self, schema: S) {
        self.schemas
            .insert(schema.kind().to_string(), Box::new(schema));
    }

    pub fn get(&self, kind: &str) -> Option<&dyn TagSchema> {
        self.schemas.get(kind).map(|schema| schema.as_ref())
    }

    pub fn has(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Registered tag kinds, sorted
    pub fn list_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<_> = self.schemas.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Create a registry with the built-in schemas
    pub fn with_defaults() -> Self {
        use builtin::*;

        let mut registry = Self::new();
        registry.register(ElementSchema::new("document", names::ARTICLE));
        registry.register(ElementSchema::new("item", names::LIST_ITEM));
        registry.register(ParagraphSchema);
        registry.register(TextSchema);
        registry.register(HeadingSchema);
        registry.register(FenceSchema);
        registry.register(ListSchema);
        registry.register(DiffSchema);
        registry.register(DiffPartSchema::original());
        registry.register(DiffPartSchema::new_side());
        registry.register(FileTreeSchema);
        registry.register(DecisionRecordSchema);
        registry.register(CalloutSchema);
        registry
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BadgeSchema;
    impl TagSchema for BadgeSchema {
        fn kind(&self) -> &str {
            "badge"
        }
        fn render_name(&self) -> &str {
            "Badge"
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        assert!(!registry.has("badge"));

        registry.register(BadgeSchema);
        assert!(registry.has("badge"));
        assert_eq!(registry.get("badge").map(|s| s.render_name()), Some("Badge"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_default_kinds() {
        let registry = SchemaRegistry::with_defaults();
        assert_eq!(
            registry.list_kinds(),
            vec![
                "adr", "callout", "diff", "document", "fence", "filetree", "heading", "item",
                "list", "new", "original", "paragraph", "text"
            ]
        );
    }

    #[test]
    fn test_default_transform_keeps_attributes_and_children() {
        let mut registry = SchemaRegistry::new();
        registry.register(BadgeSchema);
        let transformer = Transformer::new(registry);
        let tag = Tag::new("badge")
            .with_attr("color", "green")
            .with_child(crate::ast::Node::text("new"));

        let rendered = transformer.transform_document(&tag.into());
        let expected = Element::new("Badge")
            .with_attr("color", "green")
            .with_child("new");
        assert_eq!(rendered, RenderNode::from(expected));
    }
}
