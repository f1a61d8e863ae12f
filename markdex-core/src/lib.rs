//! # markdex
//!
//! Content core for Markdoc documentation sites.
//!
//! Pipeline
//!
//!     Page source flows through three shapes:
//!
//!     source text ──reader──▶ Node ──transformer──▶ RenderNode
//!
//!     The reader turns Markdoc-flavoured text into a [Node](ast::Node) tree. Tag schemas,
//!     driven by the [Transformer](schema::Transformer), turn that into a
//!     [RenderNode](ast::RenderNode) tree and compute derived attributes on the way (diff
//!     text, parsed file trees, heading ids). Trees produced elsewhere enter through the
//!     [adapter] module, which is the only code that guesses at shapes.
//!
//!     Cross-page work runs as a separate pass: [links] builds the backlink index from raw
//!     page content and [toc] collects the outline from rendered trees.
//!
//! File Layout
//!
//!     .
//!     ├── ast.rs              # Node / RenderNode unions
//!     ├── extraction.rs       # Node and RenderNode → plain text
//!     ├── diff.rs             # original/new text of diff tags
//!     ├── filetree.rs         # indentation text → folder tree
//!     ├── links.rs            # link extraction and backlink index
//!     ├── toc.rs              # heading outline
//!     ├── semver.rs           # version tags
//!     ├── reader              # Markdoc source → Node
//!     ├── adapter.rs          # JSON shapes → Node / RenderNode
//!     ├── schema              # tag schemas, registry, transformer, render context
//!     ├── page.rs
//!     └── loader.rs           # docs directory → pages
//!
//!     Everything except the loader is pure: no I/O, no shared state. Extraction never fails,
//!     malformed input degrades to empty or partial output.

pub mod adapter;
pub mod ast;
pub mod diff;
pub mod extraction;
pub mod filetree;
pub mod links;
pub mod loader;
pub mod page;
pub mod reader;
pub mod schema;
pub mod semver;
pub mod toc;

pub use ast::{Attributes, Element, Node, RenderNode, Tag};
pub use diff::{collect_diffs, resolve_diff_text, DiffText};
pub use extraction::{extract_rendered_text, extract_text};
pub use filetree::{parse_tree, render_tree, TreeNode};
pub use links::{extract_links, extract_links_with, normalize_link_path, BacklinkIndex, LinkRules};
pub use loader::{LoadError, LoaderOptions, PageLoader};
pub use page::Page;
pub use reader::{parse_document, Document, Frontmatter, ReadError};
pub use schema::{RenderContext, SchemaRegistry, TagSchema, Transformer};
pub use semver::{compare_tags, format_tag, sort_tags_desc, Version};
pub use toc::{collect_headings, TocEntry};
