//! Markdoc reader
//!
//!     Reads page source into a [Document]: the optional frontmatter plus a `document` tag
//!     holding the parsed block tree. The reader understands the subset of Markdoc the
//!     documentation pages use:
//!
//!     - `---` delimited YAML frontmatter on the first line
//!     - fenced code (``` or ~~~) with an optional language
//!     - ATX headings, with an optional `{% #id %}` annotation
//!     - block tags `{% name attrs %}` ... `{% /name %}`, nested freely, and self-closing
//!       `{% name attrs /%}` tags
//!     - `-`, `*`, `+` and numbered list items
//!     - paragraphs with inline tags
//!
//!     The file structure :
//!     .
//!     ├── frontmatter.rs    # YAML header
//!     ├── inline.rs         # text runs and inline tags
//!     ├── lines.rs          # line classification
//!     └── tokens.rs         # logos lexer for tag headers
//!
//! Leniency
//!
//!     Reading only fails on invalid frontmatter. A malformed tag stays literal text, a
//!     closing tag that matches nothing is kept as text, and fences or block tags left open
//!     at the end of input are closed there.
//!
//! Fence Content
//!
//!     A fence's `content` attribute holds each inner line followed by `\n`, with at most
//!     the fence's own indentation removed. Nothing else is trimmed. Lines are split with
//!     `str::lines`, so `\r\n` endings come out as `\n`: content is byte-exact for LF sources.

mod frontmatter;
mod inline;
mod lines;
mod tokens;

pub use frontmatter::Frontmatter;
pub use tokens::{parse_tag_header, TagHeader};

use crate::ast::{Node, Tag};
use frontmatter::split_frontmatter;
use inline::parse_inline;
use lines::{classify_line, closes_fence, strip_indent, Line};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub frontmatter: Frontmatter,
    pub root: Node,
}

impl Document {
    /// Top-level blocks of the document.
    pub fn blocks(&self) -> &[Node] {
        match &self.root {
            Node::Tag(tag) => &tag.children,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    /// The frontmatter block is not valid YAML
    Frontmatter(String),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Frontmatter(msg) => write!(f, "Invalid frontmatter: {}", msg),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<serde_yaml::Error> for ReadError {
    fn from(err: serde_yaml::Error) -> Self {
        ReadError::Frontmatter(err.to_string())
    }
}

/// Parse a page.
pub fn parse_document(source: &str) -> Result<Document, ReadError> {
    let lines: Vec<&str> = source.lines().collect();
    let (yaml, body_start) = split_frontmatter(&lines);
    let frontmatter = match yaml {
        Some(yaml) => Frontmatter::parse(&yaml)?,
        None => Frontmatter::default(),
    };

    let mut builder = BlockBuilder::new();
    for line in &lines[body_start..] {
        builder.push_line(line);
    }

    Ok(Document {
        frontmatter,
        root: builder.finish().into(),
    })
}

struct OpenFence {
    indent: usize,
    marker: String,
    language: String,
    content: String,
}

struct OpenList {
    ordered: bool,
    items: Vec<Node>,
}

/// Line-at-a-time block parser. `containers[0]` is the document, the rest are open block tags.
struct BlockBuilder {
    containers: Vec<Tag>,
    paragraph: Vec<String>,
    list: Option<OpenList>,
    fence: Option<OpenFence>,
}

impl BlockBuilder {
    fn new() -> Self {
        BlockBuilder {
            containers: vec![Tag::new("document")],
            paragraph: Vec::new(),
            list: None,
            fence: None,
        }
    }

    fn push_line(&mut self, line: &str) {
        if let Some(fence) = self.fence.as_mut() {
            if closes_fence(line, &fence.marker) {
                self.close_fence();
            } else {
                fence.content.push_str(strip_indent(line, fence.indent));
                fence.content.push('\n');
            }
            return;
        }

        match classify_line(line) {
            Line::Blank => self.flush(),
            Line::FenceOpen {
                indent,
                marker,
                info,
            } => {
                self.flush();
                self.fence = Some(OpenFence {
                    indent,
                    marker: marker.to_string(),
                    language: info.split_whitespace().next().unwrap_or("").to_string(),
                    content: String::new(),
                });
            }
            Line::Heading { level, text } => {
                self.flush();
                let mut heading = inline_block("heading", text);
                heading
                    .attributes
                    .insert("level".to_string(), Value::from(level));
                self.append(heading.into());
            }
            Line::Tag(TagHeader::Open {
                name,
                attributes,
                self_closing,
            }) => {
                self.flush();
                let mut tag = Tag::new(name);
                tag.attributes = attributes;
                if self_closing {
                    self.append(tag.into());
                } else {
                    self.containers.push(tag);
                }
            }
            Line::Tag(TagHeader::Close { name }) => {
                let open = self
                    .containers
                    .iter()
                    .skip(1)
                    .rposition(|tag| tag.kind == name);
                match open {
                    Some(index) => {
                        self.flush();
                        // `index` counts from containers[1]
                        while self.containers.len() > index + 1 {
                            self.close_container();
                        }
                    }
                    None => {
                        tracing::warn!(tag = %name, "closing tag without an opening tag");
                        self.push_text(line);
                    }
                }
            }
            Line::Tag(TagHeader::Annotation { .. }) | Line::Text(_) => self.push_text(line),
            Line::ListItem { ordered, text } => {
                self.flush_paragraph();
                if self.list.as_ref().is_some_and(|list| list.ordered != ordered) {
                    self.flush_list();
                }
                let list = self.list.get_or_insert_with(|| OpenList {
                    ordered,
                    items: Vec::new(),
                });
                list.items.push(inline_block("item", text).into());
            }
        }
    }

    fn push_text(&mut self, line: &str) {
        self.flush_list();
        self.paragraph.push(line.trim().to_string());
    }

    fn append(&mut self, node: Node) {
        if let Some(parent) = self.containers.last_mut() {
            parent.children.push(node);
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.paragraph).join("\n");
        let paragraph = inline_block("paragraph", &text);
        self.append(paragraph.into());
    }

    fn flush_list(&mut self) {
        if let Some(list) = self.list.take() {
            let tag = Tag::new("list")
                .with_attr("ordered", list.ordered)
                .with_children(list.items);
            self.append(tag.into());
        }
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            let mut tag = Tag::fence(fence.content);
            if !fence.language.is_empty() {
                tag = tag.with_attr("language", fence.language);
            }
            self.append(tag.into());
        }
    }

    fn close_container(&mut self) {
        if self.containers.len() <= 1 {
            return;
        }
        if let Some(tag) = self.containers.pop() {
            self.append(tag.into());
        }
    }

    fn finish(mut self) -> Tag {
        if self.fence.is_some() {
            tracing::warn!("unclosed code fence at end of input");
            self.close_fence();
        }
        self.flush();
        while self.containers.len() > 1 {
            if let Some(tag) = self.containers.last() {
                tracing::warn!(tag = %tag.kind, "unclosed tag at end of input");
            }
            self.close_container();
        }
        self.containers.pop().unwrap_or_else(|| Tag::new("document"))
    }
}

/// A block whose children are inline content; annotations become its attributes.
fn inline_block(kind: &str, text: &str) -> Tag {
    let inline = parse_inline(text);
    let mut tag = Tag::new(kind).with_children(inline.children);
    tag.attributes.extend(inline.annotations);
    tag
}
