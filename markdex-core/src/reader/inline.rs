//! Inline content: text runs and tags inside a paragraph, heading or list item.

use super::tokens::{next_tag, TagHeader};
use crate::ast::{Attributes, Node, Tag};

/// Parsed inline content. `annotations` are attributes addressed to the enclosing block,
/// such as the `{% #id %}` after a heading.
#[derive(Debug, Default, PartialEq)]
pub struct Inline {
    pub children: Vec<Node>,
    pub annotations: Attributes,
}

/// An inline tag still waiting for its closing tag.
struct Frame {
    tag: Tag,
    text: String,
}

impl Frame {
    fn new(tag: Tag) -> Self {
        Frame {
            tag,
            text: String::new(),
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.tag.children.push(Tag::text(text).into());
        }
    }
}

pub fn parse_inline(source: &str) -> Inline {
    let mut root = Frame::new(Tag::new("inline"));
    let mut stack: Vec<Frame> = Vec::new();
    let mut cursor = 0;

    while let Some((range, header)) = next_tag(source, cursor) {
        let before = &source[cursor..range.start];
        cursor = range.end;

        match header {
            TagHeader::Open {
                name,
                attributes,
                self_closing,
            } => {
                let top = current(&mut stack, &mut root);
                top.text.push_str(before);
                top.flush_text();
                let mut tag = Tag::new(name);
                tag.attributes = attributes;
                if self_closing {
                    top.tag.children.push(tag.into());
                } else {
                    stack.push(Frame::new(tag));
                }
            }
            TagHeader::Close { name } => {
                let open = stack.iter().rposition(|frame| frame.tag.kind == name);
                let top = current(&mut stack, &mut root);
                top.text.push_str(before);
                match open {
                    Some(index) => {
                        while stack.len() > index {
                            close_frame(&mut stack, &mut root);
                        }
                    }
                    None => {
                        tracing::warn!(tag = %name, "closing tag without an opening tag");
                        top.text.push_str(&source[range]);
                    }
                }
            }
            TagHeader::Annotation { attributes } => {
                let top = current(&mut stack, &mut root);
                top.text.push_str(before);
                top.flush_text();
                top.tag.attributes.extend(attributes);
            }
        }
    }

    current(&mut stack, &mut root)
        .text
        .push_str(&source[cursor..]);
    while !stack.is_empty() {
        close_frame(&mut stack, &mut root);
    }
    root.flush_text();

    let mut children = root.tag.children;
    trim_trailing_text(&mut children);
    Inline {
        children,
        annotations: root.tag.attributes,
    }
}

fn current<'a>(stack: &'a mut [Frame], root: &'a mut Frame) -> &'a mut Frame {
    match stack.last_mut() {
        Some(frame) => frame,
        None => root,
    }
}

fn close_frame(stack: &mut Vec<Frame>, root: &mut Frame) {
    let Some(mut frame) = stack.pop() else {
        return;
    };
    frame.flush_text();
    let parent = current(stack, root);
    parent.flush_text();
    parent.tag.children.push(frame.tag.into());
}

/// Trailing whitespace before an annotation or at the end of the block is not content.
fn trim_trailing_text(children: &mut Vec<Node>) {
    let Some(Node::Tag(last)) = children.last_mut() else {
        return;
    };
    if last.kind != "text" {
        return;
    }
    let trimmed = last
        .attr_str("content")
        .map(|content| content.trim_end().to_string());
    match trimmed {
        Some(content) if content.is_empty() => {
            children.pop();
        }
        Some(content) => {
            *last = Tag::text(content);
        }
        None => {}
    }
}
