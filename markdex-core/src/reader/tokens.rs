//! Tag header tokens
//!
//! Tokenizes what sits between `{%` and `%}` with logos, then reads the token list as one of
//! three header shapes: an opening tag (`diff language="js"`, `adr id=3 /`), a closing tag
//! (`/diff`) or an annotation (`#install .wide`). Anything else is malformed and the caller
//! keeps the source as literal text.

use crate::ast::Attributes;
use logos::Logos;
use serde_json::{Number, Value};
use std::ops::Range;

pub const TAG_OPEN: &str = "{%";
pub const TAG_CLOSE: &str = "%}";

/// Attribute key for a value written right after the tag name: `{% callout "tip" %}`.
pub const PRIMARY_ATTR: &str = "primary";

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TagToken {
    #[token("/")]
    Slash,
    #[token("=")]
    Equals,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape(lex.slice()))]
    Str(String),
    #[regex(r"#[A-Za-z0-9_\-]+", |lex| lex.slice()[1..].to_string())]
    IdShorthand(String),
    #[regex(r"\.[A-Za-z0-9_\-]+", |lex| lex.slice()[1..].to_string())]
    ClassShorthand(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl TagToken {
    /// The token as an attribute value, for tokens that can be one.
    fn as_value(&self) -> Option<Value> {
        match self {
            TagToken::True => Some(Value::Bool(true)),
            TagToken::False => Some(Value::Bool(false)),
            TagToken::Null => Some(Value::Null),
            TagToken::Number(n) => Some(number_value(*n)),
            TagToken::Str(s) => Some(Value::String(s.clone())),
            _ => None,
        }
    }
}

/// Strip the quotes and resolve backslash escapes.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Whole numbers stay integers so `id=3` serializes as `3`, not `3.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagHeader {
    Open {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    /// Attributes for the enclosing node, e.g. a heading id.
    Annotation { attributes: Attributes },
}

impl TagHeader {
    pub fn name(&self) -> Option<&str> {
        match self {
            TagHeader::Open { name, .. } | TagHeader::Close { name } => Some(name),
            TagHeader::Annotation { .. } => None,
        }
    }
}

fn tokenize(source: &str) -> Option<Vec<TagToken>> {
    TagToken::lexer(source).collect::<Result<Vec<_>, _>>().ok()
}

/// Read the inside of a `{% ... %}` tag. `None` means malformed.
pub fn parse_tag_header(inner: &str) -> Option<TagHeader> {
    let tokens = tokenize(inner)?;
    match tokens.as_slice() {
        [] => None,
        [TagToken::Slash, TagToken::Ident(name)] => Some(TagHeader::Close { name: name.clone() }),
        [TagToken::Ident(name), rest @ ..] if !matches!(rest.first(), Some(TagToken::Equals)) => {
            let (rest, self_closing) = match rest {
                [init @ .., TagToken::Slash] => (init, true),
                _ => (rest, false),
            };
            let (primary, rest) = match rest.split_first() {
                Some((first, tail)) => match first.as_value() {
                    Some(value) => (Some(value), tail),
                    None => (None, rest),
                },
                None => (None, rest),
            };
            let mut attributes = parse_attributes(rest)?;
            if let Some(value) = primary {
                attributes.insert(PRIMARY_ATTR.to_string(), value);
            }
            Some(TagHeader::Open {
                name: name.clone(),
                attributes,
                self_closing,
            })
        }
        _ => parse_attributes(&tokens).map(|attributes| TagHeader::Annotation { attributes }),
    }
}

fn parse_attributes(tokens: &[TagToken]) -> Option<Attributes> {
    let mut attributes = Attributes::new();
    let mut classes: Vec<String> = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            TagToken::IdShorthand(id) => {
                attributes.insert("id".to_string(), Value::String(id.clone()));
                i += 1;
            }
            TagToken::ClassShorthand(class) => {
                classes.push(class.clone());
                i += 1;
            }
            TagToken::Ident(key) => match tokens.get(i + 1) {
                Some(TagToken::Equals) => {
                    let value = tokens.get(i + 2).and_then(TagToken::as_value)?;
                    attributes.insert(key.clone(), value);
                    i += 3;
                }
                _ => {
                    // Bare flag
                    attributes.insert(key.clone(), Value::Bool(true));
                    i += 1;
                }
            },
            _ => return None,
        }
    }
    if !classes.is_empty() {
        attributes.insert("class".to_string(), Value::String(classes.join(" ")));
    }
    Some(attributes)
}

/// Find the next well-formed tag at or after `from`. Malformed `{% ... %}` runs are
/// skipped and stay part of the surrounding text.
pub fn next_tag(text: &str, from: usize) -> Option<(Range<usize>, TagHeader)> {
    let mut cursor = from;
    while let Some(offset) = text.get(cursor..)?.find(TAG_OPEN) {
        let start = cursor + offset;
        let inner_start = start + TAG_OPEN.len();
        let Some(inner_len) = text[inner_start..].find(TAG_CLOSE) else {
            return None;
        };
        let end = inner_start + inner_len + TAG_CLOSE.len();
        if let Some(header) = parse_tag_header(&text[inner_start..inner_start + inner_len]) {
            return Some((start..end, header));
        }
        tracing::trace!(source = &text[start..end], "malformed tag kept as text");
        cursor = inner_start;
    }
    None
}

/// The header of a line that is exactly one tag and nothing else.
pub fn whole_line_tag(line: &str) -> Option<TagHeader> {
    let trimmed = line.trim();
    let (range, header) = next_tag(trimmed, 0)?;
    (range.start == 0 && range.end == trimmed.len()).then_some(header)
}
