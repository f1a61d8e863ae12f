//! CLI commands
//!
//! Each command takes its inputs plus the loaded configuration and returns the text to
//! print. Errors come back as messages; `main` decides how to report them.

use markdex_config::MarkdexConfig;
use markdex_core::extraction::extract_rendered_text_with;
use markdex_core::filetree::render_tree;
use markdex_core::{
    collect_diffs, collect_headings, extract_links_with, extract_text, format_tag,
    parse_document, parse_tree, sort_tags_desc, BacklinkIndex, Document, PageLoader,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

fn read_source(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))
}

fn read_document(path: &Path) -> Result<Document, String> {
    let source = read_source(path)?;
    parse_document(&source).map_err(|e| format!("{}: {}", path.display(), e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}

/// Plain text of a page, from the parsed tree or from the rendered one.
pub fn text(path: &Path, rendered: bool, config: &MarkdexConfig) -> Result<String, String> {
    let document = read_document(path)?;
    if rendered {
        let tree = config.render.transformer().transform_document(&document.root);
        Ok(extract_rendered_text_with(&tree, &config.render.paragraph_name))
    } else {
        Ok(extract_text(&document.root))
    }
}

/// Page outline as JSON.
pub fn toc(path: &Path, config: &MarkdexConfig) -> Result<String, String> {
    let document = read_document(path)?;
    let tree = config.render.transformer().transform_document(&document.root);
    to_json(&collect_headings(&tree))
}

/// Resolved text of every diff in a page, as JSON.
pub fn diff(path: &Path, config: &MarkdexConfig) -> Result<String, String> {
    let document = read_document(path)?;
    to_json(&collect_diffs(&document.root, &config.render.transformer()))
}

/// Parse a file tree listing and draw it, or dump it as JSON.
pub fn tree(path: &Path, json: bool) -> Result<String, String> {
    let roots = parse_tree(&read_source(path)?);
    if json {
        to_json(&roots)
    } else {
        Ok(render_tree(&roots))
    }
}

/// Internal links of a page, as written.
pub fn links(path: &Path, config: &MarkdexConfig) -> Result<String, String> {
    let source = read_source(path)?;
    to_json(&extract_links_with(&source, &config.links.rules()))
}

/// Backlink index of a docs directory, or the bucket for one route.
pub fn backlinks(
    root: Option<&Path>,
    route: Option<&str>,
    config: &MarkdexConfig,
) -> Result<String, String> {
    let root = root.unwrap_or(config.docs.root.as_path());
    let pages = PageLoader::new(root)
        .with_options(config.docs.loader_options())
        .load()
        .map_err(|e| e.to_string())?;
    let index = BacklinkIndex::build_with(&pages, &config.links.rules());
    match route {
        Some(route) => to_json(index.get(route)),
        None => to_json(&index),
    }
}

/// Tags newest first, one per line, in canonical form.
pub fn versions(tags: &[String]) -> Result<String, String> {
    if tags.is_empty() {
        return Err("no tags given".to_string());
    }
    let lines: Vec<String> = sort_tags_desc(tags)
        .iter()
        .map(|tag| format_tag(tag))
        .collect();
    Ok(lines.join("\n"))
}
