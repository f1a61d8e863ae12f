//! Page loading
//!
//!     Walks a documentation root and turns every page file into a [Page]. Walking uses the
//!     `ignore` crate, so `.gitignore` and `.ignore` files are honoured (unless turned off
//!     in [LoaderOptions]) and hidden files are skipped.
//!
//! Routes
//!
//!     A page's route is its path relative to the root, without extension, with a leading
//!     `/`. An `index` file stands for its directory:
//!
//!     index.md          ->  /
//!     guide/intro.md    ->  /guide/intro
//!     guide/index.mdoc  ->  /guide
//!
//! Titles
//!
//!     The frontmatter `title` wins, then the text of the first level-1 heading, then the
//!     file stem.

use crate::extraction::extract_text;
use crate::page::Page;
use crate::reader::{parse_document, Document, ReadError};
use ignore::WalkBuilder;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};

const INDEX_STEM: &str = "index";

#[derive(Debug)]
pub enum LoadError {
    /// IO error when reading a file or the root
    Io(String),
    /// Error while walking the directory tree
    Walk(String),
    /// A page could not be read
    Read { path: PathBuf, source: ReadError },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "IO error: {}", msg),
            LoadError::Walk(msg) => write!(f, "Walk error: {}", msg),
            LoadError::Read { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

impl From<ignore::Error> for LoadError {
    fn from(err: ignore::Error) -> Self {
        LoadError::Walk(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// File extensions that count as pages, without the dot
    pub extensions: Vec<String>,
    pub respect_ignore_files: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            extensions: vec!["md".to_string(), "mdoc".to_string()],
            respect_ignore_files: true,
        }
    }
}

pub struct PageLoader {
    root: PathBuf,
    options: LoaderOptions,
}

impl PageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PageLoader {
            root: root.into(),
            options: LoaderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every page under the root, sorted by route. Pages whose frontmatter cannot be
    /// read are logged and left out; I/O and walk errors still fail the load.
    pub fn load(&self) -> Result<Vec<Page>, LoadError> {
        if !self.root.is_dir() {
            return Err(LoadError::Io(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let respect = self.options.respect_ignore_files;
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .ignore(respect)
            .git_ignore(respect)
            .git_exclude(respect)
            .git_global(respect)
            .parents(respect)
            .require_git(false)
            .build();

        let mut pages = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if !self.is_page(entry.path()) {
                tracing::trace!(path = %entry.path().display(), "skipping non-page file");
                continue;
            }
            match self.load_file(entry.path()) {
                Ok(page) => pages.push(page),
                Err(LoadError::Read { path, source }) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %source,
                        "skipping unreadable page"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        pages.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %self.root.display(), count = pages.len(), "loaded pages");
        Ok(pages)
    }

    /// Load one page file. Its route is computed relative to the loader root.
    pub fn load_file(&self, path: &Path) -> Result<Page, LoadError> {
        let source = fs::read_to_string(path)?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        page_from_source(route_for(relative), &stem, source).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn is_page(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.options
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// Route for a page file, given its path relative to the docs root.
pub fn route_for(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(last);
        if stem != INDEX_STEM {
            segments.push(stem);
        }
    }
    format!("/{}", segments.join("/"))
}

/// Build a page from its source, resolving the title.
pub fn page_from_source(
    route: String,
    stem: &str,
    source: String,
) -> Result<Page, ReadError> {
    let document = parse_document(&source)?;
    let title = resolve_title(&document).unwrap_or_else(|| stem.to_string());
    Ok(Page::new(route, title, source))
}

fn resolve_title(document: &Document) -> Option<String> {
    if let Some(title) = document.frontmatter.title.as_deref() {
        let title = title.trim();
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }
    document
        .blocks()
        .iter()
        .filter_map(|block| block.as_tag())
        .find(|tag| tag.kind == "heading" && tag.attributes.get("level") == Some(&Value::from(1)))
        .map(|heading| {
            heading
                .children
                .iter()
                .map(extract_text)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[rstest]
    #[case("index.md", "/")]
    #[case("intro.md", "/intro")]
    #[case("guide/intro.md", "/guide/intro")]
    #[case("guide/index.mdoc", "/guide")]
    #[case("a/b/c.md", "/a/b/c")]
    fn test_route_for(#[case] relative: &str, #[case] expected: &str) {
        assert_eq!(route_for(Path::new(relative)), expected);
    }

    #[test]
    fn test_title_resolution() {
        let page = page_from_source("/a".into(), "a", "---\ntitle: From YAML\n---\n# Heading\n".into())
            .unwrap();
        assert_eq!(page.title, "From YAML");

        let page = page_from_source("/a".into(), "a", "## Sub\n# Main Title\n".into()).unwrap();
        assert_eq!(page.title, "Main Title");

        let page = page_from_source("/a".into(), "a", "no headings".into()).unwrap();
        assert_eq!(page.title, "a");
    }

    #[test]
    fn test_load_sorted_pages() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.md", "# Home\n");
        write(&dir, "guide/setup.md", "# Setup\n");
        write(&dir, "guide/intro.mdoc", "# Intro\n");
        write(&dir, "notes.txt", "not a page");

        let pages = PageLoader::new(dir.path()).load().unwrap();
        let routes: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(routes, vec!["/", "/guide/intro", "/guide/setup"]);
        assert_eq!(pages[0].title, "Home");
        assert_eq!(pages[0].content, "# Home\n");
    }

    #[test]
    fn test_ignore_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".ignore", "drafts/\n");
        write(&dir, "page.md", "# Page\n");
        write(&dir, "drafts/wip.md", "# WIP\n");

        let pages = PageLoader::new(dir.path()).load().unwrap();
        assert_eq!(pages.len(), 1);

        let options = LoaderOptions {
            respect_ignore_files: false,
            ..LoaderOptions::default()
        };
        let pages = PageLoader::new(dir.path()).with_options(options).load().unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", "a");
        write(&dir, "b.markdown", "b");

        let options = LoaderOptions {
            extensions: vec!["markdown".to_string()],
            respect_ignore_files: true,
        };
        let pages = PageLoader::new(dir.path()).with_options(options).load().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path, "/b");
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = PageLoader::new(dir.path().join("missing")).load().unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_bad_frontmatter_names_the_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bad.md", "---\ntitle: [\n---\n");
        let loader = PageLoader::new(dir.path());
        let err = loader.load_file(&dir.path().join("bad.md")).unwrap_err();
        match err {
            LoadError::Read { path, .. } => assert!(path.ends_with("bad.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_page_does_not_stop_the_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", "[x](/b)\n");
        write(&dir, "b.md", "---\ntitle: [a, b]\n---\n# Bee\n");
        write(&dir, "c.md", "---\ntitle: [\n---\n");

        let pages = PageLoader::new(dir.path()).load().unwrap();
        let routes: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(routes, vec!["/a", "/b"]);
        assert_eq!(pages[1].title, "Bee");
    }
}
