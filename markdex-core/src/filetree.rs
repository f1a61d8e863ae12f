//! File tree parsing
//!
//!     Turns the indentation-shaped text of a file tree block into nested folders and files:
//!
//!     src/
//!       components/
//!         Button.tsx
//!       utils/
//!         helpers.ts
//!
//!     A trailing `/` marks a folder. Nesting is decided by the raw count of leading
//!     whitespace characters, not by an assumed indent width, so irregular indentation (three
//!     spaces, a stray tab) still nests by relative depth.
//!
//! Algorithm
//!
//!     Keep a stack of open folders with the indentation they were seen at. For each line:
//!
//!     1. Pop every open folder whose indentation is >= the line's. Equal indentation means
//!        sibling, never child.
//!     2. Attach the entry to the folder left on top, or make it a root if none is left.
//!     3. Push the entry if it is a folder. Files never get children.
//!
//!     Parsing is lenient: blank lines are skipped and an over-indented line with no open
//!     folder above it simply becomes a root.

use serde::Serialize;

/// A file or folder. Folders always carry a (possibly empty) child list, files never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    name: String,
    is_folder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>) -> Self {
        TreeNode {
            name: name.into(),
            is_folder: false,
            children: None,
        }
    }

    pub fn folder(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            name: name.into(),
            is_folder: true,
            children: Some(children),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    /// Child entries. `None` for files, `Some` (possibly empty) for folders.
    pub fn children(&self) -> Option<&[TreeNode]> {
        self.children.as_deref()
    }
}

/// Flat storage used while parsing, children refer to other entries by index.
struct Entry {
    name: String,
    is_folder: bool,
    children: Vec<usize>,
}

struct OpenFolder {
    entry: usize,
    indent: usize,
}

/// Parse indentation-shaped text into a forest of [TreeNode]s.
pub fn parse_tree(text: &str) -> Vec<TreeNode> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut stack: Vec<OpenFolder> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        let (name, is_folder) = match trimmed.strip_suffix('/') {
            Some(name) => (name, true),
            None => (trimmed, false),
        };

        while stack.last().is_some_and(|open| open.indent >= indent) {
            stack.pop();
        }

        let id = entries.len();
        entries.push(Entry {
            name: name.to_string(),
            is_folder,
            children: Vec::new(),
        });
        match stack.last() {
            Some(parent) => entries[parent.entry].children.push(id),
            None => roots.push(id),
        }

        if is_folder {
            stack.push(OpenFolder { entry: id, indent });
        }
    }

    roots.into_iter().map(|id| build(&entries, id)).collect()
}

fn build(entries: &[Entry], id: usize) -> TreeNode {
    let entry = &entries[id];
    if entry.is_folder {
        let children = entry
            .children
            .iter()
            .map(|&child| build(entries, child))
            .collect();
        TreeNode::folder(entry.name.clone(), children)
    } else {
        TreeNode::file(entry.name.clone())
    }
}

/// Draw a parsed forest with box-drawing connectors, folders keep their trailing `/`.
pub fn render_tree(roots: &[TreeNode]) -> String {
    let mut out = String::new();
    for root in roots {
        out.push_str(&display_name(root));
        out.push('\n');
        if let Some(children) = root.children() {
            render_children(children, "", &mut out);
        }
    }
    out
}

fn render_children(children: &[TreeNode], prefix: &str, out: &mut String) {
    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == children.len();
        let (connector, continuation) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&display_name(child));
        out.push('\n');
        if let Some(grandchildren) = child.children() {
            render_children(grandchildren, &format!("{prefix}{continuation}"), out);
        }
    }
}

fn display_name(node: &TreeNode) -> String {
    if node.is_folder() {
        format!("{}/", node.name())
    } else {
        node.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_folders() {
        let tree = parse_tree(
            "src/\n  components/\n    Button.tsx\n  utils/\n    helpers.ts\n",
        );

        assert_eq!(
            tree,
            vec![TreeNode::folder(
                "src",
                vec![
                    TreeNode::folder("components", vec![TreeNode::file("Button.tsx")]),
                    TreeNode::folder("utils", vec![TreeNode::file("helpers.ts")]),
                ],
            )]
        );
        let src = &tree[0];
        assert!(src.is_folder());
        let button = &src.children().unwrap()[0].children().unwrap()[0];
        assert!(!button.is_folder());
        assert_eq!(button.children(), None);
    }

    #[test]
    fn test_equal_indentation_makes_siblings() {
        let tree = parse_tree("a/\n  b/\n  c/\n");

        assert_eq!(
            tree,
            vec![TreeNode::folder(
                "a",
                vec![TreeNode::folder("b", vec![]), TreeNode::folder("c", vec![])],
            )]
        );
        assert_eq!(tree[0].children().unwrap()[0].children(), Some(&[][..]));
    }

    #[test]
    fn test_dedent_returns_to_outer_folder() {
        let tree = parse_tree("a/\n  b/\n    deep.txt\n  shallow.txt\ntop.txt\n");

        assert_eq!(
            tree,
            vec![
                TreeNode::folder(
                    "a",
                    vec![
                        TreeNode::folder("b", vec![TreeNode::file("deep.txt")]),
                        TreeNode::file("shallow.txt"),
                    ],
                ),
                TreeNode::file("top.txt"),
            ]
        );
    }

    #[test]
    fn test_files_never_take_children() {
        let tree = parse_tree("readme.md\n  nested.md\n");
        assert_eq!(
            tree,
            vec![TreeNode::file("readme.md"), TreeNode::file("nested.md")]
        );
    }

    #[test]
    fn test_orphan_indentation_becomes_root() {
        let tree = parse_tree("    lonely.txt\n");
        assert_eq!(tree, vec![TreeNode::file("lonely.txt")]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let tree = parse_tree("\ndocs/\n\n   \n  intro.md\n\n");
        assert_eq!(
            tree,
            vec![TreeNode::folder("docs", vec![TreeNode::file("intro.md")])]
        );
    }

    #[test]
    fn test_irregular_indentation_nests_by_relative_depth() {
        // 3 then 5 spaces: still two levels
        let tree = parse_tree("root/\n   mid/\n     leaf\n   other\n");
        assert_eq!(
            tree,
            vec![TreeNode::folder(
                "root",
                vec![
                    TreeNode::folder("mid", vec![TreeNode::file("leaf")]),
                    TreeNode::file("other"),
                ],
            )]
        );
    }

    #[test]
    fn test_tabs_count_as_indentation() {
        let tree = parse_tree("a/\n\tb.txt\n");
        assert_eq!(
            tree,
            vec![TreeNode::folder("a", vec![TreeNode::file("b.txt")])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tree("").is_empty());
        assert!(parse_tree("\n  \n").is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let tree = parse_tree("a/\n  b\n");
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "a", "isFolder": true, "children": [
                    {"name": "b", "isFolder": false}
                ]}
            ])
        );
    }

    #[test]
    fn test_render_tree() {
        let tree = parse_tree("src/\n  components/\n    Button.tsx\n  utils/\n    helpers.ts\nCargo.toml\n");
        insta::assert_snapshot!(render_tree(&tree), @r###"
src/
├── components/
│   └── Button.tsx
└── utils/
    └── helpers.ts
Cargo.toml
"###);
    }
}
