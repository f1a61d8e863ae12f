//! A documentation page as seen by cross-page passes.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Site route, e.g. `/guide/intro`.
    pub path: String,
    pub title: String,
    /// Raw page source.
    #[serde(skip)]
    pub content: String,
}

impl Page {
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Page {
            path: path.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}
