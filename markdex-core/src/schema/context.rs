/// State carried through the transform of one document.
///
/// Generated heading ids are numbered from 1 in document order: `heading-1`, `heading-2`, ...
/// A fresh context starts the numbering again.
#[derive(Debug, Clone)]
pub struct RenderContext {
    heading_prefix: String,
    headings_generated: usize,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::with_heading_prefix("heading")
    }

    pub fn with_heading_prefix(prefix: impl Into<String>) -> Self {
        RenderContext {
            heading_prefix: prefix.into(),
            headings_generated: 0,
        }
    }

    /// Allocate the next generated heading id.
    pub fn next_heading_id(&mut self) -> String {
        self.headings_generated += 1;
        format!("{}-{}", self.heading_prefix, self.headings_generated)
    }

    pub fn headings_generated(&self) -> usize {
        self.headings_generated
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
