//! Shared configuration loader for markdex.
//!
//! `defaults/markdex.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MarkdexConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use markdex_core::{LinkRules, LoaderOptions, Transformer};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/markdex.default.toml");

/// Top-level configuration consumed by markdex applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdexConfig {
    pub docs: DocsConfig,
    pub links: LinksConfig,
    pub render: RenderConfig,
}

/// Where pages live and which files count as pages.
#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub respect_ignore_files: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinksConfig {
    pub markdown_prefixes: Vec<String>,
    pub diagram_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub paragraph_name: String,
    pub heading_id_prefix: String,
}

impl DocsConfig {
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            extensions: self.extensions.clone(),
            respect_ignore_files: self.respect_ignore_files,
        }
    }
}

impl LinksConfig {
    pub fn rules(&self) -> LinkRules {
        LinkRules {
            markdown_prefixes: self.markdown_prefixes.clone(),
            diagram_prefixes: self.diagram_prefixes.clone(),
        }
    }
}

impl RenderConfig {
    /// A transformer with the default schemas and the configured heading prefix.
    pub fn transformer(&self) -> Transformer {
        Transformer::default().with_heading_prefix(self.heading_id_prefix.clone())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MarkdexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MarkdexConfig, ConfigError> {
    Loader::new().build()
}
