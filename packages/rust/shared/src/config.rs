//! Build configuration.
//!
//! An optional `build-docs.toml` lives in the source directory (or is passed
//! with `--config`). CLI flags override config file values, which override
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocBuildError, Result};
use crate::types::{DOC_TITLE_ID, LexemeContext};

/// Config file looked up in the source directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "build-docs.toml";

// ---------------------------------------------------------------------------
// Config structs (matching build-docs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level config file, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Source discovery and pipeline settings.
    #[serde(default)]
    pub build: BuildSection,

    /// Markdown rendering settings.
    #[serde(default)]
    pub markdown: MarkdownSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Markdown file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Context used when a document's front matter has none.
    #[serde(default = "default_context")]
    pub default_context: String,

    /// Number of documents processed concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            default_context: default_context(),
            jobs: default_jobs(),
        }
    }
}

fn default_extension() -> String {
    "md".into()
}
fn default_context() -> String {
    LexemeContext::Global.as_str().into()
}
fn default_jobs() -> usize {
    1
}

/// `[markdown]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownSection {
    /// `id` the title `h1` must carry.
    #[serde(default = "default_doc_title_id")]
    pub doc_title_id: String,

    #[serde(default = "default_true")]
    pub tables: bool,

    #[serde(default = "default_true")]
    pub footnotes: bool,

    #[serde(default = "default_true")]
    pub strikethrough: bool,

    #[serde(default = "default_true")]
    pub tasklists: bool,
}

impl Default for MarkdownSection {
    fn default() -> Self {
        Self {
            doc_title_id: default_doc_title_id(),
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}

fn default_doc_title_id() -> String {
    DOC_TITLE_ID.into()
}
fn default_true() -> bool {
    true
}

impl DocsConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.build.jobs == 0 {
            return Err(DocBuildError::config("build.jobs must be at least 1"));
        }
        if self.build.extension.trim_start_matches('.').is_empty() {
            return Err(DocBuildError::config("build.extension must not be empty"));
        }
        if self.build.default_context.parse::<LexemeContext>().is_err() {
            return Err(DocBuildError::config(format!(
                "build.default_context must be one of framework, library, global (got: {})",
                self.build.default_context
            )));
        }
        if self.markdown.doc_title_id.is_empty() {
            return Err(DocBuildError::config("markdown.doc_title_id must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime build configuration, merged from config file + CLI arguments.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory containing the Markdown sources.
    pub source_dir: PathBuf,
    /// Directory receiving `rendered/`, `search/` and `meta.json`.
    pub output_dir: PathBuf,
    /// Documentation version stamped on every record.
    pub version: String,
    /// Markdown file extension, without the dot.
    pub extension: String,
    /// Context for documents without a `context` front matter key.
    pub default_context: String,
    /// Concurrent document workers.
    pub jobs: usize,
    /// Markdown rendering settings.
    pub markdown: MarkdownSection,
}

impl BuildConfig {
    /// Merge the file config with the three positional arguments.
    pub fn new(
        config: &DocsConfig,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            version: version.into(),
            extension: config.build.extension.trim_start_matches('.').to_string(),
            default_context: config.build.default_context.clone(),
            jobs: config.build.jobs,
            markdown: config.markdown.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from an explicit path, else `<source_dir>/build-docs.toml`,
/// else defaults.
pub fn resolve_config(explicit: Option<&Path>, source_dir: &Path) -> Result<DocsConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let path = source_dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                load_config_from(&path)?
            } else {
                tracing::debug!(?path, "config file not found, using defaults");
                DocsConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocsConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocBuildError::io(path, e))?;

    let config: DocsConfig = toml::from_str(&content).map_err(|e| {
        DocBuildError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::debug!(?path, "loaded config file");
    Ok(config)
}
