//! Shared types, error model, and configuration for the docs build.
//!
//! This crate is the foundation depended on by all other docbuild crates.
//! It provides:
//! - [`DocBuildError`]: the unified error type
//! - Domain types ([`LexemeRecord`], [`DocMeta`], [`BuildResult`])
//! - Configuration ([`DocsConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BuildConfig, BuildSection, CONFIG_FILE_NAME, DocsConfig, MarkdownSection, load_config_from,
    resolve_config,
};
pub use error::{DocBuildError, LexemeViolation, LexemeViolations, Result, ViolationKind};
pub use types::{
    BuildResult, DOC_TITLE_ID, DOCS_LINK_PREFIX, DocMeta, HtmlElementType, LexemeContext,
    LexemeRecord,
};
