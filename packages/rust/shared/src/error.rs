//! Error types for the docs build.
//!
//! Library crates use [`DocBuildError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::fmt;
use std::path::PathBuf;

/// Top-level error type for all docbuild operations.
#[derive(Debug, thiserror::Error)]
pub enum DocBuildError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Front matter, NDJSON, or HTML parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The compiled document has no `h1` carrying the doc-title marker.
    #[error("Document missing h1#{marker} element")]
    MissingDocTitle { marker: String },

    /// One or more lexeme records failed validation.
    #[error("{0}")]
    Lexemes(LexemeViolations),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A per-document worker task failed to complete.
    #[error("task error: {0}")]
    Task(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocBuildError>;

impl DocBuildError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Missing doc-title error for the given marker id.
    pub fn missing_doc_title(marker: impl Into<String>) -> Self {
        Self::MissingDocTitle {
            marker: marker.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for DocBuildError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Lexeme violations
// ---------------------------------------------------------------------------

/// What was wrong with a single lexeme record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// `h1_inner_text` was null or empty.
    MissingH1 { link: String },
    /// `link` did not start with `/docs/`.
    InvalidLink { link: String },
    /// `context` was not one of the known values.
    InvalidContext { context: String },
}

/// A single validation failure, positioned in the aggregated lexeme sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexemeViolation {
    /// Zero-based index of the offending record.
    pub index: usize,
    pub kind: ViolationKind,
}

impl fmt::Display for LexemeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.index;
        match &self.kind {
            ViolationKind::MissingH1 { link } => {
                write!(f, "Lexeme {index}: Missing h1_inner_text (link: {link})")
            }
            ViolationKind::InvalidLink { link } => {
                write!(f, "Lexeme {index}: Link must start with /docs/ (got: {link})")
            }
            ViolationKind::InvalidContext { context } => write!(
                f,
                "Lexeme {index}: Invalid context value (got: {context}, expected one of: framework, library, global)"
            ),
        }
    }
}

/// Every violation found in one validation pass, in record order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexemeViolations(pub Vec<LexemeViolation>);

impl LexemeViolations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LexemeViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lexeme validation failed:\n")?;
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl From<LexemeViolations> for DocBuildError {
    fn from(v: LexemeViolations) -> Self {
        Self::Lexemes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocBuildError::config("jobs must be at least 1");
        assert_eq!(err.to_string(), "config error: jobs must be at least 1");

        let err = DocBuildError::missing_doc_title("doc-title");
        assert_eq!(err.to_string(), "Document missing h1#doc-title element");
    }

    #[test]
    fn violations_flatten_in_order() {
        let violations = LexemeViolations(vec![
            LexemeViolation {
                index: 0,
                kind: ViolationKind::MissingH1 {
                    link: "/docs/1.x/intro".into(),
                },
            },
            LexemeViolation {
                index: 3,
                kind: ViolationKind::InvalidContext {
                    context: "plugin".into(),
                },
            },
        ]);

        let err = DocBuildError::from(violations);
        assert_eq!(
            err.to_string(),
            "Lexeme validation failed:\n\
             Lexeme 0: Missing h1_inner_text (link: /docs/1.x/intro)\n\
             Lexeme 3: Invalid context value (got: plugin, expected one of: framework, library, global)"
        );
    }

    #[test]
    fn invalid_link_message() {
        let v = LexemeViolation {
            index: 7,
            kind: ViolationKind::InvalidLink {
                link: "docs/1.x/routing".into(),
            },
        };
        assert_eq!(
            v.to_string(),
            "Lexeme 7: Link must start with /docs/ (got: docs/1.x/routing)"
        );
    }
}
