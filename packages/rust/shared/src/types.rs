//! Core domain types for the search index and document metadata.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Every lexeme link must start with this prefix.
pub const DOCS_LINK_PREFIX: &str = "/docs/";

/// Default `id` attribute marking a document's title heading.
pub const DOC_TITLE_ID: &str = "doc-title";

// ---------------------------------------------------------------------------
// LexemeContext
// ---------------------------------------------------------------------------

/// Semantic scope of a documentation page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexemeContext {
    Framework,
    Library,
    #[default]
    Global,
}

impl LexemeContext {
    pub const ALL: [LexemeContext; 3] = [Self::Framework, Self::Library, Self::Global];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Framework => "framework",
            Self::Library => "library",
            Self::Global => "global",
        }
    }
}

impl std::fmt::Display for LexemeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LexemeContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown context '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// HtmlElementType
// ---------------------------------------------------------------------------

/// HTML elements that produce a lexeme record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlElementType {
    H1,
    H2,
    H3,
    H4,
    H5,
    P,
    Li,
    Blockquote,
}

impl HtmlElementType {
    /// Map a lowercase tag name to an element type. Returns `None` for tags
    /// that never produce records (`div`, `pre`, `h6`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "p" => Self::P,
            "li" => Self::Li,
            "blockquote" => Self::Blockquote,
            _ => return None,
        })
    }

    /// Heading level 1..=5, or `None` for content elements.
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::P | Self::Li | Self::Blockquote => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LexemeRecord
// ---------------------------------------------------------------------------

/// One searchable unit of text, one line of `lexemes.ndjson`.
///
/// `context` is kept as the raw string read from front matter or config so
/// that the validator can report values outside [`LexemeContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexemeRecord {
    /// Documentation version (e.g. `1.x`).
    pub version: String,
    /// `framework`, `library` or `global`.
    pub context: String,
    /// `/docs/{version}/{slug}` with an optional `#{anchor}`.
    pub link: String,
    /// Tag the text was extracted from.
    pub html_element_type: HtmlElementType,
    /// Flattened text content of the element.
    pub inner_text: String,
    pub h1_inner_text: Option<String>,
    pub h2_inner_text: Option<String>,
    pub h3_inner_text: Option<String>,
    pub h4_inner_text: Option<String>,
    pub h5_inner_text: Option<String>,
}

impl LexemeRecord {
    /// Heading text at `level` (1..=5).
    pub fn heading(&self, level: usize) -> Option<&str> {
        match level {
            1 => self.h1_inner_text.as_deref(),
            2 => self.h2_inner_text.as_deref(),
            3 => self.h3_inner_text.as_deref(),
            4 => self.h4_inner_text.as_deref(),
            5 => self.h5_inner_text.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DocMeta
// ---------------------------------------------------------------------------

/// Per-document summary written to `meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub version: String,
    pub slug: String,
    /// Text of the doc-title heading.
    pub title: String,
}

// ---------------------------------------------------------------------------
// BuildResult
// ---------------------------------------------------------------------------

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Number of Markdown documents compiled.
    pub documents_processed: usize,
    /// Number of lexeme records written.
    pub lexemes_generated: usize,
    /// Directory holding `{slug}.html` fragments.
    pub rendered_dir: PathBuf,
    /// Path of `lexemes.ndjson`.
    pub lexemes_path: PathBuf,
    /// Path of `meta.json`.
    pub meta_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> LexemeRecord {
        LexemeRecord {
            version: "1.x".into(),
            context: "global".into(),
            link: "/docs/1.x/installation#system-requirements".into(),
            html_element_type: HtmlElementType::P,
            inner_text: "You need Node 18.".into(),
            h1_inner_text: Some("Installation".into()),
            h2_inner_text: Some("System Requirements".into()),
            h3_inner_text: None,
            h4_inner_text: None,
            h5_inner_text: None,
        }
    }

    #[test]
    fn record_serializes_with_snake_case_fields_and_nulls() {
        let json = serde_json::to_value(sample_record()).expect("serialize");
        assert_eq!(json["html_element_type"], "p");
        assert_eq!(json["h2_inner_text"], "System Requirements");
        assert!(json["h3_inner_text"].is_null());
        assert!(json.as_object().unwrap().contains_key("h5_inner_text"));
    }

    #[test]
    fn meta_field_order() {
        let meta = DocMeta {
            version: "1.x".into(),
            slug: "routing".into(),
            title: "Routing".into(),
        };
        let json = serde_json::to_string(&meta).expect("serialize");
        assert_eq!(json, r#"{"version":"1.x","slug":"routing","title":"Routing"}"#);
    }

    #[test]
    fn context_parses_known_values_only() {
        assert_eq!("library".parse::<LexemeContext>(), Ok(LexemeContext::Library));
        assert!("Library".parse::<LexemeContext>().is_err());
        assert_eq!(LexemeContext::default().to_string(), "global");
    }

    #[test]
    fn element_type_from_tag() {
        assert_eq!(HtmlElementType::from_tag("h3"), Some(HtmlElementType::H3));
        assert_eq!(HtmlElementType::from_tag("blockquote"), Some(HtmlElementType::Blockquote));
        assert_eq!(HtmlElementType::from_tag("h6"), None);
        assert_eq!(HtmlElementType::from_tag("pre"), None);
        assert_eq!(HtmlElementType::H4.heading_level(), Some(4));
        assert_eq!(HtmlElementType::Li.heading_level(), None);
    }

    #[test]
    fn heading_accessor() {
        let record = sample_record();
        assert_eq!(record.heading(1), Some("Installation"));
        assert_eq!(record.heading(3), None);
        assert_eq!(record.heading(9), None);
    }
}
