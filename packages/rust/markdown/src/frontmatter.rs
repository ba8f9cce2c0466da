//! Leading YAML front matter.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use docbuild_shared::{DocBuildError, Result};

/// Keys recognized in a document's front matter. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    /// Overrides the build's default lexeme context.
    #[serde(default)]
    pub context: Option<String>,
}

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").expect("valid regex")
});

/// Split a document into its front matter and Markdown body.
///
/// Documents without a leading `---` block get default front matter and the
/// full text as body.
pub fn split(source: &str) -> Result<(FrontMatter, &str)> {
    let Some(caps) = FRONTMATTER_RE.captures(source) else {
        return Ok((FrontMatter::default(), source));
    };

    let whole = caps.get(0).map_or(0, |m| m.end());
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    let body = &source[whole..];

    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let front_matter: FrontMatter = serde_yaml::from_str(yaml)
        .map_err(|e| DocBuildError::parse(format!("invalid front matter: {e}")))?;

    Ok((front_matter, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_front_matter() {
        let src = "# Hello\n\nText.\n";
        let (fm, body) = split(src).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, src);
    }

    #[test]
    fn context_is_read_and_block_stripped() {
        let src = "---\ncontext: framework\nauthor: someone\n---\n# Routing\n";
        let (fm, body) = split(src).unwrap();
        assert_eq!(fm.context.as_deref(), Some("framework"));
        assert_eq!(body, "# Routing\n");
    }

    #[test]
    fn empty_block() {
        let (fm, body) = split("---\n\n---\nBody").unwrap();
        assert!(fm.context.is_none());
        assert_eq!(body, "Body");
    }

    #[test]
    fn adjacent_delimiters_are_stripped() {
        let (fm, body) = split("---\n---\n# T {#doc-title}\n").unwrap();
        assert!(fm.context.is_none());
        assert_eq!(body, "# T {#doc-title}\n");
    }

    #[test]
    fn thematic_break_later_in_document_is_not_front_matter() {
        let src = "# Title\n\n---\n\nMore\n";
        let (fm, body) = split(src).unwrap();
        assert!(fm.context.is_none());
        assert_eq!(body, src);
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = split("---\ncontext: [unclosed\n---\n# T\n").unwrap_err();
        assert!(matches!(err, DocBuildError::Parse { .. }));
        assert!(err.to_string().contains("front matter"));
    }
}
