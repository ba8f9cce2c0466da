//! Markdown-to-HTML compilation for documentation pages.
//!
//! Renders Markdown with `pulldown-cmark`, assigns anchor ids to headings,
//! and enforces the doc-title invariant: every compiled page carries an `h1`
//! whose `id` is the configured marker (`doc-title` by default).

mod frontmatter;
mod headings;

use pulldown_cmark::{Event, Options, Parser, html};
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

use docbuild_shared::{DocBuildError, MarkdownSection, Result};

pub use frontmatter::FrontMatter;
pub use headings::slugify;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of compiling one Markdown document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    /// The rendered HTML fragment (no body/main/article shell).
    pub html: String,
    /// Parsed front matter (default when the document has none).
    pub front_matter: FrontMatter,
}

/// Options for Markdown compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// `id` the title `h1` must carry.
    pub doc_title_id: String,
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::from(&MarkdownSection::default())
    }
}

impl From<&MarkdownSection> for CompileOptions {
    fn from(section: &MarkdownSection) -> Self {
        Self {
            doc_title_id: section.doc_title_id.clone(),
            tables: section.tables,
            footnotes: section.footnotes,
            strikethrough: section.strikethrough,
            tasklists: section.tasklists,
        }
    }
}

impl CompileOptions {
    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_HEADING_ATTRIBUTES;
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options
    }
}

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// Compile Markdown to an HTML fragment.
///
/// 1. Splits off YAML front matter
/// 2. Parses Markdown into events
/// 3. Assigns slug ids to headings without an explicit `{#id}`
/// 4. Renders HTML (raw HTML blocks pass through untouched)
/// 5. Fails with [`DocBuildError::MissingDocTitle`] when no `h1` carries the
///    doc-title marker
#[instrument(skip_all, fields(len = markdown.len()))]
pub fn compile(markdown: &str, opts: &CompileOptions) -> Result<CompiledDocument> {
    let (front_matter, body) = frontmatter::split(markdown)?;

    let mut events: Vec<Event> = Parser::new_ext(body, opts.parser_options()).collect();
    headings::assign_ids(&mut events);

    let mut rendered = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut rendered, events.into_iter());

    let titles = count_doc_titles(&rendered, &opts.doc_title_id)?;
    if titles == 0 {
        return Err(DocBuildError::missing_doc_title(&opts.doc_title_id));
    }
    if titles > 1 {
        warn!(count = titles, marker = %opts.doc_title_id, "multiple doc-title headings");
    }

    debug!(html_len = rendered.len(), context = ?front_matter.context, "markdown compiled");

    Ok(CompiledDocument {
        html: rendered,
        front_matter,
    })
}

/// Wrap a fragment in the `<body><main><article>` shell the extractor walks.
pub fn wrap_article(fragment: &str) -> String {
    format!("<body><main><article>{fragment}</article></main></body>")
}

/// Selector for `h1[id="<marker>"]`.
pub fn doc_title_selector(marker: &str) -> Result<Selector> {
    let escaped = marker.replace('\\', "\\\\").replace('"', "\\\"");
    Selector::parse(&format!("h1[id=\"{escaped}\"]"))
        .map_err(|e| DocBuildError::parse(format!("invalid doc-title marker '{marker}': {e}")))
}

fn count_doc_titles(fragment: &str, marker: &str) -> Result<usize> {
    let selector = doc_title_selector(marker)?;
    let doc = Html::parse_fragment(fragment);
    Ok(doc.select(&selector).count())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_default(markdown: &str) -> Result<CompiledDocument> {
        compile(markdown, &CompileOptions::default())
    }

    #[test]
    fn raw_html_title_passes_through() {
        let md = "<h1 id=\"doc-title\">Installation</h1>\n\n## System Requirements\n\nNode 18+.\n";
        let doc = compile_default(md).unwrap();
        assert!(doc.html.contains(r#"<h1 id="doc-title">Installation</h1>"#));
        assert!(doc.html.contains(r#"<h2 id="system-requirements">System Requirements</h2>"#));
        assert!(doc.html.contains("<p>Node 18+.</p>"));
    }

    #[test]
    fn heading_attribute_marks_title() {
        let doc = compile_default("# Routing {#doc-title}\n\nDefine routes.\n").unwrap();
        assert!(doc.html.contains(r#"<h1 id="doc-title">Routing</h1>"#));
    }

    #[test]
    fn plain_h1_without_marker_fails() {
        let err = compile_default("# Routing\n\nText.\n").unwrap_err();
        assert_eq!(err.to_string(), "Document missing h1#doc-title element");
    }

    #[test]
    fn wrong_marker_fails() {
        let err = compile_default("<h1 id=\"wrong-id\">X</h1>\n\nBody.\n").unwrap_err();
        assert!(matches!(err, DocBuildError::MissingDocTitle { .. }));
        assert!(err.to_string().contains("Document missing h1#doc-title element"));
    }

    #[test]
    fn doc_title_on_h2_does_not_count() {
        let err = compile_default("## Intro {#doc-title}\n").unwrap_err();
        assert!(matches!(err, DocBuildError::MissingDocTitle { .. }));
    }

    #[test]
    fn custom_marker() {
        let opts = CompileOptions {
            doc_title_id: "page-title".into(),
            ..CompileOptions::default()
        };
        assert!(compile("# Guide {#page-title}\n", &opts).is_ok());
        let err = compile("# Guide {#doc-title}\n", &opts).unwrap_err();
        assert_eq!(err.to_string(), "Document missing h1#page-title element");
    }

    #[test]
    fn front_matter_is_parsed_and_not_rendered() {
        let md = "---\ncontext: library\n---\n# Cache {#doc-title}\n\nText.\n";
        let doc = compile_default(md).unwrap();
        assert_eq!(doc.front_matter.context.as_deref(), Some("library"));
        assert!(!doc.html.contains("context: library"));
        assert!(!doc.html.contains("<hr"));
    }

    #[test]
    fn code_blocks_and_tables_render() {
        let md = "# API {#doc-title}\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let doc = compile_default(md).unwrap();
        assert!(doc.html.contains("<pre><code class=\"language-rust\">"));
        assert!(doc.html.contains("<table>"));
    }

    #[test]
    fn tables_can_be_disabled() {
        let opts = CompileOptions {
            tables: false,
            ..CompileOptions::default()
        };
        let md = "# API {#doc-title}\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let doc = compile(md, &opts).unwrap();
        assert!(!doc.html.contains("<table>"));
    }

    #[test]
    fn wrap_article_shell() {
        assert_eq!(
            wrap_article("<p>x</p>"),
            "<body><main><article><p>x</p></article></main></body>"
        );
    }
}
