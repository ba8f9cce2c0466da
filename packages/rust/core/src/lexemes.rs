//! Lexeme extraction: wrapped article HTML → flat searchable records.
//!
//! Walks the `<article>` subtree once in document order, keeping the most
//! recent heading text per level (h1..h5). Headings and `p`/`li`/`blockquote`
//! elements each produce one [`LexemeRecord`] stamped with that context.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument};

use docbuild_shared::{DOCS_LINK_PREFIX, HtmlElementType, LexemeRecord};

static ARTICLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("valid selector"));

/// Base link for a document: `/docs/{version}/{slug}`.
pub fn doc_link(version: &str, slug: &str) -> String {
    format!("{DOCS_LINK_PREFIX}{version}/{slug}")
}

/// Extract lexeme records from one document's wrapped HTML.
///
/// `context` is stamped verbatim on every record; it comes from the
/// document's front matter or the build default.
#[instrument(skip(html), fields(html_len = html.len()))]
pub fn extract(html: &str, version: &str, slug: &str, context: &str) -> Vec<LexemeRecord> {
    let doc = Html::parse_document(html);
    let root = doc
        .select(&ARTICLE_SEL)
        .next()
        .unwrap_or_else(|| doc.root_element());

    let base_link = doc_link(version, slug);
    let mut headings = HeadingContext::default();
    let mut records = Vec::new();

    for node in root.descendants() {
        let Node::Element(element) = node.value() else {
            continue;
        };
        let Some(kind) = HtmlElementType::from_tag(element.name()) else {
            continue;
        };
        let Some(element_ref) = ElementRef::wrap(node) else {
            continue;
        };

        let text = flatten_text(&element_ref);

        if let Some(level) = kind.heading_level() {
            let id = element.id().filter(|id| !id.is_empty());
            headings.enter(level, &text, id);
        }

        records.push(headings.record(kind, text, &base_link, version, context));
    }

    debug!(records = records.len(), "lexemes extracted");
    records
}

/// Text content of an element with whitespace runs collapsed.
fn flatten_text(element: &ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Heading register
// ---------------------------------------------------------------------------

/// Running per-document heading state.
#[derive(Debug, Default)]
struct HeadingContext {
    /// Slot `i` holds the text of the latest `h{i+1}`.
    levels: [Option<String>; 5],
    /// `id` of the most recently seen heading of any level.
    anchor: Option<String>,
}

impl HeadingContext {
    /// Record a heading at `level` (1..=5), clearing every deeper level.
    fn enter(&mut self, level: usize, text: &str, id: Option<&str>) {
        let slot = level - 1;
        self.levels[slot] = Some(text.to_string());
        for deeper in &mut self.levels[slot + 1..] {
            *deeper = None;
        }
        self.anchor = id.map(str::to_string);
    }

    fn record(
        &self,
        kind: HtmlElementType,
        inner_text: String,
        base_link: &str,
        version: &str,
        context: &str,
    ) -> LexemeRecord {
        let link = match &self.anchor {
            Some(anchor) => format!("{base_link}#{anchor}"),
            None => base_link.to_string(),
        };
        let [h1, h2, h3, h4, h5] = self.levels.clone();

        LexemeRecord {
            version: version.to_string(),
            context: context.to_string(),
            link,
            html_element_type: kind,
            inner_text,
            h1_inner_text: h1,
            h2_inner_text: h2,
            h3_inner_text: h3,
            h4_inner_text: h4,
            h5_inner_text: h5,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
