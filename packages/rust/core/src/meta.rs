//! Per-document metadata for `meta.json`.

use scraper::Html;
use tracing::instrument;

use docbuild_markdown::doc_title_selector;
use docbuild_shared::{DOC_TITLE_ID, DocBuildError, DocMeta, Result};

/// One wrapped document to summarize.
#[derive(Debug, Clone, Copy)]
pub struct DocSource<'a> {
    /// Wrapped (`<body><main><article>`) HTML.
    pub html: &'a str,
    pub version: &'a str,
    pub slug: &'a str,
}

/// Generate one [`DocMeta`] per input, in order, using the `doc-title` marker.
pub fn generate(docs: &[DocSource<'_>]) -> Result<Vec<DocMeta>> {
    generate_with_marker(docs, DOC_TITLE_ID)
}

/// Like [`generate`] with a custom title marker.
///
/// Fails on the first document without an `h1` carrying `marker`.
#[instrument(skip_all, fields(docs = docs.len(), marker = %marker))]
pub fn generate_with_marker(docs: &[DocSource<'_>], marker: &str) -> Result<Vec<DocMeta>> {
    let selector = doc_title_selector(marker)?;

    docs.iter()
        .map(|doc| {
            let parsed = Html::parse_document(doc.html);
            let title = parsed
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .ok_or_else(|| DocBuildError::missing_doc_title(marker))?;

            Ok(DocMeta {
                version: doc.version.to_string(),
                slug: doc.slug.to_string(),
                title,
            })
        })
        .collect()
}
