//! End-to-end build pipeline: Markdown sources → rendered HTML + search index + metadata.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use docbuild_markdown::{CompileOptions, wrap_article};
use docbuild_shared::{
    BuildConfig, BuildResult, DocBuildError, DocMeta, DocsConfig, LexemeRecord, Result,
};

use crate::assembler::OutputLayout;
use crate::meta::{self, DocSource};
use crate::{lexemes, ndjson, validate};

/// Progress callback for reporting build status.
pub trait BuildProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a document finished compiling and extracting.
    fn document_done(&self, slug: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl BuildProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_done(&self, _slug: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// A Markdown file selected for the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File stem, used in links and output names.
    pub slug: String,
    pub path: PathBuf,
}

/// Everything one document contributes to the build.
#[derive(Debug)]
struct ProcessedDocument {
    lexemes: Vec<LexemeRecord>,
    meta: DocMeta,
}

/// Per-build settings shared by every document worker.
#[derive(Debug)]
struct DocumentJob {
    version: String,
    default_context: String,
    compile: CompileOptions,
    layout: OutputLayout,
}

/// Build with default configuration.
pub async fn build(source_dir: &Path, output_dir: &Path, version: &str) -> Result<BuildResult> {
    let config = BuildConfig::new(&DocsConfig::default(), source_dir, output_dir, version);
    build_docs(&config, &SilentProgress).await
}

/// Run the full build.
///
/// 1. Discover Markdown sources (sorted by file name)
/// 2. Per document: compile → wrap → extract lexemes → metadata → write fragment
/// 3. Validate the aggregated lexemes once every document has completed
/// 4. Write `search/lexemes.ndjson` and `meta.json`
#[instrument(skip_all, fields(source = %config.source_dir.display(), version = %config.version))]
pub async fn build_docs(config: &BuildConfig, progress: &dyn BuildProgress) -> Result<BuildResult> {
    let start = Instant::now();

    if config.jobs == 0 {
        return Err(DocBuildError::config("jobs must be at least 1"));
    }

    // --- Phase 1: Discover ---
    progress.phase("Discovering sources");
    let sources = discover_sources(&config.source_dir, &config.extension)?;
    info!(documents = sources.len(), jobs = config.jobs, "starting docs build");

    let layout = OutputLayout::new(&config.output_dir);
    layout.create_dirs()?;

    let job = Arc::new(DocumentJob {
        version: config.version.clone(),
        default_context: config.default_context.clone(),
        compile: CompileOptions::from(&config.markdown),
        layout: layout.clone(),
    });

    // --- Phase 2: Compile & extract ---
    progress.phase("Compiling documents");
    let processed = if config.jobs == 1 {
        process_sequential(&sources, &job, progress)?
    } else {
        process_parallel(&sources, &job, config.jobs, progress).await?
    };

    let mut all_lexemes: Vec<LexemeRecord> = Vec::new();
    let mut all_meta: Vec<DocMeta> = Vec::with_capacity(processed.len());
    for doc in processed {
        all_lexemes.extend(doc.lexemes);
        all_meta.push(doc.meta);
    }

    // --- Phase 3: Validate ---
    progress.phase("Validating lexemes");
    validate::validate(&all_lexemes)?;

    // --- Phase 4: Write index + metadata ---
    progress.phase("Writing search index");
    ndjson::write_ndjson(&all_lexemes, &layout.lexemes_path)?;
    layout.write_meta(&all_meta)?;

    let result = BuildResult {
        documents_processed: all_meta.len(),
        lexemes_generated: all_lexemes.len(),
        rendered_dir: layout.rendered_dir,
        lexemes_path: layout.lexemes_path,
        meta_path: layout.meta_path,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        documents = result.documents_processed,
        lexemes = result.lexemes_generated,
        elapsed_ms = result.elapsed.as_millis(),
        "docs build complete"
    );

    Ok(result)
}

/// List files in `dir` with the given extension, sorted by file name.
pub fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<SourceDocument>> {
    let entries = std::fs::read_dir(dir).map_err(|e| DocBuildError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DocBuildError::io(dir, e))?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != extension) {
            continue;
        }
        let Some(stem) = path.file_stem() else {
            continue;
        };
        sources.push(SourceDocument {
            slug: stem.to_string_lossy().into_owned(),
            path,
        });
    }

    sources.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!(count = sources.len(), "sources discovered");
    Ok(sources)
}

// ---------------------------------------------------------------------------
// Per-document work
// ---------------------------------------------------------------------------

/// Compile, extract and persist a single document.
fn process_document(source: &SourceDocument, job: &DocumentJob) -> Result<ProcessedDocument> {
    let markdown =
        std::fs::read_to_string(&source.path).map_err(|e| DocBuildError::io(&source.path, e))?;

    let compiled = docbuild_markdown::compile(&markdown, &job.compile)
        .inspect_err(|e| {
            tracing::error!(slug = %source.slug, error = %e, "compilation failed");
        })
        .map_err(|e| match e {
            DocBuildError::Parse { message } => {
                DocBuildError::parse(format!("{}: {message}", source.path.display()))
            }
            other => other,
        })?;
    let wrapped = wrap_article(&compiled.html);

    let context = compiled
        .front_matter
        .context
        .as_deref()
        .unwrap_or(&job.default_context);
    let lexemes = lexemes::extract(&wrapped, &job.version, &source.slug, context);

    let meta = meta::generate_with_marker(
        &[DocSource {
            html: &wrapped,
            version: &job.version,
            slug: &source.slug,
        }],
        &job.compile.doc_title_id,
    )?
    .pop()
    .ok_or_else(|| DocBuildError::missing_doc_title(&job.compile.doc_title_id))?;

    job.layout.write_rendered(&source.slug, &compiled.html)?;

    debug!(slug = %source.slug, lexemes = lexemes.len(), title = %meta.title, "document processed");
    Ok(ProcessedDocument { lexemes, meta })
}

fn process_sequential(
    sources: &[SourceDocument],
    job: &DocumentJob,
    progress: &dyn BuildProgress,
) -> Result<Vec<ProcessedDocument>> {
    let total = sources.len();
    let mut processed = Vec::with_capacity(total);

    for (i, source) in sources.iter().enumerate() {
        processed.push(process_document(source, job)?);
        progress.document_done(&source.slug, i + 1, total);
    }

    Ok(processed)
}

/// Process documents on blocking tasks, at most `jobs` at a time.
///
/// Results are merged by document index so output matches a sequential run.
/// After a failure, documents later in source order are skipped once they
/// reach the pool, while earlier ones still run, so the reported error is
/// always that of the earliest failing document. Every started worker is
/// awaited before returning.
async fn process_parallel(
    sources: &[SourceDocument],
    job: &Arc<DocumentJob>,
    jobs: usize,
    progress: &dyn BuildProgress,
) -> Result<Vec<ProcessedDocument>> {
    let total = sources.len();
    let semaphore = Arc::new(Semaphore::new(jobs));
    let first_failed = Arc::new(AtomicUsize::new(usize::MAX));
    let mut set: JoinSet<(usize, Option<Result<ProcessedDocument>>)> = JoinSet::new();

    for (index, source) in sources.iter().cloned().enumerate() {
        let sem = semaphore.clone();
        let job = job.clone();
        let first_failed = first_failed.clone();

        set.spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return (index, Some(Err(DocBuildError::Task("worker pool closed".into()))));
            };
            if index > first_failed.load(Ordering::Acquire) {
                return (index, None);
            }
            let result = tokio::task::spawn_blocking(move || process_document(&source, &job))
                .await
                .unwrap_or_else(|e| Err(DocBuildError::Task(e.to_string())));
            if result.is_err() {
                first_failed.fetch_min(index, Ordering::AcqRel);
            }
            (index, Some(result))
        });
    }

    let mut slots: Vec<Option<ProcessedDocument>> = (0..total).map(|_| None).collect();
    let mut first_error: Option<(usize, DocBuildError)> = None;
    let mut completed = 0;

    while let Some(joined) = set.join_next().await {
        let (index, result) = joined.map_err(|e| DocBuildError::Task(e.to_string()))?;
        let Some(result) = result else {
            continue;
        };

        match result {
            Ok(doc) => {
                completed += 1;
                progress.document_done(&sources[index].slug, completed, total);
                slots[index] = Some(doc);
            }
            Err(e) => {
                if first_error.as_ref().is_none_or(|(i, _)| index < *i) {
                    first_error = Some((index, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_error {
        return Err(e);
    }

    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| DocBuildError::Task("document result missing".into())))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
