//! CLI definition, tracing setup, and the build command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use color_eyre::eyre::{Result, eyre};
use docbuild_core::pipeline::{BuildProgress, build_docs};
use docbuild_shared::{BuildConfig, BuildResult, resolve_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Compile Markdown docs into HTML fragments, a search index, and metadata.
#[derive(Parser)]
#[command(name = "build-docs", version, long_about = None)]
pub(crate) struct Cli {
    /// Directory containing the Markdown sources.
    pub source_dir: PathBuf,

    /// Directory receiving rendered/, search/ and meta.json.
    pub output_dir: PathBuf,

    /// Documentation version stamped on links and metadata (e.g. 1.x).
    #[arg(value_name = "VERSION")]
    pub doc_version: String,

    /// Config file (defaults to <source-dir>/build-docs.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Documents processed concurrently.
    #[arg(short, long, env = "BUILD_DOCS_JOBS")]
    pub jobs: Option<usize>,

    /// Context for documents whose front matter sets none.
    #[arg(long, value_parser = ["framework", "library", "global"])]
    pub context: Option<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Parse arguments, exiting 0 for help/version and 1 for usage errors.
pub(crate) fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docbuild=info",
        1 => "docbuild=debug",
        _ => "docbuild=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Build command
// ---------------------------------------------------------------------------

/// Run the build described by the CLI arguments.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if !cli.source_dir.is_dir() {
        return Err(eyre!(
            "source directory '{}' does not exist",
            cli.source_dir.display()
        ));
    }

    let config = build_config(&cli)?;

    info!(
        source = %config.source_dir.display(),
        output = %config.output_dir.display(),
        version = %config.version,
        jobs = config.jobs,
        "building docs"
    );

    let reporter = CliProgress::new();
    let result = build_docs(&config, &reporter).await;
    reporter.spinner.finish_and_clear();
    let result = result?;

    print_summary(&result);
    Ok(())
}

/// Merge config file values with CLI overrides.
fn build_config(cli: &Cli) -> Result<BuildConfig> {
    let mut file_config = resolve_config(cli.config.as_deref(), &cli.source_dir)?;

    if let Some(jobs) = cli.jobs {
        file_config.build.jobs = jobs;
    }
    if let Some(context) = &cli.context {
        file_config.build.default_context = context.clone();
    }
    file_config.validate()?;

    Ok(BuildConfig::new(
        &file_config,
        &cli.source_dir,
        &cli.output_dir,
        &cli.doc_version,
    ))
}

fn print_summary(result: &BuildResult) {
    println!();
    println!("  Docs built successfully!");
    println!("  Documents: {}", result.documents_processed);
    println!("  Lexemes:   {}", result.lexemes_generated);
    println!("  Rendered:  {}", display(&result.rendered_dir));
    println!("  Index:     {}", display(&result.lexemes_path));
    println!("  Meta:      {}", display(&result.meta_path));
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl BuildProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_done(&self, slug: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Compiled [{current}/{total}] {slug}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
