//! build-docs: compile a directory of Markdown docs into rendered HTML
//! fragments, a search lexeme index, and page metadata.

mod commands;

use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = commands::parse_args();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
