//! Newline-delimited JSON for the lexeme index.

use std::path::Path;

use tracing::{info, instrument};

use docbuild_shared::{DocBuildError, LexemeRecord, Result};

use crate::assembler::write_atomic;

/// One compact JSON object per record, each line newline-terminated.
pub fn to_ndjson(lexemes: &[LexemeRecord]) -> Result<String> {
    let mut out = String::new();
    for lexeme in lexemes {
        out.push_str(&serde_json::to_string(lexeme)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write `lexemes` to `path`, replacing any existing file.
#[instrument(skip(lexemes), fields(count = lexemes.len(), path = %path.display()))]
pub fn write_ndjson(lexemes: &[LexemeRecord], path: &Path) -> Result<()> {
    let content = to_ndjson(lexemes)?;
    write_atomic(path, content.as_bytes())?;
    info!(count = lexemes.len(), "lexeme index written");
    Ok(())
}

/// Parse NDJSON text back into records. Blank lines are skipped.
pub fn parse_ndjson(text: &str) -> Result<Vec<LexemeRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| DocBuildError::parse(format!("lexemes line {}: {e}", i + 1)))
        })
        .collect()
}

/// Read and parse an NDJSON lexeme file.
pub fn read_ndjson(path: &Path) -> Result<Vec<LexemeRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| DocBuildError::io(path, e))?;
    parse_ndjson(&text)
}
