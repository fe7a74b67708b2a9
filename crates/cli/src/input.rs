use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use quizgen_core::config::QuizLimits;
use quizgen_ingest::extract_text;

use crate::cli::QuizArgs;

/// Source text for a quiz: inline `--text`, or the extracted text of `--file`
/// after the upload limits are checked.
pub fn load_text(args: &QuizArgs, limits: &QuizLimits) -> Result<String> {
    match (&args.text, &args.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => load_file(path, limits),
        (None, None) => anyhow::bail!("either --file or --text is required"),
    }
}

fn load_file(path: &Path, limits: &QuizLimits) -> Result<String> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid file name: {}", path.display()))?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .len() as usize;
    limits.check_upload(filename, size)?;

    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let document = extract_text(&bytes, filename)
        .with_context(|| format!("text extraction failed for {filename}"))?;

    info!(
        file = filename,
        pages = document.pages.len(),
        chars = document.total_chars(),
        "Extracted document text"
    );
    Ok(document.full_text())
}
