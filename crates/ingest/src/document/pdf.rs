use super::{ExtractionError, PageContent};

/// Extract text page by page. pdf-extract returns one string with form feeds
/// between pages; image-only PDFs yield no pages.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let pages: Vec<PageContent> = text
        .split('\x0C')
        .map(normalize_page)
        .enumerate()
        .filter(|(_, page)| !page.is_empty())
        .map(|(i, page)| PageContent {
            page_number: i + 1,
            text: page,
        })
        .collect();

    if pages.is_empty() {
        tracing::warn!("PDF contains no extractable text (scanned or image-only?)");
    }
    Ok(pages)
}

/// Strip trailing spaces and collapse runs of blank lines to one, so the
/// segmenter sees paragraph breaks rather than layout gaps.
fn normalize_page(page: &str) -> String {
    let mut out = String::with_capacity(page.len());
    let mut blank_run = 0;
    for line in page.trim().lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                out.push('\n');
            }
            continue;
        }
        blank_run = 0;
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}
