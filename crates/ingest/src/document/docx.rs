use std::io::{Cursor, Read};

use roxmltree::Document;
use zip::ZipArchive;

use super::{ExtractionError, PageContent};

/// Extract `w:p` paragraph text from `word/document.xml`. Paragraphs are
/// joined with blank lines so the segmenter sees them as paragraphs.
pub fn extract_docx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("not a valid ZIP archive: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::DocxError(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut document_xml)?;

    let doc = Document::parse(&document_xml)
        .map_err(|e| ExtractionError::DocxError(format!("invalid document XML: {e}")))?;

    let mut paragraphs = Vec::new();

    for paragraph in doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "p")
    {
        let text = paragraph
            .descendants()
            .filter(|node| node.is_element() && node.tag_name().name() == "t")
            .filter_map(|node| node.text())
            .collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            paragraphs.push(text.to_string());
        }
    }

    Ok(vec![PageContent {
        page_number: 1,
        text: paragraphs.join("\n\n"),
    }])
}
