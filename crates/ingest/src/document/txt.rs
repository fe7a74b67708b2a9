use super::{ExtractionError, PageContent};

/// Plain text as a single page. Invalid UTF-8 is decoded lossily, a leading
/// BOM is dropped and CRLF line endings become LF.
pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let decoded = String::from_utf8_lossy(bytes);
    if matches!(decoded, std::borrow::Cow::Owned(_)) {
        tracing::debug!("text file is not valid UTF-8, decoding lossily");
    }
    let text = decoded.trim_start_matches('\u{FEFF}').replace("\r\n", "\n");

    Ok(vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_keeps_line_breaks() {
        let pages = extract_txt(b"Hello, world!\nThis is a test file.").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "Hello, world!\nThis is a test file.");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let content = [b'o', b'k', 0xFF, b'!'];
        let pages = extract_txt(&content).unwrap();
        assert_eq!(pages[0].text, "ok\u{FFFD}!");
    }

    #[test]
    fn keeps_paragraph_breaks_but_trims_ends() {
        let pages = extract_txt(b"  \n  First.\n\nSecond.  \n  ").unwrap();
        assert_eq!(pages[0].text, "First.\n\nSecond.");
    }

    #[test]
    fn windows_line_endings_and_bom_are_normalized() {
        let pages = extract_txt("\u{FEFF}One.\r\n\r\nTwo.".as_bytes()).unwrap();
        assert_eq!(pages[0].text, "One.\n\nTwo.");
    }
}
