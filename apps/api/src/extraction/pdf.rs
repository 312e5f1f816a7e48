use pdf_extract::Document;
use tracing::debug;

use super::ExtractionError;

/// Concatenates the text of the first `max_pages` pages.
/// A page that fails to decode is skipped; a document that fails to load is corrupt.
pub(super) fn extract_pdf_text(bytes: &[u8], max_pages: usize) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Corrupt(e.to_string()))?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys().take(max_pages) {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => debug!("Skipping unreadable PDF page {page_number}: {e}"),
        }
    }
    Ok(text)
}
