//! Text Extractor: turns stored document bytes into plain text by format.
//!
//! Parsers run on the blocking pool and any panic inside them is caught, so a
//! malformed upload always surfaces as `ExtractionError::Corrupt`. Short or
//! empty output is returned as-is; deciding what to do with it is the
//! analysis engine's job.

mod docx;
mod pdf;

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// The blocking task never produced a result; not the document's fault.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts text synchronously. Use `extract_text` from async code.
pub fn extract(bytes: &[u8], extension: &str, max_pages: usize) -> Result<String, ExtractionError> {
    let ext = extension.trim_start_matches('.').to_lowercase();
    let parsed = catch_unwind(AssertUnwindSafe(|| match ext.as_str() {
        "pdf" => pdf::extract_pdf_text(bytes, max_pages),
        "docx" => docx::extract_docx_text(bytes),
        other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
    }));

    parsed.unwrap_or_else(|_| Err(ExtractionError::Corrupt(format!("{ext} parser panicked"))))
}

/// Runs `extract` on the blocking pool.
pub async fn extract_text(
    bytes: bytes::Bytes,
    extension: String,
    max_pages: usize,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract(&bytes, &extension, max_pages)).await?
}
