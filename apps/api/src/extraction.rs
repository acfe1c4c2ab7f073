use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Minimum amount of trimmed text required for a PDF to count as readable.
/// Anything under this is almost certainly a scanned image-only document.
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF file not found on disk")]
    FileMissing,

    #[error("failed to read PDF file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("extracted text too short ({chars} chars); likely an image-only PDF")]
    InsufficientContent { chars: usize },
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub page_count: i32,
    pub word_count: i32,
}

/// Extracts the embedded text layer from a PDF on disk.
///
/// No OCR is performed: scanned documents yield little or no text and are
/// rejected with `InsufficientContent`.
pub async fn extract_pdf(path: &Path) -> Result<ExtractedDocument, ExtractError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ExtractError::FileMissing);
    }

    let bytes = tokio::fs::read(path).await?;
    extract_from_bytes(&bytes)
}

/// Extraction core, separated from the filesystem so it can be exercised
/// directly on in-memory bytes.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<ExtractedDocument, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    let text = text.trim().to_string();
    if text.len() < MIN_TEXT_CHARS {
        return Err(ExtractError::InsufficientContent { chars: text.len() });
    }

    let word_count = count_words(&text);
    let page_count = page_count(bytes);

    debug!(
        "Extracted {} chars, {} words from {} pages",
        text.len(),
        word_count,
        page_count
    );

    Ok(ExtractedDocument {
        text,
        page_count,
        word_count,
    })
}

/// Whitespace-delimited non-empty tokens.
pub fn count_words(text: &str) -> i32 {
    text.split_whitespace().count() as i32
}

/// Page count from document metadata; 0 when the page tree is unreadable.
fn page_count(bytes: &[u8]) -> i32 {
    lopdf::Document::load_mem(bytes)
        .map(|doc| doc.get_pages().len() as i32)
        .unwrap_or(0)
}
