//! Résumé text extraction.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported résumé format: .{0}")]
    UnsupportedFormat(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
}

/// Format-specific text extraction seam.
///
/// Carried in `AppState` as `Arc<dyn TextExtractor>` so tests can substitute
/// fixed text and new formats plug in without touching the handlers.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Production extractor: PDF via the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => {
                Ok(pdf_extract::extract_text(path)?)
            }
            other => Err(ExtractError::UnsupportedFormat(
                other.unwrap_or("none").to_string(),
            )),
        }
    }
}
