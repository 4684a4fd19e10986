// Résumé processing: format-specific text extraction + keyword segmentation.
// Extraction is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod extract;
pub mod segmenter;

// Re-export the public API consumed by handlers and downstream clients.
pub use extract::{ExtractError, PdfTextExtractor, TextExtractor};
pub use segmenter::{segment, PersonalInfo, SectionedResume};
