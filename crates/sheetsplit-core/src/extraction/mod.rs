pub mod pdftotext;
pub mod region;

use crate::error::SheetError;
use crate::geometry::PageRect;

/// Trait for text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Raw text of the 1-based page `page_index` clipped to `clip`.
    ///
    /// `clip` may have unordered bounds. An area with no glyphs yields an
    /// empty string, not an error.
    fn extract_text(&self, page_index: usize, clip: &PageRect) -> Result<String, SheetError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
