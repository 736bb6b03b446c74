pub mod export;
pub mod extract;
pub mod probe;
pub mod render;
pub mod session;

use sheetsplit_core::error::SheetError;
use sheetsplit_core::extraction::pdftotext::PdftotextExtractor;

/// Fail before opening anything when the text backend is missing.
pub fn require_pdftotext() -> Result<(), SheetError> {
    if PdftotextExtractor::is_available() {
        Ok(())
    } else {
        Err(SheetError::PdftotextNotFound)
    }
}
