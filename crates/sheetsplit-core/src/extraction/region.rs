use crate::error::SheetError;
use crate::extraction::TextExtractor;
use crate::geometry::PageRect;
use crate::model::Field;

/// Reads one field's text out of a fixed page region.
pub struct RegionExtractor<'a> {
    backend: &'a dyn TextExtractor,
}

impl<'a> RegionExtractor<'a> {
    pub fn new(backend: &'a dyn TextExtractor) -> Self {
        RegionExtractor { backend }
    }

    /// Extract and clean the text of `field` on `page_index`.
    ///
    /// Numbers are trimmed. Titles additionally have every whitespace run,
    /// newlines included, collapsed to a single space. Empty is a valid result.
    pub fn extract(
        &self,
        page_index: usize,
        rect: &PageRect,
        field: Field,
    ) -> Result<String, SheetError> {
        let raw = self.backend.extract_text(page_index, rect)?;
        let text = match field {
            Field::Number => raw.trim().to_string(),
            Field::Title => collapse_whitespace(&raw),
        };
        log::debug!(
            "{} on page {} in [{}]: {:?}",
            field,
            page_index,
            rect,
            text
        );
        Ok(text)
    }

    /// Like [`extract`](Self::extract) but an empty result is reported as
    /// [`SheetError::NoTextFound`], for interactive probing of a drawn box.
    pub fn probe(
        &self,
        page_index: usize,
        rect: &PageRect,
        field: Field,
    ) -> Result<String, SheetError> {
        let text = self.extract(page_index, rect, field)?;
        if text.is_empty() {
            log::warn!("no text found for {} on page {}", field, page_index);
            return Err(SheetError::NoTextFound { page: page_index });
        }
        Ok(text)
    }
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
