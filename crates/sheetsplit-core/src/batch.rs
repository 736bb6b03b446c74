use crate::error::SheetError;
use crate::extraction::region::RegionExtractor;
use crate::extraction::TextExtractor;
use crate::geometry::PageRect;
use crate::model::{Field, SheetRecord};

/// Page-space boxes reused on every page of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRects {
    pub number: PageRect,
    pub title: Option<PageRect>,
}

/// Extract number and title from every page, in page order.
///
/// Produces exactly one record per page even when a field comes back
/// empty; empty values are left for manual correction. A backend failure
/// on any page aborts the batch.
pub fn run_batch(
    page_count: usize,
    backend: &dyn TextExtractor,
    rects: &FieldRects,
) -> Result<Vec<SheetRecord>, SheetError> {
    let region = RegionExtractor::new(backend);
    log::info!(
        "extracting {} page(s) with {}",
        page_count,
        backend.backend_name()
    );

    let mut records = Vec::with_capacity(page_count);
    for page_index in 1..=page_count {
        let number = region.extract(page_index, &rects.number, Field::Number)?;
        let title = match &rects.title {
            Some(rect) => region.extract(page_index, rect, Field::Title)?,
            None => String::new(),
        };
        if number.is_empty() {
            log::warn!("page {}: no sheet number found", page_index);
        }
        records.push(SheetRecord::new(page_index, number, title));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Answers from a per-page table; records every call.
    struct PageTable {
        numbers: Vec<&'static str>,
        titles: Vec<&'static str>,
        calls: Mutex<Vec<usize>>,
    }

    impl TextExtractor for PageTable {
        fn extract_text(&self, page: usize, clip: &PageRect) -> Result<String, SheetError> {
            self.calls.lock().unwrap().push(page);
            let table = if clip.0.left < 100.0 {
                &self.numbers
            } else {
                &self.titles
            };
            Ok(table.get(page - 1).copied().unwrap_or("").to_string())
        }

        fn backend_name(&self) -> &str {
            "table"
        }
    }

    fn rects(with_title: bool) -> FieldRects {
        FieldRects {
            number: PageRect(Rect::new(10.0, 10.0, 50.0, 20.0)),
            title: with_title.then(|| PageRect(Rect::new(200.0, 10.0, 400.0, 40.0))),
        }
    }

    #[test]
    fn test_batch_without_title() {
        let backend = PageTable {
            numbers: vec!["A-101", "A-102\n", " S-201"],
            titles: vec![],
            calls: Mutex::new(Vec::new()),
        };
        let records = run_batch(3, &backend, &rects(false)).unwrap();
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.page_index, r.extracted_number.as_str(), r.extracted_title.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "A-101", ""), (2, "A-102", ""), (3, "S-201", "")]
        );
        assert_eq!(*backend.calls.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_batch_with_title_collapses_lines() {
        let backend = PageTable {
            numbers: vec!["A-101"],
            titles: vec!["Floor   Plan\nLevel 2"],
            calls: Mutex::new(Vec::new()),
        };
        let records = run_batch(1, &backend, &rects(true)).unwrap();
        assert_eq!(records[0].extracted_title, "Floor Plan Level 2");
        assert_eq!(records[0].override_title, "Floor Plan Level 2");
    }

    #[test]
    fn test_batch_keeps_empty_pages() {
        let backend = PageTable {
            numbers: vec!["A-101", "", "A-103"],
            titles: vec![],
            calls: Mutex::new(Vec::new()),
        };
        let records = run_batch(3, &backend, &rects(false)).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].extracted_number, "");
    }

    proptest! {
        #[test]
        fn batch_is_dense_and_ordered(page_count in 0usize..60) {
            let backend = PageTable {
                numbers: vec![],
                titles: vec![],
                calls: Mutex::new(Vec::new()),
            };
            let records = run_batch(page_count, &backend, &rects(true)).unwrap();
            let pages: Vec<usize> = records.iter().map(|r| r.page_index).collect();
            prop_assert_eq!(pages, (1..=page_count).collect::<Vec<_>>());
        }
    }
}
