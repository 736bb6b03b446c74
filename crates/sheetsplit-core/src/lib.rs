pub mod batch;
pub mod document;
pub mod error;
pub mod export;
pub mod extraction;
pub mod geometry;
pub mod manifest;
pub mod model;
pub mod render;
pub mod sanitize;
pub mod selection;
pub mod session;

use batch::FieldRects;
use document::{PageSplitter, PdfDocument};
use error::SheetError;
use export::ExportReport;
use extraction::pdftotext::PdftotextExtractor;
use extraction::TextExtractor;
use manifest::Manifest;
use selection::SelectionSet;
use std::path::Path;

/// Main API entry point: read number/title from every page of a PDF.
///
/// Opens the document to validate it and count pages, then extracts the
/// fixed regions with pdftotext.
pub fn extract_sheets(pdf_path: &Path, rects: &FieldRects) -> Result<Manifest, SheetError> {
    let document = PdfDocument::open(pdf_path)?;
    let extractor = PdftotextExtractor::new(pdf_path);
    extract_with(pdf_path, document.page_count(), &extractor, rects)
}

/// Same as [`extract_sheets`] with an explicit extraction backend.
pub fn extract_with(
    pdf_path: &Path,
    page_count: usize,
    extractor: &dyn TextExtractor,
    rects: &FieldRects,
) -> Result<Manifest, SheetError> {
    let records = batch::run_batch(page_count, extractor, rects)?;
    Ok(Manifest {
        source: pdf_path.to_path_buf(),
        number_rect: rects.number,
        title_rect: rects.title,
        sheets: SelectionSet::new(records),
    })
}

/// Write the included sheets of a reviewed manifest into `output_dir`.
pub fn export_manifest(
    manifest: &Manifest,
    output_dir: &Path,
    include_title: bool,
) -> Result<ExportReport, SheetError> {
    if manifest.sheets.included_count() == 0 {
        return Err(SheetError::NoSelection);
    }
    let document = PdfDocument::open(&manifest.source)?;
    if document.page_count() != manifest.sheets.len() {
        log::warn!(
            "{} has {} pages but the manifest lists {} sheets",
            manifest.source.display(),
            document.page_count(),
            manifest.sheets.len()
        );
    }
    export::export_selected(&manifest.sheets, &document, output_dir, include_title)
}
