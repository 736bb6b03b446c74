use sheetsplit_core::document::{PageSplitter, PdfDocument};
use sheetsplit_core::error::SheetError;
use sheetsplit_core::extraction::pdftotext::PdftotextExtractor;
use sheetsplit_core::extraction::region::RegionExtractor;
use sheetsplit_core::geometry::{to_page_space, DisplayRect, Rect, Scale};
use sheetsplit_core::model::Field;
use std::path::PathBuf;

pub fn run(
    pdf_file: PathBuf,
    rect: Rect,
    page: usize,
    scale: f32,
    title: bool,
) -> Result<(), SheetError> {
    let scale = Scale::new(scale)?;
    super::require_pdftotext()?;
    let document = PdfDocument::open(&pdf_file)?;
    if page == 0 || page > document.page_count() {
        return Err(SheetError::PageOutOfRange {
            page,
            page_count: document.page_count(),
        });
    }

    let page_rect = to_page_space(DisplayRect(rect), scale);
    let field = if title { Field::Title } else { Field::Number };
    let extractor = PdftotextExtractor::new(&pdf_file);
    let text = RegionExtractor::new(&extractor).probe(page, &page_rect, field)?;

    eprintln!("Page {page}, box {page_rect} (PDF points):");
    println!("{text}");
    Ok(())
}
