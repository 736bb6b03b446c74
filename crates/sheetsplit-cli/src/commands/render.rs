use sheetsplit_core::document::{PageSplitter, PdfDocument};
use sheetsplit_core::error::SheetError;
use sheetsplit_core::geometry::Scale;
use sheetsplit_core::render::{save_png, PageRenderer, PdftoppmRenderer};
use std::path::PathBuf;

pub fn run(pdf_file: PathBuf, page: usize, zoom: f32, out: PathBuf) -> Result<(), SheetError> {
    let zoom = Scale::new(zoom)?;
    let document = PdfDocument::open(&pdf_file)?;
    if page == 0 || page > document.page_count() {
        return Err(SheetError::PageOutOfRange {
            page,
            page_count: document.page_count(),
        });
    }

    let bitmap = PdftoppmRenderer::new(&pdf_file).render(page, zoom)?;
    save_png(&bitmap, &out)?;

    eprintln!(
        "Rendered page {} at {}x ({}x{} px) to {}",
        page,
        zoom.factor(),
        bitmap.width(),
        bitmap.height(),
        out.display()
    );
    Ok(())
}
