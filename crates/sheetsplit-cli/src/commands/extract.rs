use sheetsplit_core::batch::FieldRects;
use sheetsplit_core::error::SheetError;
use sheetsplit_core::geometry::{to_page_space, DisplayRect, Rect, Scale};
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    number: Rect,
    title: Option<Rect>,
    scale: f32,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), SheetError> {
    let scale = Scale::new(scale)?;
    super::require_pdftotext()?;
    let rects = FieldRects {
        number: to_page_space(DisplayRect(number), scale),
        title: title.map(|t| to_page_space(DisplayRect(t), scale)),
    };

    // Manifests must still resolve the source after being moved around.
    let pdf_file = std::fs::canonicalize(&pdf_file).unwrap_or(pdf_file);
    let manifest = sheetsplit_core::extract_sheets(&pdf_file, &rects)?;

    match output_format {
        "json" => output::json::print(&manifest)?,
        _ => output::table::print_sheets(&manifest.sheets),
    }

    if let Some(path) = output_file {
        manifest.save(&path)?;
        eprintln!(
            "Extracted {} sheet(s), written to {}",
            manifest.sheets.len(),
            path.display()
        );
        eprintln!("  set \"included\": true on sheets to export and edit override_* values as needed");
    }

    let missing = manifest
        .sheets
        .records()
        .iter()
        .filter(|r| r.extracted_number.is_empty())
        .count();
    if missing > 0 {
        eprintln!("  warning: {missing} sheet(s) have no number; edit them before exporting");
    }

    Ok(())
}
