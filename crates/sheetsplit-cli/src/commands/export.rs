use sheetsplit_core::error::SheetError;
use sheetsplit_core::manifest::Manifest;
use sheetsplit_core::model::Field;
use sheetsplit_core::selection::parse_page_ranges;
use std::path::PathBuf;

use crate::output;

/// Selection flags applied on top of the manifest's own `included` flags.
pub struct Selection {
    pub all: bool,
    pub prefixes: Vec<String>,
    pub field: Field,
    pub pages: Option<String>,
}

pub fn run(
    manifest_file: PathBuf,
    out_dir: PathBuf,
    with_title: bool,
    selection: Selection,
    output_format: &str,
) -> Result<(), SheetError> {
    let mut manifest = Manifest::load(&manifest_file)?;

    if selection.all {
        manifest.sheets.set_all(true);
    }
    for prefix in &selection.prefixes {
        let matched = manifest.sheets.select_by_prefix(selection.field, prefix);
        if matched == 0 {
            eprintln!(
                "  warning: no sheet {} starts with '{}'",
                selection.field, prefix
            );
        }
    }
    if let Some(ranges) = &selection.pages {
        let pages = parse_page_ranges(ranges)?;
        manifest.sheets.select_pages(&pages)?;
    }

    let report = sheetsplit_core::export_manifest(&manifest, &out_dir, with_title)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report),
    }

    if !report.is_complete() {
        eprintln!("  warning: {} sheet(s) could not be saved", report.failed.len());
    }
    Ok(())
}
