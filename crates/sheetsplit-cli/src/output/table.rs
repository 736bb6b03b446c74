use sheetsplit_core::export::ExportReport;
use sheetsplit_core::model::{Field, SheetRecord};
use sheetsplit_core::selection::SelectionSet;

pub fn print_sheets(sheets: &SelectionSet) {
    let number_width = sheets
        .records()
        .iter()
        .map(|r| r.override_number.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    println!(
        "  {:>4}  {:<3}  {:<width$}  Title",
        "Page",
        "Sel",
        "Number",
        width = number_width
    );
    println!("  {}", "-".repeat(4 + 2 + 3 + 2 + number_width + 2 + 20));
    for record in sheets.records() {
        println!("  {}", format_row(record, number_width));
    }
    println!();
    println!(
        "  {} sheet(s), {} selected",
        sheets.len(),
        sheets.included_count()
    );
}

fn format_row(record: &SheetRecord, number_width: usize) -> String {
    let mark = if record.included { "[x]" } else { "[ ]" };
    let number = if record.override_number.is_empty() {
        "?".to_string()
    } else {
        record.override_number.clone()
    };
    let edited = if record.is_edited(Field::Number) || record.is_edited(Field::Title) {
        " (edited)"
    } else {
        ""
    };
    format!(
        "{:>4}  {}  {:<width$}  {}{}",
        record.page_index,
        mark,
        number,
        record.override_title,
        edited,
        width = number_width
    )
}

pub fn print_report(report: &ExportReport) {
    for sheet in &report.written {
        println!("  saved page {:>4} as {}", sheet.page_index, sheet.path.display());
    }
    for sheet in &report.failed {
        println!(
            "  FAILED page {:>4} ({}): {}",
            sheet.page_index,
            sheet.path.display(),
            sheet.reason
        );
    }
    for path in &report.duplicates {
        println!(
            "  note: several sheets were saved to {}; only the last one remains",
            path.display()
        );
    }
    println!();
    println!(
        "  {} saved, {} failed",
        report.written.len(),
        report.failed.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_marks_selection_and_edits() {
        let mut r = SheetRecord::new(3, "S-201".into(), "Foundation Plan".into());
        assert_eq!(format_row(&r, 6), "   3  [ ]  S-201   Foundation Plan");
        r.included = true;
        r.override_number = "S-201-REV".into();
        assert_eq!(
            format_row(&r, 9),
            "   3  [x]  S-201-REV  Foundation Plan (edited)"
        );
    }

    #[test]
    fn test_format_row_flags_missing_number() {
        let r = SheetRecord::new(1, String::new(), String::new());
        assert!(format_row(&r, 6).contains("  ?     "));
    }
}
