use crate::error::SheetError;
use crate::model::{Field, SheetRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-page records with their include flags and edited values.
///
/// Records are addressed by their 1-based page index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    records: Vec<SheetRecord>,
}

impl SelectionSet {
    pub fn new(records: Vec<SheetRecord>) -> Self {
        SelectionSet { records }
    }

    pub fn records(&self) -> &[SheetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, page_index: usize) -> Result<&SheetRecord, SheetError> {
        let len = self.records.len();
        page_index
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
            .ok_or(SheetError::RecordOutOfRange {
                index: page_index,
                len,
            })
    }

    fn get_mut(&mut self, page_index: usize) -> Result<&mut SheetRecord, SheetError> {
        let len = self.records.len();
        page_index
            .checked_sub(1)
            .and_then(|i| self.records.get_mut(i))
            .ok_or(SheetError::RecordOutOfRange {
                index: page_index,
                len,
            })
    }

    /// Included records in page order.
    pub fn included(&self) -> impl Iterator<Item = &SheetRecord> {
        self.records.iter().filter(|r| r.included)
    }

    pub fn included_count(&self) -> usize {
        self.included().count()
    }

    pub fn set_all(&mut self, included: bool) {
        for record in &mut self.records {
            record.included = included;
        }
    }

    /// Include every record whose current value of `field` starts with
    /// `prefix`. Records that don't match keep their flag. Returns how many
    /// records matched.
    pub fn select_by_prefix(&mut self, field: Field, prefix: &str) -> usize {
        let mut matched = 0;
        for record in &mut self.records {
            if record.value(field).starts_with(prefix) {
                record.included = true;
                matched += 1;
            }
        }
        matched
    }

    pub fn set_included(&mut self, page_index: usize, included: bool) -> Result<(), SheetError> {
        self.get_mut(page_index)?.included = included;
        Ok(())
    }

    /// Flip the include flag; returns the new value.
    pub fn toggle(&mut self, page_index: usize) -> Result<bool, SheetError> {
        let record = self.get_mut(page_index)?;
        record.included = !record.included;
        Ok(record.included)
    }

    /// Include exactly the listed pages, leaving others untouched.
    pub fn select_pages(&mut self, pages: &[usize]) -> Result<(), SheetError> {
        for &page in pages {
            self.set_included(page, true)?;
        }
        Ok(())
    }

    /// Replace the edited value of `field`. The extracted value is kept.
    pub fn edit_override(
        &mut self,
        page_index: usize,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), SheetError> {
        self.get_mut(page_index)?.set_value(field, value.into());
        Ok(())
    }

    /// Reset the edited value of `field` back to what was extracted.
    pub fn revert_override(&mut self, page_index: usize, field: Field) -> Result<(), SheetError> {
        let record = self.get_mut(page_index)?;
        let original = record.extracted(field).to_string();
        record.set_value(field, original);
        Ok(())
    }
}

/// Parse a page list like "1-3, 5, 8-10" into sorted unique page numbers.
pub fn parse_page_ranges(input: &str) -> Result<Vec<usize>, SheetError> {
    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let parse = |s: &str| -> Result<usize, SheetError> {
            let n: usize = s
                .trim()
                .parse()
                .map_err(|_| SheetError::InvalidRange(format!("'{}' is not a page number", s)))?;
            if n == 0 {
                return Err(SheetError::InvalidRange("page numbers start at 1".into()));
            }
            Ok(n)
        };

        if let Some((start, end)) = part.split_once('-') {
            let start = parse(start)?;
            let end = parse(end)?;
            if start > end {
                return Err(SheetError::InvalidRange(format!(
                    "start {} > end {}",
                    start, end
                )));
            }
            pages.extend(start..=end);
        } else {
            pages.insert(parse(part)?);
        }
    }

    Ok(pages.into_iter().collect())
}
