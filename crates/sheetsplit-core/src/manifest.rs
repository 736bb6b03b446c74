use crate::error::SheetError;
use crate::geometry::PageRect;
use crate::selection::SelectionSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Batch result saved for review: edit overrides and `included` flags by
/// hand, then export from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub source: PathBuf,
    pub number_rect: PageRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_rect: Option<PageRect>,
    pub sheets: SelectionSet,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let content = std::fs::read_to_string(path).map_err(|e| SheetError::ManifestLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| SheetError::ManifestLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        manifest.validate().map_err(|reason| SheetError::ManifestLoad {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<(), SheetError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Records must cover pages 1..N densely and in order.
    fn validate(&self) -> Result<(), String> {
        for (i, record) in self.sheets.records().iter().enumerate() {
            if record.page_index != i + 1 {
                return Err(format!(
                    "sheet #{} has page_index {} (expected {})",
                    i + 1,
                    record.page_index,
                    i + 1
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::SheetRecord;

    fn manifest() -> Manifest {
        Manifest {
            source: PathBuf::from("drawings.pdf"),
            number_rect: PageRect(Rect::new(10.0, 20.0, 30.0, 40.0)),
            title_rect: None,
            sheets: SelectionSet::new(vec![
                SheetRecord::new(1, "A-101".into(), String::new()),
                SheetRecord::new(2, "A-102".into(), String::new()),
            ]),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheets.json");
        let m = manifest();
        m.save(&path).unwrap();
        assert_eq!(Manifest::load(&path).unwrap(), m);
    }

    #[test]
    fn test_hand_edited_manifest() {
        let json = r#"{
            "source": "drawings.pdf",
            "number_rect": {"left": 10.0, "top": 20.0, "right": 30.0, "bottom": 40.0},
            "sheets": [
                {"page_index": 1, "extracted_number": "A-101", "extracted_title": "",
                 "override_number": "A-101", "override_title": ""},
                {"page_index": 2, "extracted_number": "A-102", "extracted_title": "",
                 "included": true, "override_number": "A-102B", "override_title": ""}
            ]
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheets.json");
        std::fs::write(&path, json).unwrap();
        let m = Manifest::load(&path).unwrap();
        assert_eq!(m.sheets.included_count(), 1);
        assert_eq!(m.sheets.get(2).unwrap().override_number, "A-102B");
        assert!(!m.sheets.get(1).unwrap().included);
    }

    #[test]
    fn test_load_rejects_gapped_pages() {
        let mut m = manifest();
        m.sheets = SelectionSet::new(vec![SheetRecord::new(2, "A".into(), String::new())]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheets.json");
        m.save(&path).unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(SheetError::ManifestLoad { .. })
        ));
    }
}
