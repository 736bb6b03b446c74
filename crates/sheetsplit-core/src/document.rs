//! Source document handle and single-page splitting.
//!
//! Splitting keeps the whole object graph, deletes every page except the
//! requested one, then prunes what became unreachable.

use crate::error::SheetError;
use lopdf::Document;
use std::path::{Path, PathBuf};

/// Trait for backends that cut single pages out of the open document.
pub trait PageSplitter: Send + Sync {
    fn page_count(&self) -> usize;

    /// Serialized standalone PDF holding only the 1-based `page_index`.
    fn extract_page(&self, page_index: usize) -> Result<Vec<u8>, SheetError>;
}

/// An open multi-page PDF.
#[derive(Debug)]
pub struct PdfDocument {
    doc: Document,
    page_count: usize,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let doc = Document::load(path).map_err(|e| SheetError::DocumentOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_document(path.to_path_buf(), doc)
    }

    /// Open from memory; `path` is only used for messages and tooling.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, SheetError> {
        let path = path.into();
        let doc = Document::load_mem(bytes).map_err(|e| SheetError::DocumentOpen {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::from_document(path, doc)
    }

    fn from_document(path: PathBuf, doc: Document) -> Result<Self, SheetError> {
        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(SheetError::DocumentOpen {
                path,
                reason: "document has no pages".into(),
            });
        }
        log::info!("opened {} ({} pages)", path.display(), page_count);
        Ok(PdfDocument { doc, page_count })
    }
}

impl PageSplitter for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn extract_page(&self, page_index: usize) -> Result<Vec<u8>, SheetError> {
        if page_index == 0 || page_index > self.page_count {
            return Err(SheetError::PageOutOfRange {
                page: page_index,
                page_count: self.page_count,
            });
        }

        let mut single = self.doc.clone();
        let to_delete: Vec<u32> = (1..=self.page_count as u32)
            .filter(|&p| p as usize != page_index)
            .collect();
        single.delete_pages(&to_delete);
        single.prune_objects();
        single.compress();

        let mut buffer = Vec::new();
        single
            .save_to(&mut buffer)
            .map_err(|e| SheetError::Split(format!("page {}: {}", page_index, e)))?;
        Ok(buffer)
    }
}
