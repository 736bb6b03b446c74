use crate::document::PageSplitter;
use crate::error::SheetError;
use crate::model::SheetRecord;
use crate::sanitize::sanitize;
use crate::selection::SelectionSet;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One page to write, derived from an included record at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportJob {
    pub page_index: usize,
    pub final_number: String,
    pub final_title: Option<String>,
    pub output_path: PathBuf,
}

impl ExportJob {
    pub fn from_record(record: &SheetRecord, output_dir: &Path, include_title: bool) -> Self {
        let final_number = sanitize(&record.override_number);
        let final_title = include_title.then(|| sanitize(&record.override_title));
        let file_name = match &final_title {
            Some(title) => format!("{final_number} {title}.pdf"),
            None => format!("{final_number}.pdf"),
        };
        ExportJob {
            page_index: record.page_index,
            output_path: output_dir.join(file_name),
            final_number,
            final_title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedSheet {
    pub page_index: usize,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedSheet {
    pub page_index: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of an export batch; per-page failures don't stop the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub written: Vec<ExportedSheet>,
    pub failed: Vec<FailedSheet>,
    /// Output paths claimed by more than one page; the last page wins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<PathBuf>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolve every included record into an [`ExportJob`], in page order.
pub fn plan_exports(
    selection: &SelectionSet,
    output_dir: &Path,
    include_title: bool,
) -> Vec<ExportJob> {
    selection
        .included()
        .map(|r| ExportJob::from_record(r, output_dir, include_title))
        .collect()
}

/// Write one single-page PDF per included record into `output_dir`.
///
/// Fails up front with [`SheetError::NoSelection`] when nothing is included
/// and with [`SheetError::OutputDir`] when the directory is missing; no file
/// is written in either case. Existing files are overwritten.
pub fn export_selected(
    selection: &SelectionSet,
    splitter: &dyn PageSplitter,
    output_dir: &Path,
    include_title: bool,
) -> Result<ExportReport, SheetError> {
    let jobs = plan_exports(selection, output_dir, include_title);
    if jobs.is_empty() {
        return Err(SheetError::NoSelection);
    }
    if !output_dir.is_dir() {
        return Err(SheetError::OutputDir(output_dir.to_path_buf()));
    }

    let mut report = ExportReport {
        duplicates: duplicate_paths(&jobs),
        ..Default::default()
    };
    for path in &report.duplicates {
        log::warn!("several sheets map to {}; last one wins", path.display());
    }

    for job in jobs {
        match write_job(splitter, &job) {
            Ok(()) => {
                log::info!("saved page {} as {}", job.page_index, job.output_path.display());
                report.written.push(ExportedSheet {
                    page_index: job.page_index,
                    path: job.output_path,
                });
            }
            Err(e) => {
                log::warn!("page {} not saved: {}", job.page_index, e);
                report.failed.push(FailedSheet {
                    page_index: job.page_index,
                    path: job.output_path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn write_job(splitter: &dyn PageSplitter, job: &ExportJob) -> Result<(), SheetError> {
    let bytes = splitter.extract_page(job.page_index)?;
    std::fs::write(&job.output_path, bytes)?;
    Ok(())
}

fn duplicate_paths(jobs: &[ExportJob]) -> Vec<PathBuf> {
    let mut seen: HashMap<&Path, usize> = HashMap::new();
    for job in jobs {
        *seen.entry(job.output_path.as_path()).or_default() += 1;
    }
    let mut dups: Vec<PathBuf> = seen
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(p, _)| p.to_path_buf())
        .collect();
    dups.sort();
    dups
}
