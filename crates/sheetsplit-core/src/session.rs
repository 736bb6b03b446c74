//! Interactive workflow as an explicit state machine.
//!
//! ```text
//! AwaitingNumberBox --SetNumberRect--> AwaitingNumberConfirm
//!   --ConfirmNumber--> AwaitingTitleBox --SetTitleRect--> AwaitingTitleConfirm
//!   --RunBatch--> Ready
//! AwaitingNumberConfirm | AwaitingTitleBox --SkipTitle--> Ready
//! ```
//!
//! `Cancel` steps back from a confirmation to redrawing the same box.
//! `UploadDocument` resets to `AwaitingNumberBox` from any state. Once in
//! `Ready` the sheets are only replaced by going through the flow again, so
//! review edits are never lost to a stray `RunBatch`.

use crate::batch::{run_batch, FieldRects};
use crate::document::{PageSplitter, PdfDocument};
use crate::error::SheetError;
use crate::export::{export_selected, ExportReport};
use crate::extraction::pdftotext::PdftotextExtractor;
use crate::extraction::region::RegionExtractor;
use crate::extraction::TextExtractor;
use crate::geometry::{to_page_space, DisplayRect, PageRect, Scale};
use crate::manifest::Manifest;
use crate::model::Field;
use crate::selection::SelectionSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingNumberBox,
    AwaitingNumberConfirm {
        number: PageRect,
        text: String,
    },
    AwaitingTitleBox {
        number: PageRect,
    },
    AwaitingTitleConfirm {
        number: PageRect,
        title: PageRect,
        text: String,
    },
    Ready {
        rects: FieldRects,
        selection: SelectionSet,
    },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingNumberBox => write!(f, "waiting for the sheet number box"),
            SessionState::AwaitingNumberConfirm { .. } => {
                write!(f, "waiting for the sheet number to be confirmed")
            }
            SessionState::AwaitingTitleBox { .. } => write!(f, "waiting for the sheet title box"),
            SessionState::AwaitingTitleConfirm { .. } => {
                write!(f, "waiting for the sheet title to be confirmed")
            }
            SessionState::Ready { .. } => write!(f, "reviewing extracted sheets"),
        }
    }
}

/// User actions that drive the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UploadDocument(PathBuf),
    NextPage,
    SetNumberRect(DisplayRect),
    ConfirmNumber,
    SkipTitle,
    SetTitleRect(DisplayRect),
    RunBatch,
    Cancel,
    ToggleInclude(usize),
    SetAll(bool),
    SelectByPrefix { field: Field, prefix: String },
    EditOverride { page: usize, field: Field, value: String },
    RevertOverride { page: usize, field: Field },
    Export { output_dir: PathBuf, include_title: bool },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::UploadDocument(_) => "upload",
            Command::NextPage => "next page",
            Command::SetNumberRect(_) => "draw number box",
            Command::ConfirmNumber => "confirm number",
            Command::SkipTitle => "skip title",
            Command::SetTitleRect(_) => "draw title box",
            Command::RunBatch => "extract sheets",
            Command::Cancel => "cancel",
            Command::ToggleInclude(_) => "toggle",
            Command::SetAll(_) => "select all",
            Command::SelectByPrefix { .. } => "select by prefix",
            Command::EditOverride { .. } => "edit",
            Command::RevertOverride { .. } => "revert",
            Command::Export { .. } => "export",
        }
    }
}

/// What a command did, for the presentation layer to show.
#[derive(Debug, Clone)]
pub enum Event {
    Uploaded { page_count: usize },
    PageShown(usize),
    NumberFound(String),
    AwaitingTitle,
    TitleFound(String),
    Cancelled,
    Extracted { sheets: usize },
    SelectionChanged { included: usize },
    Edited,
    Exported(ExportReport),
}

/// One open document and the user's progress through the workflow.
pub struct Session {
    source: PathBuf,
    extractor: Box<dyn TextExtractor>,
    splitter: Box<dyn PageSplitter>,
    scale: Scale,
    current_page: usize,
    state: SessionState,
}

impl Session {
    /// Open `path` with the poppler/lopdf backends.
    pub fn open(path: &Path, scale: Scale) -> Result<Self, SheetError> {
        let document = PdfDocument::open(path)?;
        let extractor = PdftotextExtractor::new(path);
        Ok(Session::with_backends(
            path.to_path_buf(),
            Box::new(extractor),
            Box::new(document),
            scale,
        ))
    }

    pub fn with_backends(
        source: PathBuf,
        extractor: Box<dyn TextExtractor>,
        splitter: Box<dyn PageSplitter>,
        scale: Scale,
    ) -> Self {
        Session {
            source,
            extractor,
            splitter,
            scale,
            current_page: 1,
            state: SessionState::AwaitingNumberBox,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn page_count(&self) -> usize {
        self.splitter.page_count()
    }

    /// 1-based page shown for drawing.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selection(&self) -> Option<&SelectionSet> {
        match &self.state {
            SessionState::Ready { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Snapshot of the review state, once sheets have been extracted.
    pub fn manifest(&self) -> Option<Manifest> {
        match &self.state {
            SessionState::Ready { rects, selection } => Some(Manifest {
                source: self.source.clone(),
                number_rect: rects.number,
                title_rect: rects.title,
                sheets: selection.clone(),
            }),
            _ => None,
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<Event, SheetError> {
        let name = command.name();
        match command {
            Command::UploadDocument(path) => {
                *self = Session::open(&path, self.scale)?;
                Ok(Event::Uploaded {
                    page_count: self.page_count(),
                })
            }
            Command::NextPage => {
                if self.current_page < self.page_count() {
                    self.current_page += 1;
                }
                Ok(Event::PageShown(self.current_page))
            }
            Command::SetNumberRect(drawn) => match self.state {
                SessionState::AwaitingNumberBox | SessionState::AwaitingNumberConfirm { .. } => {
                    let number = to_page_space(drawn, self.scale);
                    let probed = self.probe(&number, Field::Number);
                    self.state = match &probed {
                        Ok(text) => SessionState::AwaitingNumberConfirm {
                            number,
                            text: text.clone(),
                        },
                        Err(_) => SessionState::AwaitingNumberBox,
                    };
                    probed.map(Event::NumberFound)
                }
                _ => Err(self.invalid(name)),
            },
            Command::ConfirmNumber => match self.state {
                SessionState::AwaitingNumberConfirm { number, .. } => {
                    self.state = SessionState::AwaitingTitleBox { number };
                    Ok(Event::AwaitingTitle)
                }
                _ => Err(self.invalid(name)),
            },
            Command::SkipTitle => match self.state {
                SessionState::AwaitingNumberConfirm { number, .. }
                | SessionState::AwaitingTitleBox { number } => self.extract(FieldRects {
                    number,
                    title: None,
                }),
                _ => Err(self.invalid(name)),
            },
            Command::SetTitleRect(drawn) => match self.state {
                SessionState::AwaitingTitleBox { number }
                | SessionState::AwaitingTitleConfirm { number, .. } => {
                    let title = to_page_space(drawn, self.scale);
                    let probed = self.probe(&title, Field::Title);
                    self.state = match &probed {
                        Ok(text) => SessionState::AwaitingTitleConfirm {
                            number,
                            title,
                            text: text.clone(),
                        },
                        Err(_) => SessionState::AwaitingTitleBox { number },
                    };
                    probed.map(Event::TitleFound)
                }
                _ => Err(self.invalid(name)),
            },
            Command::RunBatch => match self.state {
                SessionState::AwaitingTitleConfirm { number, title, .. } => {
                    self.extract(FieldRects {
                        number,
                        title: Some(title),
                    })
                }
                _ => Err(self.invalid(name)),
            },
            Command::Cancel => match self.state {
                SessionState::AwaitingNumberConfirm { .. } => {
                    self.state = SessionState::AwaitingNumberBox;
                    Ok(Event::Cancelled)
                }
                SessionState::AwaitingTitleConfirm { number, .. } => {
                    self.state = SessionState::AwaitingTitleBox { number };
                    Ok(Event::Cancelled)
                }
                _ => Err(self.invalid(name)),
            },
            Command::ToggleInclude(page) => {
                let selection = self.selection_mut(name)?;
                selection.toggle(page)?;
                Ok(Event::SelectionChanged {
                    included: selection.included_count(),
                })
            }
            Command::SetAll(included) => {
                let selection = self.selection_mut(name)?;
                selection.set_all(included);
                Ok(Event::SelectionChanged {
                    included: selection.included_count(),
                })
            }
            Command::SelectByPrefix { field, prefix } => {
                let selection = self.selection_mut(name)?;
                selection.select_by_prefix(field, &prefix);
                Ok(Event::SelectionChanged {
                    included: selection.included_count(),
                })
            }
            Command::EditOverride { page, field, value } => {
                self.selection_mut(name)?.edit_override(page, field, value)?;
                Ok(Event::Edited)
            }
            Command::RevertOverride { page, field } => {
                self.selection_mut(name)?.revert_override(page, field)?;
                Ok(Event::Edited)
            }
            Command::Export {
                output_dir,
                include_title,
            } => {
                let selection = self.selection().ok_or_else(|| self.invalid(name))?;
                let report = export_selected(
                    selection,
                    self.splitter.as_ref(),
                    &output_dir,
                    include_title,
                )?;
                Ok(Event::Exported(report))
            }
        }
    }

    fn probe(&self, rect: &PageRect, field: Field) -> Result<String, SheetError> {
        RegionExtractor::new(self.extractor.as_ref()).probe(self.current_page, rect, field)
    }

    fn extract(&mut self, rects: FieldRects) -> Result<Event, SheetError> {
        let records = run_batch(self.page_count(), self.extractor.as_ref(), &rects)?;
        let sheets = records.len();
        self.state = SessionState::Ready {
            rects,
            selection: SelectionSet::new(records),
        };
        Ok(Event::Extracted { sheets })
    }

    fn selection_mut(&mut self, command: &str) -> Result<&mut SelectionSet, SheetError> {
        match self.state {
            SessionState::Ready {
                ref mut selection, ..
            } => Ok(selection),
            _ => Err(self.invalid(command)),
        }
    }

    fn invalid(&self, command: &str) -> SheetError {
        SheetError::InvalidCommand {
            command: command.to_string(),
            state: self.state.to_string(),
        }
    }
}
