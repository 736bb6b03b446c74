use sheetsplit_core::error::SheetError;
use sheetsplit_core::geometry::{DisplayRect, Rect, Scale};
use sheetsplit_core::model::Field;
use sheetsplit_core::render::{save_png, PageRenderer, PdftoppmRenderer};
use sheetsplit_core::session::{Command, Event, Session, SessionState};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::output;

const HELP: &str = "\
Drawing:
  box L,T,R,B          draw the box for the field being asked for
  confirm              accept the extracted text
  skip                 extract without a title
  cancel               redraw the last box
  next                 show the next page
  render FILE          write the current page as a PNG image
Review:
  list                 show extracted sheets
  toggle PAGE          include/exclude a sheet
  all | none           include or exclude every sheet
  prefix TEXT [FIELD]  include sheets whose number (or title) starts with TEXT
  edit PAGE FIELD TEXT replace a sheet's number or title
  revert PAGE FIELD    restore the extracted value
  save FILE            write a review manifest
  export DIR [title]   save included sheets, optionally with titles
Other:
  open FILE            load another PDF and start over
  status | help | quit";

/// A parsed input line.
#[derive(Debug, PartialEq)]
enum Action {
    Apply(Command),
    List,
    Status,
    Help,
    Save(PathBuf),
    Render(PathBuf),
    Quit,
}

pub fn run(pdf_file: PathBuf, scale: f32) -> Result<(), SheetError> {
    let scale = Scale::new(scale)?;
    super::require_pdftotext()?;
    let mut session = Session::open(&pdf_file, scale)?;

    println!(
        "Opened {} ({} pages). Type 'help' for commands.",
        pdf_file.display(),
        session.page_count()
    );
    println!("Draw a box around the sheet number.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("[page {}] > ", session.current_page());
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let action = match parse_line(&line, session.state()) {
            Ok(action) => action,
            Err(msg) => {
                println!("  {msg}");
                continue;
            }
        };
        log::debug!("session action: {:?}", action);

        // Errors are reported and the loop keeps going; nothing here is fatal.
        if let Err(e) = perform(&mut session, action) {
            match e {
                Quit => break,
                Failed(e) => println!("  warning: {e}"),
            }
        }
    }

    Ok(())
}

enum Stop {
    Quit,
    Failed(SheetError),
}

use Stop::{Failed, Quit};

impl From<SheetError> for Stop {
    fn from(e: SheetError) -> Self {
        Failed(e)
    }
}

fn perform(session: &mut Session, action: Action) -> Result<(), Stop> {
    match action {
        Action::Quit => return Err(Quit),
        Action::Help => println!("{HELP}"),
        Action::Status => {
            println!(
                "  {} ({} pages), page {}: {}",
                session.source().display(),
                session.page_count(),
                session.current_page(),
                session.state()
            );
        }
        Action::List => match session.selection() {
            Some(sheets) => output::table::print_sheets(sheets),
            None => println!("  no sheets extracted yet"),
        },
        Action::Save(path) => {
            let manifest = session.manifest().ok_or_else(|| SheetError::InvalidCommand {
                command: "save".into(),
                state: session.state().to_string(),
            })?;
            manifest.save(&path)?;
            println!("  manifest written to {}", path.display());
        }
        Action::Render(path) => {
            let bitmap = PdftoppmRenderer::new(session.source())
                .render(session.current_page(), session.scale())?;
            save_png(&bitmap, &path)?;
            println!(
                "  page {} written to {} ({}x{})",
                session.current_page(),
                path.display(),
                bitmap.width(),
                bitmap.height()
            );
        }
        Action::Apply(command) => {
            let event = session.apply(command)?;
            report(session, event);
        }
    }
    Ok(())
}

fn report(session: &Session, event: Event) {
    match event {
        Event::Uploaded { page_count } => {
            println!("  opened ({page_count} pages). Draw a box around the sheet number.")
        }
        Event::PageShown(page) => println!("  showing page {page}"),
        Event::NumberFound(text) => {
            println!("  sheet number: {text}");
            println!("  is this correct? confirm (then draw the title box) / skip (no title) / cancel");
        }
        Event::AwaitingTitle => println!("  draw a box around the sheet title"),
        Event::TitleFound(text) => {
            println!("  sheet title: {text}");
            println!("  is this correct? confirm (extract all sheets) / cancel");
        }
        Event::Cancelled => println!("  {}", session.state()),
        Event::Extracted { sheets } => {
            println!("  extracted {sheets} sheet(s)");
            if let Some(selection) = session.selection() {
                output::table::print_sheets(selection);
            }
        }
        Event::SelectionChanged { included } => println!("  {included} sheet(s) selected"),
        Event::Edited => {}
        Event::Exported(report) => output::table::print_report(&report),
    }
}

fn parse_line(line: &str, state: &SessionState) -> Result<Action, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_lowercase();
    let rest: Vec<&str> = words.collect();

    let page = |s: Option<&&str>| -> Result<usize, String> {
        s.ok_or("missing page number")?
            .parse()
            .map_err(|_| "page must be a number".to_string())
    };
    let field = |s: Option<&&str>| -> Result<Field, String> {
        s.ok_or("missing field (number or title)")?.parse()
    };
    let path = |s: &[&str]| -> Result<PathBuf, String> {
        if s.is_empty() {
            Err("missing path".into())
        } else {
            Ok(PathBuf::from(s.join(" ")))
        }
    };

    let command = match verb.as_str() {
        "quit" | "exit" | "q" => return Ok(Action::Quit),
        "help" | "?" => return Ok(Action::Help),
        "status" => return Ok(Action::Status),
        "list" | "ls" => return Ok(Action::List),
        "save" => return path(&rest).map(Action::Save),
        "render" => return path(&rest).map(Action::Render),
        "open" => Command::UploadDocument(path(&rest)?),
        "next" => Command::NextPage,
        "box" => {
            let rect: Rect = rest
                .join("")
                .parse()
                .map_err(|e: SheetError| e.to_string())?;
            match state {
                SessionState::AwaitingTitleBox { .. }
                | SessionState::AwaitingTitleConfirm { .. } => {
                    Command::SetTitleRect(DisplayRect(rect))
                }
                _ => Command::SetNumberRect(DisplayRect(rect)),
            }
        }
        "confirm" | "ok" => match state {
            SessionState::AwaitingTitleConfirm { .. } => Command::RunBatch,
            _ => Command::ConfirmNumber,
        },
        "skip" => Command::SkipTitle,
        "cancel" => Command::Cancel,
        "toggle" => Command::ToggleInclude(page(rest.first())?),
        "all" => Command::SetAll(true),
        "none" => Command::SetAll(false),
        "prefix" => Command::SelectByPrefix {
            prefix: rest.first().ok_or("missing prefix")?.to_string(),
            field: match rest.get(1) {
                Some(_) => field(rest.get(1))?,
                None => Field::Number,
            },
        },
        "edit" => Command::EditOverride {
            page: page(rest.first())?,
            field: field(rest.get(1))?,
            value: rest.get(2..).map(|v| v.join(" ")).unwrap_or_default(),
        },
        "revert" => Command::RevertOverride {
            page: page(rest.first())?,
            field: field(rest.get(1))?,
        },
        "export" => {
            let include_title = rest.last().is_some_and(|w| w.eq_ignore_ascii_case("title"));
            let dir_words = if include_title {
                &rest[..rest.len() - 1]
            } else {
                &rest[..]
            };
            Command::Export {
                output_dir: path(dir_words)?,
                include_title,
            }
        }
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Action::Apply(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsplit_core::batch::FieldRects;
    use sheetsplit_core::geometry::PageRect;
    use sheetsplit_core::model::SheetRecord;
    use sheetsplit_core::selection::SelectionSet;

    #[test]
    fn test_box_targets_the_awaited_field() {
        let rect = DisplayRect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            parse_line("box 1,2,3,4", &SessionState::AwaitingNumberBox).unwrap(),
            Action::Apply(Command::SetNumberRect(rect))
        );
        let title_state = SessionState::AwaitingTitleBox {
            number: PageRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        };
        assert_eq!(
            parse_line("box 1, 2, 3, 4", &title_state).unwrap(),
            Action::Apply(Command::SetTitleRect(rect))
        );
    }

    #[test]
    fn test_edit_keeps_spaces_in_value() {
        assert_eq!(
            parse_line("edit 3 title Floor Plan Level 2", &SessionState::AwaitingNumberBox)
                .unwrap(),
            Action::Apply(Command::EditOverride {
                page: 3,
                field: Field::Title,
                value: "Floor Plan Level 2".into(),
            })
        );
    }

    #[test]
    fn test_export_with_title_flag() {
        assert_eq!(
            parse_line("export out/sheets title", &SessionState::AwaitingNumberBox).unwrap(),
            Action::Apply(Command::Export {
                output_dir: PathBuf::from("out/sheets"),
                include_title: true,
            })
        );
        assert!(parse_line("export", &SessionState::AwaitingNumberBox).is_err());
    }

    #[test]
    fn test_prefix_defaults_to_number() {
        assert_eq!(
            parse_line("prefix A", &SessionState::AwaitingNumberBox).unwrap(),
            Action::Apply(Command::SelectByPrefix {
                field: Field::Number,
                prefix: "A".into(),
            })
        );
    }

    #[test]
    fn test_confirm_follows_the_pending_question() {
        let number = PageRect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let asking_number = SessionState::AwaitingNumberConfirm {
            number,
            text: "A-101".into(),
        };
        assert_eq!(
            parse_line("confirm", &asking_number).unwrap(),
            Action::Apply(Command::ConfirmNumber)
        );
        let asking_title = SessionState::AwaitingTitleConfirm {
            number,
            title: number,
            text: "Floor Plan".into(),
        };
        assert_eq!(
            parse_line("ok", &asking_title).unwrap(),
            Action::Apply(Command::RunBatch)
        );
    }

    #[test]
    fn test_confirm_after_extraction_does_not_rerun() {
        let ready = SessionState::Ready {
            rects: FieldRects {
                number: PageRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
                title: None,
            },
            selection: SelectionSet::new(vec![SheetRecord::new(1, "A-101".into(), String::new())]),
        };
        assert_ne!(
            parse_line("confirm", &ready).unwrap(),
            Action::Apply(Command::RunBatch)
        );
    }

    #[test]
    fn test_rejects_unknown_and_malformed() {
        let state = SessionState::AwaitingNumberBox;
        assert!(parse_line("frobnicate", &state).is_err());
        assert!(parse_line("toggle x", &state).is_err());
        assert!(parse_line("box 1,2,3", &state).is_err());
        assert!(parse_line("revert 1 label", &state).is_err());
    }
}
