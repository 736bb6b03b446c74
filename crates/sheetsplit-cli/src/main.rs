mod commands;
mod output;

use clap::{Parser, Subcommand};
use sheetsplit_core::geometry::Rect;
use sheetsplit_core::model::Field;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sheetsplit",
    version,
    about = "Split a drawing set into one PDF per sheet, named from its title block"
)]
struct Cli {
    /// Log progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the text inside a box on one page
    Probe {
        /// Path to the PDF
        input_file: PathBuf,

        /// Box as left,top,right,bottom (display pixels)
        #[arg(long, value_name = "L,T,R,B")]
        rect: Rect,

        /// Page to read (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Zoom the box was drawn at
        #[arg(short, long, default_value_t = 1.0)]
        scale: f32,

        /// Treat the box as a title (joins lines into one)
        #[arg(long)]
        title: bool,
    },
    /// Extract number (and title) from every page
    Extract {
        /// Path to the PDF
        input_file: PathBuf,

        /// Sheet number box as left,top,right,bottom
        #[arg(short, long, value_name = "L,T,R,B")]
        number: Rect,

        /// Sheet title box as left,top,right,bottom
        #[arg(short, long, value_name = "L,T,R,B")]
        title: Option<Rect>,

        /// Zoom the boxes were drawn at
        #[arg(short, long, default_value_t = 1.0)]
        scale: f32,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write a review manifest to this JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Save selected sheets from a review manifest as single-page PDFs
    Export {
        /// Manifest written by `sheetsplit extract --out`
        manifest: PathBuf,

        /// Directory to write the sheets to
        #[arg(short = 'd', long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Name files "<number> <title>.pdf" instead of "<number>.pdf"
        #[arg(long)]
        with_title: bool,

        /// Select every sheet
        #[arg(long)]
        all: bool,

        /// Select sheets whose value starts with this prefix (repeatable)
        #[arg(long, value_name = "PREFIX")]
        prefix: Vec<String>,

        /// Field the prefixes are matched against
        #[arg(long, default_value = "number")]
        field: Field,

        /// Select pages, e.g. "1-3,7"
        #[arg(long, value_name = "RANGES")]
        pages: Option<String>,

        /// Output format for the report: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Render a page to a PNG image for locating boxes
    Render {
        /// Path to the PDF
        input_file: PathBuf,

        /// Page to render (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Zoom (1.0 = one pixel per point)
        #[arg(short, long, default_value_t = 1.0)]
        zoom: f32,

        /// PNG file to write
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
    /// Walk through box drawing, review and export interactively
    Session {
        /// Path to the PDF
        input_file: PathBuf,

        /// Zoom boxes are entered at
        #[arg(short, long, default_value_t = 1.0)]
        scale: f32,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Probe {
            input_file,
            rect,
            page,
            scale,
            title,
        } => commands::probe::run(input_file, rect, page, scale, title),
        Commands::Extract {
            input_file,
            number,
            title,
            scale,
            output,
            out,
        } => commands::extract::run(input_file, number, title, scale, &output, out),
        Commands::Export {
            manifest,
            out_dir,
            with_title,
            all,
            prefix,
            field,
            pages,
            output,
        } => commands::export::run(
            manifest,
            out_dir,
            with_title,
            commands::export::Selection {
                all,
                prefixes: prefix,
                field,
                pages,
            },
            &output,
        ),
        Commands::Render {
            input_file,
            page,
            zoom,
            out,
        } => commands::render::run(input_file, page, zoom, out),
        Commands::Session { input_file, scale } => commands::session::run(input_file, scale),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
