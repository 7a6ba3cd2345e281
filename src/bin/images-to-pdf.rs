//! Images to PDF CLI tool
//!
//! A command-line tool for turning a folder of images into one PDF.

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

use images_to_pdf::convert::{convert_directory, ConvertOptions};
use images_to_pdf::layout::{LayoutPolicy, PageDimensions};
use images_to_pdf::pdf::WriteMode;

/// Images to PDF - one page per image, in filename order
#[derive(Parser)]
#[command(name = "images-to-pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Convert the images in the current folder into out.pdf
    images-to-pdf

    # Convert a folder and move the images into <folder>/archive afterwards
    images-to-pdf -d ~/Pictures/receipts -o receipts.pdf -a

    # Put every image on an A4 page, centred
    images-to-pdf -d scans -o scans.pdf --layout a4 --title \"Scans\"")]
struct Cli {
    /// Folder where images are stored
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Filename of the PDF file
    #[arg(short, long, default_value = "out.pdf")]
    output: PathBuf,

    /// Move the converted images into an "archive" subfolder
    #[arg(short, long)]
    archive: bool,

    /// Page layout
    #[arg(long, value_enum, default_value_t = LayoutArg::Native)]
    layout: LayoutArg,

    /// Document title stored in the PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Fail instead of overwriting an existing output file
    #[arg(long)]
    no_clobber: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Each page is exactly the size of its image
    Native,
    /// A4 pages, image scaled to the page width and centred
    A4,
    /// US Letter pages, image scaled to the page width and centred
    Letter,
}

impl From<LayoutArg> for LayoutPolicy {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Native => LayoutPolicy::NativeSize,
            LayoutArg::A4 => LayoutPolicy::Fixed(PageDimensions::a4()),
            LayoutArg::Letter => LayoutPolicy::Fixed(PageDimensions::letter()),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Logging goes to stderr; RUST_LOG overrides the -v level
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = ConvertOptions {
        source_dir: cli.dir,
        output_path: cli.output,
        archive: cli.archive,
        layout: cli.layout.into(),
        title: cli.title,
        write_mode: if cli.no_clobber {
            WriteMode::CreateNew
        } else {
            WriteMode::Replace
        },
    };

    eprintln!("Converting images in {}...", options.source_dir.display());

    let report = convert_directory(&options).with_context(|| {
        format!(
            "Converting {} to {}",
            options.source_dir.display(),
            options.output_path.display()
        )
    })?;

    eprintln!("Wrote {} pages to {}", report.pages, report.output.display());
    if !report.archived.is_empty() {
        eprintln!("Archived {} images", report.archived.len());
    }

    Ok(())
}
