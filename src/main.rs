//! TickTick → Todoist converter - Main Entry Point
//!
//! The conversion itself lives in the `ticktick_to_todoist` library; this
//! binary gathers options, sets up logging and maps the outcome to an exit
//! code.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use ticktick_to_todoist::formatting::format_report;
use ticktick_to_todoist::{ConvertOptions, Converter, SourceEncoding};

/// Convert a TickTick backup CSV into Todoist CSV import files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TickTick backup CSV
    input: PathBuf,

    /// Directory for the generated files (default: next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Source encoding: auto, utf-8 or latin-1
    #[arg(short, long)]
    encoding: Option<SourceEncoding>,

    /// Maximum rows per output file
    #[arg(short, long)]
    max_rows: Option<usize>,

    /// Base name of the generated files
    #[arg(short, long)]
    name: Option<String>,

    /// TOML file with conversion options; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give every task Todoist's lowest priority
    #[arg(long)]
    no_priority: bool,

    /// Label tasks with part_<N>_of_<M> when the output is split
    #[arg(long)]
    part_labels: bool,

    /// Write descriptions as note rows instead of the DESCRIPTION column
    #[arg(long)]
    notes: bool,

    /// Clamp indentation to this depth (Todoist displays 4 levels)
    #[arg(long)]
    max_indent: Option<usize>,

    /// Remove emoji and other symbols from text
    #[arg(long)]
    strip_emoji: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Options file (if any) with command-line flags applied on top
    fn options(&self) -> Result<ConvertOptions> {
        let mut options = match self.config {
            Some(ref path) => ConvertOptions::load(path)
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => ConvertOptions::default(),
        };
        if let Some(ref dir) = self.output_dir {
            options.output_dir = Some(dir.clone());
        }
        if let Some(encoding) = self.encoding {
            options.encoding = encoding;
        }
        if let Some(max_rows) = self.max_rows {
            options.max_rows = max_rows;
        }
        if let Some(ref name) = self.name {
            options.base_name = name.clone();
        }
        if let Some(max_indent) = self.max_indent {
            options.max_indent = Some(max_indent);
        }
        options.include_priority &= !self.no_priority;
        options.part_labels |= self.part_labels;
        options.notes_as_rows |= self.notes;
        options.strip_emoji |= self.strip_emoji;
        Ok(options)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let options = args.options()?;
    let converter = Converter::new(options)?;
    let report = converter
        .convert(&args.input)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;
    print!("{}", format_report(&report));
    Ok(())
}

fn main() -> ExitCode {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        return ExitCode::from(2);
    }

    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
