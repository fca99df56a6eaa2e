//! TickTick → Todoist CSV converter
//!
//! This library converts a TickTick backup CSV into one or more files that
//! Todoist's CSV importer accepts. Todoist expresses hierarchy with an
//! `INDENT` column and row order instead of parent references, and refuses
//! files with more than 300 tasks, so the conversion has to rebuild the task
//! trees, flatten them and split the output without ever separating a task
//! from its subtasks.
//!
//! # Architecture
//!
//! The conversion is a strictly sequential pipeline:
//! - **Reader**: `reader` - parses the export, tolerating encoding glitches
//! - **Transformer**: `transform` - hierarchy, labels, priorities, dates, text
//! - **Writer**: `writer` - pagination and atomic file output
//!
//! Per-row problems are recovered and reported as `Warning`s; only
//! whole-file problems produce a `ConvertError`.
//!
//! # Example
//!
//! ```no_run
//! use ticktick_to_todoist::{ConvertOptions, Converter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let converter = Converter::new(ConvertOptions::default())?;
//!     let report = converter.convert("ticktick_backup.csv")?;
//!     for file in &report.files {
//!         println!("{} ({} rows)", file.path.display(), file.rows);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatting;
pub mod model;
pub mod reader;
pub mod transform;
pub mod writer;

use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use config::{ConvertOptions, SourceEncoding};
pub use error::{ConvertError, Result, Warning, Warnings};
pub use model::{SourcePriority, SourceTask, TargetPriority, TargetTask};

/// One written Todoist import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    /// Rows below the header, note rows included
    pub rows: usize,
    pub tasks: usize,
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub files: Vec<OutputFile>,
    /// Tasks read from the source file
    pub source_tasks: usize,
    pub warnings: Vec<Warning>,
    pub max_rows: usize,
}

impl ConversionReport {
    /// Files holding a single subtree larger than the row limit
    pub fn oversized_files(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.iter().filter(move |f| f.rows > self.max_rows)
    }
}

/// Runs the reader → transformer → writer pipeline with fixed options
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter, rejecting invalid options up front
    ///
    /// # Example
    /// ```
    /// # use ticktick_to_todoist::{ConvertOptions, Converter};
    /// let converter = Converter::new(ConvertOptions::default()).unwrap();
    /// assert_eq!(converter.options().max_rows, 300);
    /// ```
    pub fn new(options: ConvertOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Directory output files are written to for a given input
    pub fn output_dir(&self, input: &Path) -> PathBuf {
        match self.options.output_dir {
            Some(ref dir) => dir.clone(),
            None => match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    /// Convert one TickTick export
    ///
    /// Nothing is written when the file cannot be read or lacks required
    /// columns. Per-row recoveries are listed in the report's warnings.
    pub fn convert(&self, input: impl AsRef<Path>) -> Result<ConversionReport> {
        let input = input.as_ref();
        let mut warnings = Warnings::new();

        let table = reader::read_source(input, self.options.encoding, &mut warnings)?;
        let source_tasks = table.tasks.len();

        let groups = transform::transform(&table, &self.options, &mut warnings);
        let mut pages = writer::paginate(groups, self.options.max_rows, &mut warnings);
        if self.options.part_labels {
            writer::label_parts(&mut pages);
        }

        let dir = self.output_dir(input);
        let paths = writer::write_pages(&pages, &dir, &self.options)?;

        let files = paths
            .into_iter()
            .zip(&pages)
            .map(|(path, page)| OutputFile {
                path,
                rows: page.rows,
                tasks: page.task_count(),
            })
            .collect();

        Ok(ConversionReport {
            input: input.to_path_buf(),
            files,
            source_tasks,
            warnings: warnings.into_vec(),
            max_rows: self.options.max_rows,
        })
    }
}
