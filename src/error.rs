//! Error and warning types
//!
//! Fatal problems (the whole file cannot be converted) are `ConvertError`s.
//! Per-row problems are recovered with a safe default and recorded as a
//! `Warning`; they never abort the run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal conversion error
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{}: missing required column(s): {}", .path.display(), .missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    #[error("{}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed CSV: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: invalid configuration: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl ConvertError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Recoverable, per-row anomaly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A field was not valid in the assumed encoding and had its bytes repaired
    Encoding { line: u64, column: String },
    /// A priority or date value outside the known domain was replaced by a default
    UnmappableValue {
        line: u64,
        column: String,
        value: String,
    },
    /// Two distinct source labels normalized to the same label
    LabelCollision {
        line: u64,
        label: String,
        sources: Vec<String>,
    },
    /// A parent id that does not resolve to an ancestor in the file
    DanglingParent {
        line: u64,
        task_id: String,
        parent_id: String,
    },
    /// A title that sanitized to nothing
    EmptyTitle { line: u64 },
    /// Depth exceeded the configured indent ceiling
    IndentClamped { line: u64, depth: usize, max: usize },
    /// A single subtree larger than the row limit, written whole
    OversizedGroup {
        root_line: u64,
        rows: usize,
        max_rows: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Encoding { line, column } => {
                write!(f, "line {}: repaired undecodable bytes in '{}'", line, column)
            }
            Warning::UnmappableValue {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: unrecognized {} '{}', using default",
                line, column, value
            ),
            Warning::LabelCollision {
                line,
                label,
                sources,
            } => write!(
                f,
                "line {}: labels {} all map to '{}'",
                line,
                sources
                    .iter()
                    .map(|s| format!("'{}'", s))
                    .collect::<Vec<_>>()
                    .join(", "),
                label
            ),
            Warning::DanglingParent {
                line,
                task_id,
                parent_id,
            } => write!(
                f,
                "line {}: task '{}' references unknown parent '{}', treating it as top-level",
                line, task_id, parent_id
            ),
            Warning::EmptyTitle { line } => {
                write!(f, "line {}: title is empty after cleaning", line)
            }
            Warning::IndentClamped { line, depth, max } => write!(
                f,
                "line {}: depth {} exceeds max indent {}, clamped",
                line, depth, max
            ),
            Warning::OversizedGroup {
                root_line,
                rows,
                max_rows,
            } => write!(
                f,
                "line {}: task tree has {} rows, more than the {} row limit; written whole to its own file",
                root_line, rows, max_rows
            ),
        }
    }
}

/// Warning sink shared by every pipeline stage
///
/// Each warning is logged when it is recorded so that progress output and
/// warnings interleave in source order.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.items.push(warning);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.items
    }
}
