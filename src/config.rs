//! Conversion options
//!
//! Options can be loaded from a TOML file; every field has a default so a
//! partial file (or no file at all) is valid. Command-line flags are applied
//! on top by the binary.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Todoist refuses to import more tasks than this into a single project
pub const DEFAULT_MAX_ROWS: usize = 300;

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}
fn default_base_name() -> String {
    "todoist_import".to_string()
}
fn default_newline_placeholder() -> String {
    " ".to_string()
}
fn default_true() -> bool {
    true
}
fn default_completed_label() -> Option<String> {
    Some("completed".to_string())
}

/// Character encoding assumed for the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    /// UTF-8, repairing individual fields as ISO-8859-1 when they are not valid UTF-8
    #[default]
    Auto,
    /// UTF-8, replacing undecodable bytes with U+FFFD
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1 for every field
    #[serde(rename = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceEncoding::Auto),
            "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(SourceEncoding::Latin1),
            _ => Err(format!(
                "Invalid encoding '{}'. Valid options are: auto, utf-8, latin-1",
                s
            )),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceEncoding::Auto => "auto",
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Latin1 => "latin-1",
        };
        f.write_str(name)
    }
}

/// Options controlling one conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Maximum rows (tasks and notes, header excluded) per output file
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    pub encoding: SourceEncoding,
    /// Output directory; the input file's directory when unset
    pub output_dir: Option<PathBuf>,
    /// File name stem for output files (`<base>.csv`, `<base>_part<N>.csv`)
    #[serde(default = "default_base_name")]
    pub base_name: String,
    /// Replacement for line breaks inside a text field
    #[serde(default = "default_newline_placeholder")]
    pub newline_placeholder: String,
    /// When false every task gets Todoist's lowest priority
    #[serde(default = "default_true")]
    pub include_priority: bool,
    pub folder_label_prefix: String,
    pub list_label_prefix: String,
    /// Label attached to completed tasks; Todoist CSV has no completion column
    #[serde(default = "default_completed_label")]
    pub completed_label: Option<String>,
    /// Add `part_<N>_of_<M>` labels when the output spans several files
    pub part_labels: bool,
    /// Emit descriptions as `note` rows instead of the DESCRIPTION column
    pub notes_as_rows: bool,
    /// Clamp indent levels; unset keeps every child at parent + 1
    pub max_indent: Option<usize>,
    /// Drop characters that are neither ASCII nor alphanumeric (emoji, symbols)
    pub strip_emoji: bool,
    /// Prefix output files with a UTF-8 byte-order mark
    #[serde(default = "default_true")]
    pub write_bom: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            encoding: SourceEncoding::default(),
            output_dir: None,
            base_name: default_base_name(),
            newline_placeholder: default_newline_placeholder(),
            include_priority: true,
            folder_label_prefix: String::new(),
            list_label_prefix: String::new(),
            completed_label: default_completed_label(),
            part_labels: false,
            notes_as_rows: false,
            max_indent: None,
            strip_emoji: false,
            write_bom: true,
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConvertError::fs(path, e))?;
        let options: ConvertOptions =
            toml::from_str(&content).map_err(|source| ConvertError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(options)
    }

    /// Reject option combinations that cannot produce valid output
    pub fn validate(&self) -> Result<()> {
        if self.max_rows == 0 {
            return Err(ConvertError::InvalidOption(
                "max_rows must be at least 1".to_string(),
            ));
        }
        if self.max_indent == Some(0) {
            return Err(ConvertError::InvalidOption(
                "max_indent must be at least 1".to_string(),
            ));
        }
        let base = self.base_name.trim();
        if base.is_empty() || base.contains(['/', '\\']) {
            return Err(ConvertError::InvalidOption(format!(
                "invalid output base name '{}'",
                self.base_name
            )));
        }
        if self.newline_placeholder.contains(['\n', '\r']) {
            return Err(ConvertError::InvalidOption(
                "newline_placeholder must not contain line breaks".to_string(),
            ));
        }
        Ok(())
    }
}
