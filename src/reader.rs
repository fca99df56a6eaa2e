//! TickTick backup CSV reader
//!
//! TickTick writes a few metadata lines (export date, app version and a
//! multi-line status legend) before the real header row. The reader skips
//! them, maps columns by name and decodes each field on its own so that a
//! single badly encoded cell never spoils the whole file.

use crate::config::SourceEncoding;
use crate::error::{ConvertError, Result, Warning, Warnings};
use crate::model::SourceTask;
use csv::{ByteRecord, ReaderBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const COL_FOLDER: &str = "Folder Name";
pub const COL_LIST: &str = "List Name";
pub const COL_TITLE: &str = "Title";
pub const COL_TAGS: &str = "Tags";
pub const COL_CONTENT: &str = "Content";
pub const COL_DUE_DATE: &str = "Due Date";
pub const COL_PRIORITY: &str = "Priority";
pub const COL_STATUS: &str = "Status";
pub const COL_ALL_DAY: &str = "Is All Day";
pub const COL_TIMEZONE: &str = "Timezone";
pub const COL_TASK_ID: &str = "taskId";
pub const COL_PARENT_ID: &str = "parentId";

/// Columns without which a file cannot be converted
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_FOLDER,
    COL_LIST,
    COL_TITLE,
    COL_TAGS,
    COL_CONTENT,
    COL_DUE_DATE,
    COL_PRIORITY,
    COL_STATUS,
];

/// How far into the file the header row is searched for
const HEADER_SEARCH_LIMIT: usize = 16;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed source file
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    /// Header cells as they appear in the file
    pub header: Vec<String>,
    /// Tasks in source row order
    pub tasks: Vec<SourceTask>,
}

impl SourceTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.header.iter().any(|h| column_matches(h, name))
    }
}

fn column_matches(cell: &str, name: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(name)
}

/// Positions of the columns the converter reads
#[derive(Debug)]
struct ColumnMap {
    folder: usize,
    list: usize,
    title: usize,
    tags: usize,
    content: usize,
    due_date: usize,
    priority: usize,
    status: usize,
    all_day: Option<usize>,
    timezone: Option<usize>,
    task_id: Option<usize>,
    parent_id: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> std::result::Result<Self, Vec<String>> {
        let find = |name: &str| header.iter().position(|h| column_matches(h, name));

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let required = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            folder: required(COL_FOLDER),
            list: required(COL_LIST),
            title: required(COL_TITLE),
            tags: required(COL_TAGS),
            content: required(COL_CONTENT),
            due_date: required(COL_DUE_DATE),
            priority: required(COL_PRIORITY),
            status: required(COL_STATUS),
            all_day: find(COL_ALL_DAY),
            timezone: find(COL_TIMEZONE),
            task_id: find(COL_TASK_ID),
            parent_id: find(COL_PARENT_ID),
        })
    }
}

/// Decode one field, returning whether its bytes needed repair
pub fn decode_field(bytes: &[u8], encoding: SourceEncoding) -> (String, bool) {
    match encoding {
        SourceEncoding::Latin1 => (decode_latin1(bytes), false),
        SourceEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(s) => (s.to_string(), false),
            Err(_) => (decode_latin1(bytes), true),
        },
        SourceEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => (s.to_string(), false),
            Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
        },
    }
}

/// ISO-8859-1 maps every byte to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Read a TickTick backup file
///
/// # Arguments
/// * `path` - Path to the CSV export
/// * `encoding` - Encoding assumed for the file's bytes
/// * `warnings` - Sink for per-field recoveries
///
/// # Returns
/// The header and the tasks in source order, or a `SchemaError` when a
/// required column is missing
pub fn read_source(
    path: impl AsRef<Path>,
    encoding: SourceEncoding,
    warnings: &mut Warnings,
) -> Result<SourceTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ConvertError::fs(path, e))?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    parse_source(path, &bytes, encoding, warnings)
}

/// Parse an in-memory TickTick export; `path` is only used in errors
pub fn parse_source(
    path: &Path,
    bytes: &[u8],
    encoding: SourceEncoding,
    warnings: &mut Warnings,
) -> Result<SourceTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let csv_error = |source: csv::Error| ConvertError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut records = reader.byte_records();
    let mut first_record: Option<Vec<String>> = None;
    let mut header: Option<Vec<String>> = None;

    for _ in 0..HEADER_SEARCH_LIMIT {
        let Some(record) = records.next() else {
            break;
        };
        let cells = header_cells(&record.map_err(csv_error)?, encoding);
        if cells.iter().any(|c| column_matches(c, COL_TITLE)) {
            header = Some(cells);
            break;
        }
        if first_record.is_none() && cells.iter().any(|c| !c.trim().is_empty()) {
            first_record = Some(cells);
        }
    }

    let Some(header) = header else {
        let seen = first_record.unwrap_or_default();
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !seen.iter().any(|c| column_matches(c, name)))
            .map(|name| name.to_string())
            .collect();
        return Err(ConvertError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    };

    let columns = ColumnMap::from_header(&header).map_err(|missing| ConvertError::Schema {
        path: path.to_path_buf(),
        missing,
    })?;

    let mut tasks = Vec::new();
    let mut seen_ids = HashSet::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|field| field.trim_ascii().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let mut task = RowDecoder {
            record: &record,
            header: &header,
            encoding,
            line,
            warnings: &mut *warnings,
        }
        .decode(&columns);

        if !seen_ids.insert(task.id.clone()) {
            warnings.push(Warning::UnmappableValue {
                line,
                column: COL_TASK_ID.to_string(),
                value: task.id.clone(),
            });
            task.id = unique_id(&task.id, line, &seen_ids);
            seen_ids.insert(task.id.clone());
        }
        tasks.push(task);
    }

    log::info!("Parsed {} task(s) from {}", tasks.len(), path.display());
    Ok(SourceTable { header, tasks })
}

/// `<id>#<line>`, suffixed further until no task already uses it
fn unique_id(id: &str, line: u64, seen: &HashSet<String>) -> String {
    let base = format!("{}#{}", id, line);
    let mut candidate = base.clone();
    let mut n = 1;
    while seen.contains(&candidate) {
        n += 1;
        candidate = format!("{}.{}", base, n);
    }
    candidate
}

/// Header cells are decoded leniently; they are only compared against known names
fn header_cells(record: &ByteRecord, encoding: SourceEncoding) -> Vec<String> {
    record
        .iter()
        .map(|field| decode_field(field, encoding).0)
        .collect()
}

struct RowDecoder<'a> {
    record: &'a ByteRecord,
    header: &'a [String],
    encoding: SourceEncoding,
    line: u64,
    warnings: &'a mut Warnings,
}

impl RowDecoder<'_> {
    /// Decoded cell; missing trailing cells read as empty
    fn field(&mut self, index: usize) -> String {
        let Some(bytes) = self.record.get(index) else {
            return String::new();
        };
        let (value, repaired) = decode_field(bytes, self.encoding);
        if repaired {
            self.warnings.push(Warning::Encoding {
                line: self.line,
                column: self.header[index].trim().to_string(),
            });
        }
        value
    }

    fn optional(&mut self, index: usize) -> Option<String> {
        let value = self.field(index);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn decode(mut self, columns: &ColumnMap) -> SourceTask {
        let line = self.line;
        let id = columns
            .task_id
            .and_then(|i| self.optional(i))
            .unwrap_or_else(|| format!("row-{}", line));
        let parent_id = columns.parent_id.and_then(|i| self.optional(i));
        let all_day = columns
            .all_day
            .and_then(|i| self.optional(i))
            .is_some_and(|v| parse_flag(&v));

        let timezone = columns.timezone.and_then(|i| self.optional(i));

        let status = self.field(columns.status);
        let completed = match status.trim() {
            "" | "0" => false,
            // 1 completed, 2 archived, -1 won't do
            "1" | "2" | "-1" => true,
            other => {
                self.warnings.push(Warning::UnmappableValue {
                    line,
                    column: COL_STATUS.to_string(),
                    value: other.to_string(),
                });
                false
            }
        };

        SourceTask {
            id,
            title: self.field(columns.title),
            description: self.field(columns.content),
            folder: self.optional(columns.folder),
            list: self.optional(columns.list),
            tags: split_tags(&self.field(columns.tags)),
            due_date: self.optional(columns.due_date),
            all_day,
            timezone,
            priority: self.field(columns.priority).trim().to_string(),
            completed,
            parent_id,
            line,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "y" | "yes" | "1"
    )
}

/// Split the comma-separated `Tags` cell, dropping empties and repeats
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim().trim_start_matches('#').trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
