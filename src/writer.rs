//! Todoist CSV writer
//!
//! Groups are packed greedily into pages of at most `max_rows` rows. Every
//! page is staged in a temporary file inside the output directory and only
//! renamed into place once all pages have been written, so a failed run
//! never leaves partial output behind.

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result, Warning, Warnings};
use crate::model::TargetRow;
use crate::transform::TaskGroup;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Contents of one output file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub groups: Vec<TaskGroup>,
    /// Rows on this page, header excluded
    pub rows: usize,
}

impl Page {
    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    fn push(&mut self, group: TaskGroup) {
        self.rows += group.rows;
        self.groups.push(group);
    }
}

/// Pack groups into pages without splitting any group
///
/// A group that does not fit in the current page starts a new one. A group
/// larger than `max_rows` on its own is written whole to its own page and
/// reported, since splitting it would separate children from their parent.
/// An empty input yields a single empty page so a header-only file is still
/// produced.
pub fn paginate(groups: Vec<TaskGroup>, max_rows: usize, warnings: &mut Warnings) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();

    for group in groups {
        if group.rows > max_rows {
            warnings.push(Warning::OversizedGroup {
                root_line: group.root_line(),
                rows: group.rows,
                max_rows,
            });
        }
        if current.rows > 0 && current.rows + group.rows > max_rows {
            pages.push(std::mem::take(&mut current));
        }
        current.push(group);
    }
    if current.rows > 0 || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// `<base>.csv` for a single file, `<base>_part<N>.csv` otherwise
pub fn output_file_name(base: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("{}_part{}.csv", base, index + 1)
    } else {
        format!("{}.csv", base)
    }
}

/// Add `part_<N>_of_<M>` to every task when the output is split
pub fn label_parts(pages: &mut [Page]) {
    let total = pages.len();
    if total < 2 {
        return;
    }
    for (i, page) in pages.iter_mut().enumerate() {
        let label = format!("part_{}_of_{}", i + 1, total);
        for task in page.groups.iter_mut().flat_map(|g| g.tasks.iter_mut()) {
            task.add_label(label.clone());
        }
    }
}

/// Serialize one page in the Todoist dialect
pub fn write_page<W: Write>(out: W, page: &Page, options: &ConvertOptions) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(TargetRow::HEADER)?;
    for task in page.groups.iter().flat_map(|g| g.tasks.iter()) {
        for row in TargetRow::from_task(task, options.notes_as_rows) {
            writer.write_record(row.to_record())?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write all pages into `dir`, returning the final paths in page order
pub fn write_pages(pages: &[Page], dir: &Path, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| ConvertError::fs(dir, e))?;

    let mut staged: Vec<(NamedTempFile, PathBuf)> = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let path = dir.join(output_file_name(&options.base_name, i, pages.len()));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::fs(dir, e))?;
        if options.write_bom {
            tmp.write_all(UTF8_BOM)
                .map_err(|e| ConvertError::fs(tmp.path(), e))?;
        }
        write_page(tmp.as_file_mut(), page, options).map_err(|source| ConvertError::Csv {
            path: path.clone(),
            source,
        })?;
        staged.push((tmp, path));
    }

    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = tmp.persist(&path) {
            for done in &written {
                fs::remove_file(done).ok();
            }
            return Err(ConvertError::fs(path, e.error));
        }
        log::debug!("Created {} with {} row(s)", path.display(), pages[written.len()].rows);
        written.push(path);
    }
    Ok(written)
}
