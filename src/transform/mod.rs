//! TickTick → Todoist transformation
//!
//! - `hierarchy`: hierarchy detection and forest building
//! - `labels`: folder/list/tag label mapping
//! - `fields`: priority and due date mapping
//! - `sanitize`: text cleaning for the Todoist CSV dialect
//! - `flatten`: depth-first flattening into pagination groups

mod fields;
mod flatten;
mod hierarchy;
mod labels;
mod sanitize;

pub use fields::{DueDate, format_due_date, map_due_date, map_priority, parse_due_date};
pub use flatten::{TaskGroup, flatten, subtree_rows};
pub use hierarchy::{
    Flat, Forest, HierarchyStrategy, Indentation, ParentIdColumn, build_hierarchy,
    detect_strategy,
};
pub use labels::{map_labels, normalize_label};
pub use sanitize::sanitize_text;

use crate::config::ConvertOptions;
use crate::error::{Warning, Warnings};
use crate::model::{SourceTask, TargetTask};
use crate::reader::SourceTable;

/// Content used when a title is empty after cleaning
pub const UNTITLED: &str = "(untitled)";

/// Stand-in for `@` in titles; Todoist reads `@word` in CONTENT as a label
pub const AT_SIGN_REPLACEMENT: &str = "\u{FF20}";

/// Map one source task to Todoist's model
///
/// The indent level is left at 1; `flatten` assigns the real depth.
pub fn map_task(
    task: &SourceTask,
    options: &ConvertOptions,
    warnings: &mut Warnings,
) -> TargetTask {
    let clean =
        |text: &str| sanitize_text(text, &options.newline_placeholder, options.strip_emoji);

    let mut content = clean(&task.title).replace('@', AT_SIGN_REPLACEMENT);
    if content.is_empty() {
        warnings.push(Warning::EmptyTitle { line: task.line });
        content = UNTITLED.to_string();
    }
    let description = Some(clean(&task.description)).filter(|d| !d.is_empty());

    let mut target = TargetTask {
        content,
        description,
        labels: map_labels(task, options, warnings),
        due_date: map_due_date(task, warnings),
        priority: map_priority(task, options, warnings),
        indent: 1,
        checked: task.completed,
        source_line: task.line,
    };
    if target.checked
        && let Some(ref label) = options.completed_label
    {
        target.add_label(normalize_label(label));
    }
    target
}

/// Run the whole transformation over a parsed file
pub fn transform(
    table: &SourceTable,
    options: &ConvertOptions,
    warnings: &mut Warnings,
) -> Vec<TaskGroup> {
    let strategy = detect_strategy(table);
    let forest = build_hierarchy(&table.tasks, strategy.as_ref(), warnings);

    let targets: Vec<TargetTask> = table
        .tasks
        .iter()
        .map(|task| map_task(task, options, warnings))
        .collect();

    let groups = flatten(
        &forest,
        targets,
        options.notes_as_rows,
        options.max_indent,
        warnings,
    );
    log::debug!(
        "Flattened {} task(s) into {} top-level group(s) using {} hierarchy",
        table.tasks.len(),
        groups.len(),
        strategy.name()
    );
    groups
}
