//! Folder, list and tag → Todoist label mapping

use crate::config::ConvertOptions;
use crate::error::{Warning, Warnings};
use crate::model::SourceTask;

/// Turn free text into a Todoist label
///
/// Labels are lowercase; whitespace, `-`, `,` and `@` become `_`; anything
/// else that is neither alphanumeric nor `_` is dropped. Runs of `_` are
/// collapsed and trimmed from both ends. The result may be empty.
pub fn normalize_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        let c = if c.is_whitespace() || matches!(c, '-' | ',' | '@') {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !label.is_empty() && !label.ends_with('_') {
                label.push('_');
            }
        } else if c.is_alphanumeric() {
            label.extend(c.to_lowercase());
        }
    }
    while label.ends_with('_') {
        label.pop();
    }
    label
}

/// Merge a task's folder, list and tags into one deduplicated label set
///
/// Labels keep first-seen order (folder, list, then tags). When two
/// different source names collapse into the same label the collision is
/// recorded but the label is kept once.
pub fn map_labels(
    task: &SourceTask,
    options: &ConvertOptions,
    warnings: &mut Warnings,
) -> Vec<String> {
    let mut candidates: Vec<(&str, &str)> = Vec::new();
    if let Some(ref folder) = task.folder {
        candidates.push((options.folder_label_prefix.as_str(), folder.as_str()));
    }
    if let Some(ref list) = task.list {
        candidates.push((options.list_label_prefix.as_str(), list.as_str()));
    }
    for tag in &task.tags {
        candidates.push(("", tag.as_str()));
    }

    let mut labels: Vec<String> = Vec::new();
    let mut origins: Vec<&str> = Vec::new();
    for (prefix, raw) in candidates {
        let base = normalize_label(raw);
        if base.is_empty() {
            continue;
        }
        let label = format!("{}{}", prefix, base);
        let raw = raw.trim();
        match labels.iter().position(|l| *l == label) {
            Some(pos) => {
                if origins[pos] != raw {
                    warnings.push(Warning::LabelCollision {
                        line: task.line,
                        label,
                        sources: vec![origins[pos].to_string(), raw.to_string()],
                    });
                }
            }
            None => {
                labels.push(label);
                origins.push(raw);
            }
        }
    }
    labels
}
