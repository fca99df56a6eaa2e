//! Depth-first flattening of the forest into pagination groups

use super::hierarchy::Forest;
use crate::error::{Warning, Warnings};
use crate::model::TargetTask;

/// A root task followed by all of its descendants, in output order
///
/// Groups are the unit of pagination: a group is never split across files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskGroup {
    pub tasks: Vec<TargetTask>,
    /// Output rows of the whole group, note rows included
    pub rows: usize,
}

impl TaskGroup {
    pub fn root_line(&self) -> u64 {
        self.tasks.first().map(|t| t.source_line).unwrap_or_default()
    }
}

/// Rows of every subtree, computed bottom-up once
///
/// `row_counts[i]` is the number of rows task `i` occupies on its own.
pub fn subtree_rows(forest: &Forest, row_counts: &[usize]) -> Vec<usize> {
    let mut sizes = row_counts.to_vec();
    // Post-order: reverse of a pre-order walk visits children before parents
    let mut order = Vec::with_capacity(forest.len());
    let mut stack: Vec<usize> = forest.roots.iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(forest.children[node].iter().rev());
    }
    for &node in order.iter().rev() {
        let children: usize = forest.children[node].iter().map(|&c| sizes[c]).sum();
        sizes[node] += children;
    }
    sizes
}

/// Flatten the forest into one group per root
///
/// Children follow their parent in source order at `indent + 1`. With
/// `max_indent` set, deeper tasks are clamped to it and a warning is
/// recorded.
pub fn flatten(
    forest: &Forest,
    tasks: Vec<TargetTask>,
    notes_as_rows: bool,
    max_indent: Option<usize>,
    warnings: &mut Warnings,
) -> Vec<TaskGroup> {
    let row_counts: Vec<usize> = tasks.iter().map(|t| t.row_count(notes_as_rows)).collect();
    let sizes = subtree_rows(forest, &row_counts);
    let mut slots: Vec<Option<TargetTask>> = tasks.into_iter().map(Some).collect();

    let mut groups = Vec::with_capacity(forest.roots.len());
    for &root in &forest.roots {
        let mut group = TaskGroup {
            tasks: Vec::new(),
            rows: sizes[root],
        };
        let mut stack = vec![(root, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            let Some(mut task) = slots[node].take() else {
                continue;
            };
            task.indent = match max_indent {
                Some(max) if depth > max => {
                    warnings.push(Warning::IndentClamped {
                        line: task.source_line,
                        depth,
                        max,
                    });
                    max
                }
                _ => depth,
            };
            group.tasks.push(task);
            stack.extend(forest.children[node].iter().rev().map(|&c| (c, depth + 1)));
        }
        groups.push(group);
    }
    groups
}
