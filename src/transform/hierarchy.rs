//! Parent/child reconstruction
//!
//! Exports encode hierarchy in one of two ways: an explicit `parentId`
//! column, or indentation in front of the title. The convention is detected
//! once per file; the chosen strategy yields one parent id per task and a
//! single routine turns those ids into a forest.

use crate::error::{Warning, Warnings};
use crate::model::SourceTask;
use crate::reader::{COL_PARENT_ID, SourceTable};
use std::collections::HashMap;

/// Source of parent references for every task of a file
pub trait HierarchyStrategy {
    fn name(&self) -> &'static str;

    /// Parent id per task, in task order
    fn parent_ids(&self, tasks: &[SourceTask]) -> Vec<Option<String>>;
}

/// Parents come from the `parentId` column
pub struct ParentIdColumn;

impl HierarchyStrategy for ParentIdColumn {
    fn name(&self) -> &'static str {
        "parent-id"
    }

    fn parent_ids(&self, tasks: &[SourceTask]) -> Vec<Option<String>> {
        tasks.iter().map(|t| t.parent_id.clone()).collect()
    }
}

/// Parents are implied by leading indentation of the title
///
/// A tab, or two spaces, is one level. A task's parent is the nearest
/// preceding task with a smaller depth.
pub struct Indentation;

impl Indentation {
    pub fn depth(title: &str) -> usize {
        let mut tabs = 0;
        let mut spaces = 0;
        for c in title.chars() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        tabs + spaces / 2
    }
}

impl HierarchyStrategy for Indentation {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn parent_ids(&self, tasks: &[SourceTask]) -> Vec<Option<String>> {
        let mut stack: Vec<(usize, &str)> = Vec::new();
        let mut parents = Vec::with_capacity(tasks.len());
        for task in tasks {
            let depth = Self::depth(&task.title);
            while stack.last().is_some_and(|&(d, _)| d >= depth) {
                stack.pop();
            }
            parents.push(stack.last().map(|&(_, id)| id.to_string()));
            stack.push((depth, task.id.as_str()));
        }
        parents
    }
}

/// Every task is top-level
pub struct Flat;

impl HierarchyStrategy for Flat {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn parent_ids(&self, tasks: &[SourceTask]) -> Vec<Option<String>> {
        vec![None; tasks.len()]
    }
}

/// Choose the hierarchy convention of a file from its columns and titles
pub fn detect_strategy(table: &SourceTable) -> Box<dyn HierarchyStrategy> {
    let strategy: Box<dyn HierarchyStrategy> = if table.has_column(COL_PARENT_ID) {
        Box::new(ParentIdColumn)
    } else if table
        .tasks
        .iter()
        .any(|t| t.title.starts_with([' ', '\t']))
    {
        Box::new(Indentation)
    } else {
        Box::new(Flat)
    };
    log::debug!("Hierarchy convention: {}", strategy.name());
    strategy
}

/// Trees over task indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    /// Top-level tasks in source order
    pub roots: Vec<usize>,
    /// Children of each task in source order
    pub children: Vec<Vec<usize>>,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Build the forest of a file
///
/// Parent references that do not resolve (unknown id, self reference, or a
/// cycle) are dropped with a warning and the task becomes a root. In a cycle
/// the earliest task in source order is the one detached.
pub fn build_hierarchy(
    tasks: &[SourceTask],
    strategy: &dyn HierarchyStrategy,
    warnings: &mut Warnings,
) -> Forest {
    let index: HashMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    let dangling = |i: usize, parent_id: &str, warnings: &mut Warnings| {
        warnings.push(Warning::DanglingParent {
            line: tasks[i].line,
            task_id: tasks[i].id.clone(),
            parent_id: parent_id.to_string(),
        });
    };

    let parent_ids = strategy.parent_ids(tasks);
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(tasks.len());
    for (i, parent_id) in parent_ids.iter().enumerate() {
        let resolved = match parent_id.as_deref() {
            None => None,
            Some(pid) => match index.get(pid) {
                Some(&p) if p != i => Some(p),
                _ => {
                    dangling(i, pid, warnings);
                    None
                }
            },
        };
        parents.push(resolved);
    }

    let mut state = vec![Visit::Unvisited; tasks.len()];
    for start in 0..tasks.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            match state[node] {
                Visit::Done => break,
                Visit::InProgress => {
                    if let Some(pos) = path.iter().position(|&p| p == node)
                        && let Some(&cut) = path[pos..].iter().min()
                    {
                        let pid = parent_ids[cut].as_deref().unwrap_or_default();
                        dangling(cut, pid, warnings);
                        parents[cut] = None;
                    }
                    break;
                }
                Visit::Unvisited => {
                    state[node] = Visit::InProgress;
                    path.push(node);
                    current = parents[node];
                }
            }
        }
        for node in path {
            state[node] = Visit::Done;
        }
    }

    let mut forest = Forest {
        roots: Vec::new(),
        children: vec![Vec::new(); tasks.len()],
    };
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => forest.children[*p].push(i),
            None => forest.roots.push(i),
        }
    }
    forest
}
