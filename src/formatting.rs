//! Formatting helpers for the conversion summary
//!
//! This module turns a `ConversionReport` into the text printed by the
//! command-line tool.

use crate::ConversionReport;
use crate::error::Warning;

/// Short category name used when grouping warnings
pub fn warning_kind(warning: &Warning) -> &'static str {
    match warning {
        Warning::Encoding { .. } => "encoding repairs",
        Warning::UnmappableValue { .. } => "unmappable values",
        Warning::LabelCollision { .. } => "label collisions",
        Warning::DanglingParent { .. } => "unresolved parents",
        Warning::EmptyTitle { .. } => "empty titles",
        Warning::IndentClamped { .. } => "clamped indents",
        Warning::OversizedGroup { .. } => "oversized task trees",
    }
}

/// Count warnings per category, in first-seen order
pub fn summarize_warnings(warnings: &[Warning]) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for warning in warnings {
        let kind = warning_kind(warning);
        match counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
}

/// Format a report into a display string
///
/// # Arguments
/// * `report` - Result of a conversion run
///
/// # Returns
/// One line per output file followed by a warning summary
pub fn format_report(report: &ConversionReport) -> String {
    let mut result = format!(
        "Converted {} task(s) from {} into {} file(s):\n",
        report.source_tasks,
        report.input.display(),
        report.files.len()
    );
    for file in &report.files {
        result.push_str(&format!(
            "- {} ({} task(s), {} row(s))",
            file.path.display(),
            file.tasks,
            file.rows
        ));
        if file.rows > report.max_rows {
            result.push_str(&format!(
                " exceeds the {} row limit: a single task tree cannot be split",
                report.max_rows
            ));
        }
        result.push('\n');
    }

    if report.warnings.is_empty() {
        result.push_str("No warnings\n");
    } else {
        result.push_str(&format!("{} warning(s):\n", report.warnings.len()));
        for (kind, count) in summarize_warnings(&report.warnings) {
            result.push_str(&format!("  {}: {}\n", kind, count));
        }
    }
    result
}
