//! Priority and due date mapping

use crate::config::ConvertOptions;
use crate::error::{Warning, Warnings};
use crate::model::{SourcePriority, SourceTask, TargetPriority};
use crate::reader::{COL_DUE_DATE, COL_PRIORITY, COL_TIMEZONE};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Todoist literal for all-day tasks
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Todoist literal for timed tasks (UTC)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Map TickTick's priority to Todoist's scale
///
/// Unknown values fall back to the lowest priority with a warning.
pub fn map_priority(
    task: &SourceTask,
    options: &ConvertOptions,
    warnings: &mut Warnings,
) -> TargetPriority {
    if !options.include_priority {
        return TargetPriority::P4;
    }
    match task.priority.parse::<SourcePriority>() {
        Ok(priority) => priority.into(),
        Err(_) => {
            warnings.push(Warning::UnmappableValue {
                line: task.line,
                column: COL_PRIORITY.to_string(),
                value: task.priority.clone(),
            });
            TargetPriority::P4
        }
    }
}

/// A parsed due date, always in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Parse the date formats found in TickTick exports
///
/// TickTick writes `2024-03-15T09:30:00+0000`; RFC 3339, naive date-times
/// (taken as UTC) and plain dates are accepted too.
pub fn parse_due_date(raw: &str) -> Option<DueDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(DueDate::DateTime(dt.naive_utc()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(DueDate::DateTime(dt.naive_utc()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(DueDate::DateTime(dt));
        }
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(DueDate::Date)
}

/// Render a due date the way Todoist's importer reads it
///
/// All-day dates are stored by TickTick as local midnight converted to UTC.
/// With the task's zone the instant is converted back to that local date.
/// Without one, an all-day instant at or after noon UTC is taken to belong
/// to the next day, which is right for zones between UTC-12 and UTC+12.
pub fn format_due_date(due: DueDate, all_day: bool, zone: Option<Tz>) -> String {
    match due {
        DueDate::Date(date) => date.format(DATE_FORMAT).to_string(),
        DueDate::DateTime(dt) if all_day => {
            let date = match zone {
                Some(tz) => Utc.from_utc_datetime(&dt).with_timezone(&tz).date_naive(),
                None if dt.hour() >= 12 => dt.date() + Duration::days(1),
                None => dt.date(),
            };
            date.format(DATE_FORMAT).to_string()
        }
        DueDate::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
    }
}

/// Reformat a task's due date; unparseable values become "no due date"
///
/// An unknown zone name is reported and the noon rule is used instead.
pub fn map_due_date(task: &SourceTask, warnings: &mut Warnings) -> Option<String> {
    let raw = task.due_date.as_deref()?;
    let Some(due) = parse_due_date(raw) else {
        warnings.push(Warning::UnmappableValue {
            line: task.line,
            column: COL_DUE_DATE.to_string(),
            value: raw.to_string(),
        });
        return None;
    };

    let mut zone = None;
    if task.all_day
        && let Some(ref name) = task.timezone
    {
        zone = name.parse::<Tz>().ok();
        if zone.is_none() {
            warnings.push(Warning::UnmappableValue {
                line: task.line,
                column: COL_TIMEZONE.to_string(),
                value: name.clone(),
            });
        }
    }
    Some(format_due_date(due, task.all_day, zone))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_due(due: &str, all_day: bool) -> SourceTask {
        let mut task = SourceTask::new("1", "Task");
        task.due_date = Some(due.to_string());
        task.all_day = all_day;
        task
    }

    #[test]
    fn ticktick_timestamp_keeps_time() {
        let mut warnings = Warnings::new();
        let task = task_with_due("2024-03-15T09:30:00+0000", false);
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15 09:30")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let mut warnings = Warnings::new();
        let task = task_with_due("2024-03-15T09:30:00+0200", false);
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15 07:30")
        );
    }

    #[test]
    fn all_day_rolls_forward_from_evening_utc() {
        let mut warnings = Warnings::new();
        // Midnight in UTC+2
        let task = task_with_due("2024-03-14T22:00:00+0000", true);
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        // Midnight in UTC-5
        let task = task_with_due("2024-03-15T05:00:00+0000", true);
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
    }

    fn all_day_in_zone(due: &str, zone: &str) -> SourceTask {
        let mut task = task_with_due(due, true);
        task.timezone = Some(zone.to_string());
        task
    }

    #[test]
    fn all_day_uses_task_zone_far_east() {
        let mut warnings = Warnings::new();
        // Midnight 03-15 in UTC+13
        let task = all_day_in_zone("2024-03-14T11:00:00+0000", "Pacific/Tongatapu");
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        // Midnight 03-15 in UTC+14
        let task = all_day_in_zone("2024-03-14T10:00:00+0000", "Pacific/Kiritimati");
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn all_day_uses_task_zone_far_west() {
        let mut warnings = Warnings::new();
        // Midnight 03-15 in UTC-12
        let task = all_day_in_zone("2024-03-15T12:00:00+0000", "Etc/GMT+12");
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        // Midnight 03-15 in UTC-10
        let task = all_day_in_zone("2024-03-15T10:00:00+0000", "Pacific/Honolulu");
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_zone_falls_back_to_noon_rule() {
        let mut warnings = Warnings::new();
        let task = all_day_in_zone("2024-03-14T22:00:00+0000", "Mars/Olympus_Mons");
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-15")
        );
        assert!(matches!(
            warnings.iter().next(),
            Some(Warning::UnmappableValue { column, .. }) if column == COL_TIMEZONE
        ));
    }

    #[test]
    fn zone_is_ignored_for_timed_tasks() {
        let mut warnings = Warnings::new();
        let mut task = task_with_due("2024-03-14T11:00:00+0000", false);
        task.timezone = Some("Pacific/Tongatapu".to_string());
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-03-14 11:00")
        );
    }

    #[test]
    fn plain_date_and_rfc3339() {
        let mut warnings = Warnings::new();
        let task = task_with_due("2024-12-31", false);
        assert_eq!(map_due_date(&task, &mut warnings).as_deref(), Some("2024-12-31"));
        let task = task_with_due("2024-12-31T23:15:00Z", false);
        assert_eq!(
            map_due_date(&task, &mut warnings).as_deref(),
            Some("2024-12-31 23:15")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn unparseable_date_is_dropped_with_warning() {
        let mut warnings = Warnings::new();
        let task = task_with_due("not-a-date", false);
        assert_eq!(map_due_date(&task, &mut warnings), None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn unknown_priority_maps_to_lowest() {
        let mut warnings = Warnings::new();
        let mut task = SourceTask::new("1", "Task");
        task.priority = "7".to_string();
        assert_eq!(
            map_priority(&task, &ConvertOptions::default(), &mut warnings),
            TargetPriority::P4
        );
        assert_eq!(warnings.len(), 1);

        task.priority = "5".to_string();
        assert_eq!(
            map_priority(&task, &ConvertOptions::default(), &mut warnings),
            TargetPriority::P1
        );
    }

    #[test]
    fn priority_mapping_can_be_disabled() {
        let mut warnings = Warnings::new();
        let mut task = SourceTask::new("1", "Task");
        task.priority = "5".to_string();
        let options = ConvertOptions {
            include_priority: false,
            ..Default::default()
        };
        assert_eq!(map_priority(&task, &options, &mut warnings), TargetPriority::P4);
    }
}
