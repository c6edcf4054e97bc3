use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, Unit};

/// A task as supplied by the embedding application.
///
/// Dates are kept as text and parsed with the chart's date format during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Comma-separated ids of the tasks this one depends on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent: Option<String>,
    /// Completion percentage, 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl TaskRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start: Some(start.into()),
            end: Some(end.into()),
            dependent: None,
            progress: None,
        }
    }

    pub fn depends_on(mut self, ids: impl Into<String>) -> Self {
        self.dependent = Some(ids.into());
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// A normalized task: dates parsed, sequence index assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Insertion order; doubles as the row and the bar lookup key.
    pub index: usize,
    pub dependent: Option<String>,
    pub progress: f64,
    /// Set when the record's dates were missing or unparseable and a
    /// two-day placeholder starting today was substituted.
    pub invalid: bool,
}

impl Task {
    /// Parse a record's dates with `date_format`.
    ///
    /// Never fails: bad dates become a placeholder and mark the task invalid.
    pub fn from_record(
        record: TaskRecord,
        index: usize,
        date_format: &str,
        calendar: &dyn Calendar,
    ) -> Self {
        let parse = |text: &Option<String>| {
            text.as_deref()
                .and_then(|value| calendar.parse(value, date_format))
        };

        let (start, end, invalid) = match (parse(&record.start), parse(&record.end)) {
            (Some(start), Some(end)) => (start, end, false),
            _ => {
                log::warn!(
                    "Task '{}' has missing or invalid dates (start: {:?}, end: {:?}); using a placeholder",
                    record.id,
                    record.start,
                    record.end
                );
                let start = calendar.today();
                (start, calendar.add(start, 2, Unit::Day), true)
            }
        };

        Self {
            id: record.id,
            name: record.name,
            start,
            end,
            index,
            dependent: record.dependent,
            progress: record.progress.unwrap_or(0.0),
            invalid,
        }
    }

    /// Ids listed in `dependent`, trimmed, empty entries dropped.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependent
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ChronoCalendar;
    use chrono::NaiveDate;

    fn calendar() -> ChronoCalendar {
        ChronoCalendar::pinned(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
    }

    #[test]
    fn parses_record_dates() {
        let record = TaskRecord::new("A", "Design", "01-01-2024", "03-01-2024").with_progress(40.0);
        let task = Task::from_record(record, 0, "DD-MM-YYYY", &calendar());
        assert!(!task.invalid);
        assert_eq!(task.start.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(task.end.date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(task.progress, 40.0);
    }

    #[test]
    fn missing_start_gets_placeholder() {
        let record = TaskRecord {
            id: "X".into(),
            name: "No start".into(),
            end: Some("03-01-2024".into()),
            ..Default::default()
        };
        let task = Task::from_record(record, 3, "DD-MM-YYYY", &calendar());
        assert!(task.invalid);
        assert_eq!(task.index, 3);
        assert_eq!(task.start, calendar().today());
        assert_eq!((task.end - task.start).num_days(), 2);
    }

    #[test]
    fn unparseable_end_gets_placeholder() {
        let record = TaskRecord::new("X", "Bad", "01-01-2024", "someday");
        let task = Task::from_record(record, 0, "DD-MM-YYYY", &calendar());
        assert!(task.invalid);
    }

    #[test]
    fn splits_dependencies() {
        let record = TaskRecord::new("C", "c", "01-01-2024", "02-01-2024").depends_on(" A, B ,,");
        let task = Task::from_record(record, 2, "DD-MM-YYYY", &calendar());
        assert_eq!(task.dependencies().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
