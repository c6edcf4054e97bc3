use chrono::{Duration, NaiveDateTime};

use super::task::Task;
use super::view_mode::{Scale, ViewMode};
use crate::calendar::{Calendar, Unit};

/// The widened window of instants the timeline displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimelineRange {
    /// Earliest start and latest end over `tasks`, padded for `mode`.
    ///
    /// An empty task set is seeded from today so the ruler still has a window.
    pub fn resolve(tasks: &[Task], mode: ViewMode, calendar: &dyn Calendar) -> Self {
        let bounds = tasks.iter().fold(None, |acc, task| match acc {
            None => Some((task.start, task.end)),
            Some((start, end)) => Some((task.start.min(start), task.end.max(end))),
        });
        let (start, end) = bounds.unwrap_or_else(|| {
            let today = calendar.today();
            (today, today)
        });
        Self::widen(start, end, mode, calendar)
    }

    fn widen(
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: ViewMode,
        calendar: &dyn Calendar,
    ) -> Self {
        match mode {
            ViewMode::QuarterDay | ViewMode::HalfDay => Self {
                start: calendar.add(start, -7, Unit::Day),
                end: calendar.add(end, 7, Unit::Day),
            },
            ViewMode::Month => Self {
                start: calendar.start_of(start, Unit::Year),
                end: calendar.add(calendar.end_of(end, Unit::Month), 1, Unit::Year),
            },
            ViewMode::Day | ViewMode::Week => Self {
                start: calendar.add(calendar.start_of(start, Unit::Month), -1, Unit::Month),
                end: calendar.add(calendar.end_of(end, Unit::Month), 1, Unit::Month),
            },
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Maps instants to x pixels for one render pass.
///
/// Grid ticks, labels, the today highlight and bars all go through this so
/// they line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    /// Instant drawn at `offset`.
    pub start: NaiveDateTime,
    /// Pixels reserved left of the first column (the label column).
    pub offset: f64,
    pub column_width: f64,
    /// Hours per column.
    pub step: f64,
    pub mode: ViewMode,
}

impl TimelineViewport {
    pub fn new(start: NaiveDateTime, offset: f64, scale: Scale, mode: ViewMode) -> Self {
        Self {
            start,
            offset,
            column_width: scale.column_width,
            step: scale.step,
            mode,
        }
    }

    /// Convert a date to an x-pixel position.
    pub fn date_to_x(&self, date: NaiveDateTime) -> f64 {
        self.offset + self.span_width(self.start, date)
    }

    /// Pixel width of the span `start..end`.
    pub fn span_width(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        crate::calendar::diff_hours(end, start) / self.step * self.column_width
    }

    /// Convert an x-pixel position back to a date.
    pub fn x_to_date(&self, x: f64) -> NaiveDateTime {
        let hours = (x - self.offset) / self.column_width * self.step;
        let millis = (hours * 3_600_000.0).round() as i64;
        self.start + Duration::milliseconds(millis)
    }

    /// Horizontal advance of the column starting at `tick`.
    ///
    /// Month columns are proportional to their day count against a 30-day month.
    pub fn column_width_at(&self, tick: NaiveDateTime) -> f64 {
        match self.mode {
            ViewMode::Month => {
                crate::calendar::days_in_month(tick) as f64 * self.column_width / 30.0
            }
            _ => self.column_width,
        }
    }

    /// Smallest draggable distance: one column, or one day in Month mode.
    pub fn unit_width(&self) -> f64 {
        match self.mode {
            ViewMode::Month => self.column_width / 30.0,
            _ => self.column_width,
        }
    }

    /// Round a pixel delta to whole units.
    pub fn snap(&self, dx: f64) -> f64 {
        let unit = self.unit_width();
        (dx / unit).round() * unit
    }
}
