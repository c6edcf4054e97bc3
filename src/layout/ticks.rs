use chrono::{Datelike, Duration, NaiveDateTime};

use crate::calendar::{Calendar, Unit};
use crate::model::{TimelineRange, ViewMode};

/// Header text for one tick. `None` means the label is suppressed because it
/// repeats the previous tick's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickLabel {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// Column boundaries from `range.start` until the range end is reached.
///
/// Month mode steps by calendar month; every other mode by `step_hours`.
pub fn build_ticks(
    range: &TimelineRange,
    mode: ViewMode,
    step_hours: f64,
    calendar: &dyn Calendar,
) -> Vec<NaiveDateTime> {
    let step = Duration::milliseconds((step_hours * 3_600_000.0).round() as i64);
    if mode != ViewMode::Month && step <= Duration::zero() {
        log::warn!("Non-positive step of {} hours; drawing a single column", step_hours);
        return vec![range.start];
    }

    let mut ticks = vec![range.start];
    let mut current = range.start;
    while current < range.end {
        current = match mode {
            ViewMode::Month => calendar.add(current, 1, Unit::Month),
            _ => current + step,
        };
        ticks.push(current);
    }
    ticks
}

/// Primary and secondary header labels for each tick.
///
/// The first tick always carries both; after that a label only appears when
/// the part of the date it names changed.
pub fn tick_labels(ticks: &[NaiveDateTime], mode: ViewMode, calendar: &dyn Calendar) -> Vec<TickLabel> {
    let (primary_pattern, secondary_pattern) = patterns(mode);
    let primary_text = |tick: NaiveDateTime| match mode {
        ViewMode::Week => format!("Week {}", calendar.format(tick, primary_pattern)),
        _ => calendar.format(tick, primary_pattern),
    };

    ticks
        .iter()
        .enumerate()
        .map(|(i, &tick)| {
            let (show_primary, show_secondary) = match i.checked_sub(1).map(|p| ticks[p]) {
                None => (true, true),
                Some(prev) => match mode {
                    ViewMode::Day => (tick.day() != prev.day(), tick.month() != prev.month()),
                    ViewMode::QuarterDay | ViewMode::HalfDay => (true, tick.day() != prev.day()),
                    ViewMode::Week => (true, tick.month() != prev.month()),
                    ViewMode::Month => (true, tick.year() != prev.year()),
                },
            };
            TickLabel {
                primary: show_primary.then(|| primary_text(tick)),
                secondary: show_secondary.then(|| calendar.format(tick, secondary_pattern)),
            }
        })
        .collect()
}

/// Whether the grid line at `tick` is drawn emphasised.
pub fn is_thick(tick: NaiveDateTime, mode: ViewMode) -> bool {
    match mode {
        ViewMode::Day => tick.weekday() == chrono::Weekday::Mon,
        ViewMode::Week => (1..8).contains(&tick.day()),
        ViewMode::Month => tick.month0() % 3 == 0,
        ViewMode::QuarterDay | ViewMode::HalfDay => false,
    }
}

fn patterns(mode: ViewMode) -> (&'static str, &'static str) {
    match mode {
        ViewMode::Day => ("D", "MMMM"),
        ViewMode::QuarterDay | ViewMode::HalfDay => ("HH", "D MMM"),
        ViewMode::Week => ("W", "MMMM"),
        ViewMode::Month => ("MMMM", "YYYY"),
    }
}
