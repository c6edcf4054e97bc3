//! Calendar capability used by the layout engine.
//!
//! The engine never touches a date library directly: parsing, formatting,
//! "today", and calendar arithmetic go through [`Calendar`]. Patterns use
//! the familiar moment-style tokens (`DD-MM-YYYY`, `MMMM`, `W`, ...) and are
//! translated to chrono strftime items by [`ChronoCalendar`].

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Units understood by the calendar arithmetic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Day,
    Month,
    Year,
}

/// Date capability injected into the engine.
///
/// Only `parse`, `format` and `today` are required; the range arithmetic has
/// calendar-correct defaults built on chrono. Pixel mapping uses the plain
/// [`diff_hours`] and [`days_in_month`] helpers.
pub trait Calendar {
    /// Parse `text` with a moment-style `pattern`. `None` when it does not match.
    fn parse(&self, text: &str, pattern: &str) -> Option<NaiveDateTime>;

    /// Format `instant` with a moment-style `pattern`.
    fn format(&self, instant: NaiveDateTime, pattern: &str) -> String;

    /// Midnight at the start of the current day.
    fn today(&self) -> NaiveDateTime;

    fn add(&self, instant: NaiveDateTime, amount: i64, unit: Unit) -> NaiveDateTime {
        add(instant, amount, unit)
    }

    fn start_of(&self, instant: NaiveDateTime, unit: Unit) -> NaiveDateTime {
        start_of(instant, unit)
    }

    fn end_of(&self, instant: NaiveDateTime, unit: Unit) -> NaiveDateTime {
        end_of(instant, unit)
    }
}

/// [`Calendar`] backed by chrono, optionally with a pinned "today".
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoCalendar {
    today: Option<NaiveDate>,
}

impl ChronoCalendar {
    pub fn new() -> Self {
        Self { today: None }
    }

    /// A calendar whose `today()` is always `date`.
    pub fn pinned(date: NaiveDate) -> Self {
        Self { today: Some(date) }
    }
}

impl Calendar for ChronoCalendar {
    fn parse(&self, text: &str, pattern: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let fmt = moment_to_strftime(pattern);
        NaiveDateTime::parse_from_str(text, &fmt)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &fmt)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
    }

    fn format(&self, instant: NaiveDateTime, pattern: &str) -> String {
        let fmt = moment_to_strftime(pattern);
        let items: Vec<Item<'_>> = StrftimeItems::new(&fmt).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            log::warn!("Unsupported date pattern '{}'", pattern);
            return String::new();
        }
        instant.format_with_items(items.iter()).to_string()
    }

    fn today(&self) -> NaiveDateTime {
        self.today
            .unwrap_or_else(|| Local::now().date_naive())
            .and_time(NaiveTime::MIN)
    }
}

// Longest tokens first so `MMMM` wins over `MM` and `M`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("WW", "%V"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("W", "%-V"),
    ("A", "%p"),
    ("a", "%P"),
];

/// Translate a moment-style pattern into a chrono strftime string.
///
/// Text inside `[...]` is copied literally; `%` is escaped.
pub fn moment_to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                out.push_str(&rest[1..close].replace('%', "%%"));
                rest = &rest[close + 1..];
                continue;
            }
        }
        for (token, spec) in TOKENS {
            if rest.starts_with(token) {
                out.push_str(spec);
                rest = &rest[token.len()..];
                continue 'outer;
            }
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

pub fn add(instant: NaiveDateTime, amount: i64, unit: Unit) -> NaiveDateTime {
    let shifted = match unit {
        Unit::Day => instant.checked_add_signed(Duration::days(amount)),
        Unit::Month => add_months(instant, amount),
        Unit::Year => add_months(instant, amount.saturating_mul(12)),
    };
    shifted.unwrap_or(instant)
}

fn add_months(instant: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let n = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        instant.checked_add_months(n)
    } else {
        instant.checked_sub_months(n)
    }
}

/// Signed fractional hours from `earlier` to `later`.
pub fn diff_hours(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 3_600_000.0
}

pub fn start_of(instant: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    let date = instant.date();
    match unit {
        Unit::Day => date.and_time(NaiveTime::MIN),
        Unit::Month => date
            .with_day(1)
            .unwrap_or(date)
            .and_time(NaiveTime::MIN),
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
            .unwrap_or(date)
            .and_time(NaiveTime::MIN),
    }
}

/// Last millisecond of the unit containing `instant`.
pub fn end_of(instant: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    let next = add(start_of(instant, unit), 1, unit);
    next - Duration::milliseconds(1)
}

pub fn days_in_month(instant: NaiveDateTime) -> u32 {
    let first = start_of(instant, Unit::Month);
    let next = add(first, 1, Unit::Month);
    (next - first).num_days() as u32
}
