use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GanttError;

/// Time and pixel size of one timeline column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Hours covered by one column.
    pub step: f64,
    /// Pixels per column.
    pub column_width: f64,
}

/// The zoom levels the timeline can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "Quarter Day")]
    QuarterDay,
    #[serde(rename = "Half Day")]
    HalfDay,
    #[default]
    Day,
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::QuarterDay,
        ViewMode::HalfDay,
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewMode::QuarterDay => "Quarter Day",
            ViewMode::HalfDay => "Half Day",
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }

    /// Column step and width for this mode.
    pub fn scale(self) -> Scale {
        let (step, column_width) = match self {
            ViewMode::QuarterDay => (24.0 / 4.0, 38.0),
            ViewMode::HalfDay => (24.0 / 2.0, 38.0),
            ViewMode::Day => (24.0, 38.0),
            ViewMode::Week => (24.0 * 7.0, 140.0),
            ViewMode::Month => (24.0 * 30.0, 120.0),
        };
        Scale { step, column_width }
    }

    /// Number of columns a secondary header label is centred over.
    pub fn secondary_span(self) -> f64 {
        match self {
            ViewMode::QuarterDay => 4.0,
            ViewMode::HalfDay => 2.0,
            ViewMode::Day => 30.0,
            ViewMode::Week => 4.0,
            ViewMode::Month => 12.0,
        }
    }

    /// Modes whose columns are shorter than a day.
    pub fn is_sub_day(self) -> bool {
        matches!(self, ViewMode::QuarterDay | ViewMode::HalfDay)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ViewMode::ALL
            .into_iter()
            .find(|mode| {
                mode.name().eq_ignore_ascii_case(wanted)
                    || mode.name().replace(' ', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| GanttError::UnknownViewMode(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_table() {
        assert_eq!(ViewMode::Day.scale(), Scale { step: 24.0, column_width: 38.0 });
        assert_eq!(ViewMode::QuarterDay.scale().step, 6.0);
        assert_eq!(ViewMode::HalfDay.scale().step, 12.0);
        assert_eq!(ViewMode::Week.scale(), Scale { step: 168.0, column_width: 140.0 });
        assert_eq!(ViewMode::Month.scale(), Scale { step: 720.0, column_width: 120.0 });
    }

    #[test]
    fn parses_display_names() {
        assert_eq!("Quarter Day".parse::<ViewMode>().unwrap(), ViewMode::QuarterDay);
        assert_eq!("halfday".parse::<ViewMode>().unwrap(), ViewMode::HalfDay);
        assert_eq!(" Month ".parse::<ViewMode>().unwrap(), ViewMode::Month);
        for mode in ViewMode::ALL {
            assert_eq!(mode.to_string().parse::<ViewMode>().unwrap(), mode);
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "Fortnight".parse::<ViewMode>().unwrap_err();
        assert!(matches!(err, GanttError::UnknownViewMode(name) if name == "Fortnight"));
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&ViewMode::QuarterDay).unwrap();
        assert_eq!(json, "\"Quarter Day\"");
        let mode: ViewMode = serde_json::from_str("\"Week\"").unwrap();
        assert_eq!(mode, ViewMode::Week);
    }

    #[test]
    fn defaults_to_day() {
        assert_eq!(ViewMode::default(), ViewMode::Day);
    }
}
