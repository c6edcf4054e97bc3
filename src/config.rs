//! Chart options, loadable from a JSON settings file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GanttError, Result};
use crate::model::ViewMode;

const SETTINGS_FILE: &str = "settings.json";

/// Layout options for a chart.
///
/// Every field has a default, so a settings file may name only the ones it
/// changes. `column_width` and `step` describe the active scale and are
/// overwritten whenever the view mode changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttOptions {
    /// Left gutter before the first column.
    pub label_width: f64,
    pub header_height: f64,
    pub column_width: f64,
    /// Hours per column.
    pub step: f64,
    pub bar_height: f64,
    pub bar_corner_radius: f64,
    pub arrow_curve: f64,
    pub padding: f64,
    pub view_mode: ViewMode,
    pub valid_view_modes: Vec<ViewMode>,
    /// Moment-style pattern task dates are written in.
    pub date_format: String,
    /// Width of the area the chart is shown in.
    pub container_width: f64,
}

impl Default for GanttOptions {
    fn default() -> Self {
        Self {
            label_width: 38.0,
            header_height: 50.0,
            column_width: 30.0,
            step: 24.0,
            bar_height: 20.0,
            bar_corner_radius: 3.0,
            arrow_curve: 5.0,
            padding: 18.0,
            view_mode: ViewMode::Day,
            valid_view_modes: ViewMode::ALL.to_vec(),
            date_format: "DD-MM-YYYY".into(),
            container_width: 1200.0,
        }
    }
}

impl GanttOptions {
    /// Read options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| GanttError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Options from the user's config directory, or the defaults when there
    /// is no usable settings file.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// `settings.json` inside the OS config directory for this app.
    pub fn settings_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "GanttTimeline")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn is_valid_mode(&self, mode: ViewMode) -> bool {
        self.valid_view_modes.contains(&mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let options = GanttOptions::default();
        assert_eq!(options.header_height, 50.0);
        assert_eq!(options.padding, 18.0);
        assert_eq!(options.view_mode, ViewMode::Day);
        assert_eq!(options.valid_view_modes.len(), 5);
        assert_eq!(options.date_format, "DD-MM-YYYY");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "padding": 10, "view_mode": "Half Day", "valid_view_modes": ["Day", "Week"] }}"#).unwrap();
        let options = GanttOptions::load(file.path()).unwrap();
        assert_eq!(options.padding, 10.0);
        assert_eq!(options.view_mode, ViewMode::HalfDay);
        assert!(options.is_valid_mode(ViewMode::Week));
        assert!(!options.is_valid_mode(ViewMode::Month));
        assert_eq!(options.bar_height, 20.0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GanttOptions::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GanttError::Io { .. }));
    }

    #[test]
    fn bad_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(GanttOptions::load(file.path()), Err(GanttError::Json(_))));
    }
}
