//! Reading task lists from disk.

pub mod csv_import;
pub mod json_import;

use std::path::Path;

use crate::error::{GanttError, Result};
use crate::model::TaskRecord;

pub use csv_import::import_csv;
pub use json_import::load_tasks_json;

/// Load task records, choosing the reader by file extension.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("json") => load_tasks_json(path),
        Some("csv") | Some("tsv") | Some("txt") => Ok(import_csv(path)?.0),
        _ => Err(GanttError::InvalidInput(format!(
            "Unsupported task file '{}': expected .json or .csv",
            path.display()
        ))),
    }
}
