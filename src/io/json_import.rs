use std::path::Path;

use serde::Deserialize;

use crate::error::{GanttError, Result};
use crate::model::TaskRecord;

/// Accepted top-level shapes of a task file.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFile {
    List(Vec<TaskRecord>),
    Wrapped { tasks: Vec<TaskRecord> },
}

/// Load task records from a JSON file holding either an array of tasks or
/// an object with a `tasks` array.
pub fn load_tasks_json(path: &Path) -> Result<Vec<TaskRecord>> {
    let json = std::fs::read_to_string(path).map_err(|source| GanttError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tasks_json(&json)
}

pub fn parse_tasks_json(json: &str) -> Result<Vec<TaskRecord>> {
    let records = match serde_json::from_str(json)? {
        TaskFile::List(tasks) | TaskFile::Wrapped { tasks } => tasks,
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_wrapped_lists() {
        let bare = r#"[{"id": "A", "name": "a", "start": "01-01-2024", "end": "03-01-2024"}]"#;
        let wrapped = r#"{"tasks": [{"id": "A", "name": "a", "start": "01-01-2024", "end": "03-01-2024"}]}"#;
        assert_eq!(parse_tasks_json(bare).unwrap(), parse_tasks_json(wrapped).unwrap());
    }

    #[test]
    fn optional_fields_default() {
        let records = parse_tasks_json(r#"[{"id": "A", "dependent": "B, C", "progress": 20}]"#).unwrap();
        assert_eq!(records[0].name, "");
        assert_eq!(records[0].start, None);
        assert_eq!(records[0].dependent.as_deref(), Some("B, C"));
        assert_eq!(records[0].progress, Some(20.0));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(parse_tasks_json(r#"{"items": []}"#), Err(GanttError::Json(_))));
    }
}
