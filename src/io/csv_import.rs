use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{GanttError, Result};
use crate::model::TaskRecord;

/// Column a CSV header maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
    Dependent,
    Progress,
}

/// Read a progress cell: a number (optionally with `%`) or a status word.
fn parse_progress(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.trim_end_matches('%').trim().parse::<f64>() {
        return Some(n.clamp(0.0, 100.0));
    }
    match value.to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => Some(100.0),
        "in progress" | "in-progress" | "active" | "started" => Some(50.0),
        "planned" => Some(25.0),
        "not started" | "not-started" | "new" => Some(0.0),
        _ => None,
    }
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "key" => Some(Column::Id),

        "name" | "task" | "taskname" | "label" | "title" => Some(Column::Name),

        "start" | "startdate" | "from" | "begin" => Some(Column::Start),

        "end" | "enddate" | "to" | "finish" | "due" => Some(Column::End),

        "dependent" | "dependencies" | "depends" | "dependson" | "predecessors" => {
            Some(Column::Dependent)
        }

        "progress" | "percent" | "done" | "complete" => Some(Column::Progress),

        _ => None,
    }
}

/// Import task records from a CSV file.
///
/// Auto-detects the delimiter (comma, semicolon, tab) and matches headers
/// loosely ("Start Date", "start_date", ...). Dates are passed through as
/// text; rows without an id get a generated one. Dependencies may name
/// tasks by id or, failing that, by name.
///
/// Returns `(records, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(Vec<TaskRecord>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|source| GanttError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (records, skipped) = read_csv(&content)?;
    log::info!(
        "Imported {} tasks from {} ({} rows skipped)",
        records.len(),
        path.display(),
        skipped
    );
    Ok((records, skipped))
}

/// [`import_csv`] over in-memory text.
pub fn read_csv(content: &str) -> Result<(Vec<TaskRecord>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    if !col_map.contains(&Some(Column::Name)) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(GanttError::InvalidInput(format!(
            "CSV has no task name column. Found headers: {:?}",
            found
        )));
    }

    let mut records: Vec<TaskRecord> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV row {}: {}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut record = TaskRecord::default();
        for (field, column) in row.iter().zip(&col_map) {
            let value = || (!field.is_empty()).then(|| field.to_string());
            match column {
                Some(Column::Id) => record.id = field.to_string(),
                Some(Column::Name) => record.name = field.to_string(),
                Some(Column::Start) => record.start = value(),
                Some(Column::End) => record.end = value(),
                Some(Column::Dependent) => record.dependent = value(),
                Some(Column::Progress) => record.progress = parse_progress(field),
                None => {}
            }
        }

        if record.name.is_empty() {
            log::warn!("Skipping CSV row {}: no task name", i + 2);
            skipped += 1;
            continue;
        }
        if record.id.is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }
        records.push(record);
    }

    resolve_dependency_names(&mut records);
    Ok((records, skipped))
}

// Rewrite dependency entries that match a task name rather than an id.
fn resolve_dependency_names(records: &mut [TaskRecord]) {
    let ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
    let name_to_id: HashMap<String, String> = records
        .iter()
        .map(|r| (r.name.to_lowercase(), r.id.clone()))
        .collect();

    for record in records.iter_mut() {
        let Some(dependent) = record.dependent.as_deref() else {
            continue;
        };
        let resolved: Vec<String> = dependent
            .split(',')
            .map(str::trim)
            .filter(|dep| !dep.is_empty())
            .map(|dep| {
                if ids.contains(dep) {
                    return dep.to_string();
                }
                match name_to_id.get(&dep.to_lowercase()) {
                    Some(id) => id.clone(),
                    None => dep.to_string(),
                }
            })
            .collect();
        record.dependent = Some(resolved.join(","));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_matched_loosely() {
        let csv = "Task ID;Task Name;Start Date;End-Date;Depends On;Percent\n\
                   a;Design;01-01-2024;03-01-2024;;40%\n\
                   b;Build;04-01-2024;09-01-2024;a;done\n";
        let (records, skipped) = read_csv(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].start.as_deref(), Some("01-01-2024"));
        assert_eq!(records[0].dependent, None);
        assert_eq!(records[0].progress, Some(40.0));
        assert_eq!(records[1].dependent.as_deref(), Some("a"));
        assert_eq!(records[1].progress, Some(100.0));
    }

    #[test]
    fn missing_ids_are_generated_and_names_resolve() {
        let csv = "name,start,end,dependencies\n\
                   Design,01-01-2024,03-01-2024,\n\
                   Build,04-01-2024,09-01-2024,design\n\
                   ,04-01-2024,09-01-2024,\n";
        let (records, skipped) = read_csv(csv).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(records[0].id.len(), 36);
        assert_eq!(records[1].dependent.as_deref(), Some(records[0].id.as_str()));
    }

    #[test]
    fn tabs_and_bad_dates_pass_through() {
        let csv = "id\ttitle\tfrom\tto\n1\tShip\tsoon\t\n";
        let (records, _) = read_csv(csv).unwrap();
        assert_eq!(records[0].start.as_deref(), Some("soon"));
        assert_eq!(records[0].end, None);
    }

    #[test]
    fn name_column_is_required() {
        let err = read_csv("id,start,end\n1,01-01-2024,02-01-2024\n").unwrap_err();
        assert!(matches!(err, GanttError::InvalidInput(_)));
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }
}
