use std::path::PathBuf;
use thiserror::Error;

use crate::model::ViewMode;

/// Errors surfaced by the timeline engine and its loaders.
///
/// Rendering itself never fails; these cover construction, mutation and
/// file input.
#[derive(Error, Debug)]
pub enum GanttError {
    /// A view-mode name that is not one of the five known scales.
    #[error("Unknown view mode '{0}'")]
    UnknownViewMode(String),

    /// A known view mode that the current options do not allow.
    #[error("View mode '{0}' is not enabled for this chart")]
    UnsupportedViewMode(ViewMode),

    /// Two task records share the same id.
    #[error("Duplicate task id '{0}'")]
    DuplicateTaskId(String),

    /// Reading a file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Input that parsed but cannot be used.
    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, GanttError>;
