use crate::session::{ProjectSession, SessionSnapshot};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub mod file;

pub use file::{
    export_progress_to_csv, export_tasks_to_csv, import_tasks_from_csv, read_tasks_csv,
    save_report_to_json, write_progress_csv, write_tasks_csv,
};

/// Columns a task file must carry, in the order they are written.
pub const TASK_COLUMNS: [&str; 5] = ["name", "cost", "start_date", "duration_days", "end_date"];

/// Columns of the progress export file.
pub const PROGRESS_COLUMNS: [&str; 3] = ["date", "progress(%)", "sum_progress(%)"];

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("file columns do not match the task format (expected {expected:?}, found {found:?})")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("error reading task file: {0}")]
    ParseFailure(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TransferResult<T> = Result<T, TransferError>;

/// Reads `path` completely and only then replaces the session's tasks, so a
/// failed import leaves the session as it was.
pub fn import_tasks_into<P: AsRef<Path>>(
    session: &mut ProjectSession,
    path: P,
) -> TransferResult<SessionSnapshot> {
    let path = path.as_ref();
    match import_tasks_from_csv(path) {
        Ok(records) => Ok(session.import_tasks(records)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "task import rejected");
            Err(err)
        }
    }
}
