pub mod aggregate;
pub mod chart;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod reorder;
pub mod report;
pub mod session;
pub mod store;
pub mod task;
pub mod task_validation;
pub mod transfer;

pub use aggregate::{DailyRow, DailySeries, ZERO_TOTAL_PCT, aggregate};
pub use chart::{ChartSpec, CurvePoint, GanttBar};
pub use config::AppConfig;
pub use reorder::{Direction, SelectionSet, reorder, reorder_tasks};
pub use report::{ProgressExportRecord, ProgressReport, ProgressRow, TaskSummary};
pub use session::{ProjectSession, SessionError, SessionSnapshot};
pub use store::TaskStore;
pub use task::{Task, TaskId, TaskRecord, sample_tasks};
pub use transfer::{
    TransferError, export_progress_to_csv, export_tasks_to_csv, import_tasks_from_csv,
    import_tasks_into, read_tasks_csv, save_report_to_json, write_progress_csv, write_tasks_csv,
};
