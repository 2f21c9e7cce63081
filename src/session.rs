use crate::aggregate::{DailySeries, aggregate};
use crate::chart::ChartSpec;
use crate::reorder::{Direction, SelectionSet, reorder_tasks};
use crate::report::ProgressReport;
use crate::store::TaskStore;
use crate::task::{Task, TaskId, TaskRecord, sample_tasks};
use crate::task_validation::{self, TaskValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("invalid task: {0}")]
    InvalidTask(String),
}

impl From<TaskValidationError> for SessionError {
    fn from(value: TaskValidationError) -> Self {
        SessionError::InvalidTask(value.to_string())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// State observed after a mutation: the ordered tasks and the series
/// recomputed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub tasks: Vec<Task>,
    pub series: DailySeries,
}

/// The one application-state object of a session.
///
/// Every mutation entry point recomputes the daily series before it returns,
/// so callers never observe a series that lags the task list.
#[derive(Debug, Clone)]
pub struct ProjectSession {
    store: TaskStore,
    selection: SelectionSet,
    series: DailySeries,
}

impl Default for ProjectSession {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ProjectSession {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        let mut session = Self {
            store: TaskStore::from_records(records),
            selection: SelectionSet::new(),
            series: DailySeries::default(),
        };
        session.recompute();
        session
    }

    pub fn with_sample_data() -> Self {
        Self::new(sample_tasks())
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn series(&self) -> &DailySeries {
        &self.series
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tasks: self.store.snapshot(),
            series: self.series.clone(),
        }
    }

    pub fn report(&self) -> ProgressReport {
        ProgressReport::assemble(self.store.tasks(), &self.series)
    }

    pub fn chart(&self, show_labels: bool) -> Option<ChartSpec> {
        ChartSpec::build(&self.report(), show_labels)
    }

    /// Replaces every task. Records are expected to be validated by the
    /// import path already.
    pub fn import_tasks(&mut self, records: Vec<TaskRecord>) -> SessionSnapshot {
        info!(count = records.len(), "replacing task list");
        self.store.load(records);
        self.selection.clear();
        self.recompute();
        self.snapshot()
    }

    pub fn add_task(&mut self, record: TaskRecord) -> SessionResult<(TaskId, SessionSnapshot)> {
        task_validation::validate_record(&record)?;
        let id = self.store.insert(record);
        debug!(%id, "task added");
        self.recompute();
        Ok((id, self.snapshot()))
    }

    pub fn edit_task(&mut self, id: TaskId, record: TaskRecord) -> SessionResult<SessionSnapshot> {
        task_validation::validate_record(&record)?;
        if !self.store.update(id, record) {
            return Err(SessionError::TaskNotFound(id));
        }
        debug!(%id, "task edited");
        self.recompute();
        Ok(self.snapshot())
    }

    pub fn remove_task(&mut self, id: TaskId) -> SessionResult<SessionSnapshot> {
        self.store
            .remove(id)
            .ok_or(SessionError::TaskNotFound(id))?;
        self.selection.remove(id);
        debug!(%id, "task removed");
        self.recompute();
        Ok(self.snapshot())
    }

    pub fn select(&mut self, id: TaskId) -> SessionResult<()> {
        if self.store.get(id).is_none() {
            return Err(SessionError::TaskNotFound(id));
        }
        self.selection.insert(id);
        Ok(())
    }

    pub fn deselect(&mut self, id: TaskId) -> bool {
        self.selection.remove(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Moves the selected tasks one slot and resets the selection.
    pub fn reorder(&mut self, direction: Direction) -> SessionSnapshot {
        if !self.selection.is_empty() {
            let reordered = reorder_tasks(self.store.tasks(), &self.selection, direction);
            self.store.apply_order(reordered);
            self.selection.clear();
            self.recompute();
        }
        self.snapshot()
    }

    /// Selects exactly `ids` and reorders in one step. Unknown ids fail the
    /// whole call without touching the order.
    pub fn reorder_ids(
        &mut self,
        ids: &[TaskId],
        direction: Direction,
    ) -> SessionResult<SessionSnapshot> {
        if let Some(missing) = ids.iter().find(|id| self.store.get(**id).is_none()) {
            return Err(SessionError::TaskNotFound(*missing));
        }
        self.selection = ids.iter().copied().collect();
        Ok(self.reorder(direction))
    }

    fn recompute(&mut self) {
        self.series = aggregate(&self.store.records());
    }
}
