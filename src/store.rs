use crate::task::{Task, TaskId, TaskRecord};

/// Authoritative ordered task list for one session.
///
/// The store does not validate records; callers (import, editor) do. Every
/// structural change renumbers `Task::order` so it always equals the task's
/// position.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<TaskRecord>) -> Self {
        let mut store = Self::new();
        store.load(records);
        store
    }

    /// Replaces the entire list. Ids are fresh; ids handed out before the
    /// load are never reused.
    pub fn load(&mut self, records: Vec<TaskRecord>) {
        let mut tasks = Vec::with_capacity(records.len());
        for (order, record) in records.into_iter().enumerate() {
            let id = self.allocate_id();
            tasks.push(Task::new(id, order, record));
        }
        self.tasks = tasks;
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn records(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(|task| task.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn insert(&mut self, record: TaskRecord) -> TaskId {
        let id = self.allocate_id();
        let order = self.tasks.len();
        self.tasks.push(Task::new(id, order, record));
        id
    }

    /// Replaces the record of `id` in place. Returns false if the id is unknown.
    pub fn update(&mut self, id: TaskId, record: TaskRecord) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.record = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position_of(id)?;
        let removed = self.tasks.remove(idx);
        self.renumber();
        Some(removed)
    }

    /// Installs a reordered list. The caller must pass a permutation of the
    /// current tasks.
    pub fn apply_order(&mut self, tasks: Vec<Task>) {
        debug_assert_eq!(tasks.len(), self.tasks.len());
        self.tasks = tasks;
        self.renumber();
    }

    fn allocate_id(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    fn renumber(&mut self) {
        for (order, task) in self.tasks.iter_mut().enumerate() {
            task.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str) -> TaskRecord {
        TaskRecord::new(name, 10.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1)
    }

    #[test]
    fn load_assigns_ids_and_order() {
        let store = TaskStore::from_records(vec![record("a"), record("b")]);
        let tasks = store.snapshot();
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[1].id, TaskId(2));
        assert_eq!(tasks[1].order, 1);
    }

    #[test]
    fn reload_never_reuses_ids() {
        let mut store = TaskStore::from_records(vec![record("a")]);
        store.load(vec![record("b")]);
        assert_eq!(store.tasks()[0].id, TaskId(2));
    }

    #[test]
    fn remove_renumbers_order() {
        let mut store = TaskStore::from_records(vec![record("a"), record("b"), record("c")]);
        let removed = store.remove(TaskId(1)).unwrap();
        assert_eq!(removed.record.name, "a");
        let orders: Vec<usize> = store.tasks().iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(store.position_of(TaskId(3)), Some(1));
    }

    #[test]
    fn update_unknown_id_is_rejected() {
        let mut store = TaskStore::from_records(vec![record("a")]);
        assert!(!store.update(TaskId(42), record("x")));
        assert!(store.update(TaskId(1), record("x")));
        assert_eq!(store.get(TaskId(1)).unwrap().record.name, "x");
    }
}
