use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction '{other}' (expected up|down)")),
        }
    }
}

/// Transient set of tasks marked for moving. Lives beside the task list,
/// never inside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<TaskId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TaskId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.ids.iter().copied()
    }

    /// Current positions of the selected ids in `tasks`. Unknown ids drop out.
    pub fn positions_in(&self, tasks: &[Task]) -> BTreeSet<usize> {
        tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| self.ids.contains(&task.id))
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl FromIterator<TaskId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Moves each selected position one slot in `direction` with a single
/// pairwise swap pass.
///
/// UP visits positions in ascending order and swaps `i` with `i - 1`; DOWN
/// visits them in descending order and swaps `i` with `i + 1`. Swaps run
/// against the same buffer, so adjacent selected rows see the effect of
/// earlier swaps in the pass. A selected row already at the edge stays put.
pub fn reorder<T: Clone>(items: &[T], selected: &BTreeSet<usize>, direction: Direction) -> Vec<T> {
    let mut out = items.to_vec();
    let len = out.len();
    match direction {
        Direction::Up => {
            for &idx in selected.iter() {
                if idx > 0 && idx < len {
                    out.swap(idx, idx - 1);
                }
            }
        }
        Direction::Down => {
            for &idx in selected.iter().rev() {
                if idx + 1 < len {
                    out.swap(idx, idx + 1);
                }
            }
        }
    }
    out
}

/// Applies [`reorder`] to a task list using an id-keyed selection and
/// renumbers `order` on the result.
pub fn reorder_tasks(tasks: &[Task], selection: &SelectionSet, direction: Direction) -> Vec<Task> {
    let positions = selection.positions_in(tasks);
    debug!(?positions, %direction, "reordering selected tasks");
    let mut reordered = reorder(tasks, &positions, direction);
    for (order, task) in reordered.iter_mut().enumerate() {
        task.order = order;
    }
    reordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(positions: &[usize]) -> BTreeSet<usize> {
        positions.iter().copied().collect()
    }

    #[test]
    fn adjacent_block_moves_up_together() {
        let out = reorder(&['a', 'b', 'c', 'd'], &sel(&[1, 2]), Direction::Up);
        assert_eq!(out, vec!['b', 'c', 'a', 'd']);
    }

    #[test]
    fn selection_touching_top_collides() {
        // 'a' is pinned at the top, then 'b' swaps past it.
        let out = reorder(&['a', 'b', 'c'], &sel(&[0, 1]), Direction::Up);
        assert_eq!(out, vec!['b', 'a', 'c']);
    }

    #[test]
    fn selection_touching_bottom_collides() {
        let out = reorder(&['a', 'b', 'c'], &sel(&[1, 2]), Direction::Down);
        assert_eq!(out, vec!['a', 'c', 'b']);
    }

    #[test]
    fn out_of_range_positions_are_ignored() {
        let out = reorder(&['a', 'b'], &sel(&[5]), Direction::Up);
        assert_eq!(out, vec!['a', 'b']);
        let out = reorder(&['a', 'b'], &sel(&[5]), Direction::Down);
        assert_eq!(out, vec!['a', 'b']);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!(" down ".parse::<Direction>().unwrap(), Direction::Down);
        assert!("left".parse::<Direction>().is_err());
    }
}
