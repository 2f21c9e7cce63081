//! Daily cost and progress aggregation.
//!
//! Each schedulable task spreads its cost evenly over the days in the
//! half-open interval `(start_date, end_date]`: the start date itself never
//! receives cost from that task, the end date always does. Overlapping
//! tasks add up on shared days.

use crate::task::TaskRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value reported for both percentages when the total cost is zero.
pub const ZERO_TOTAL_PCT: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub daily_cost: f64,
    pub cumulative_cost: f64,
    pub daily_progress_pct: f64,
    pub cumulative_progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySeries {
    pub rows: Vec<DailyRow>,
    /// Cost of every task in the list, distributed or not.
    pub total_cost: f64,
    /// Positions (in the aggregated list) of tasks skipped because their
    /// duration is below one day or their end date is out of range.
    pub excluded: Vec<usize>,
}

impl DailySeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|row| row.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.date)
    }

    pub fn row_for(&self, date: NaiveDate) -> Option<&DailyRow> {
        let start = self.start_date()?;
        let offset = (date - start).num_days();
        if offset < 0 {
            return None;
        }
        self.rows.get(offset as usize)
    }

    pub fn distributed_cost(&self) -> f64 {
        self.rows.iter().map(|row| row.daily_cost).sum()
    }
}

/// Builds the daily series for `tasks`. Never fails: tasks that cannot be
/// spread are skipped but still count towards `total_cost`, and a zero total
/// yields [`ZERO_TOTAL_PCT`] percentages.
pub fn aggregate(tasks: &[TaskRecord]) -> DailySeries {
    let Some((range_start, range_end)) = date_range(tasks) else {
        return DailySeries::default();
    };

    let day_count = (range_end - range_start).num_days() + 1;
    let mut daily_cost = vec![0.0_f64; day_count as usize];
    let mut total_cost = 0.0;
    let mut excluded = Vec::new();

    for (idx, task) in tasks.iter().enumerate() {
        total_cost += task.cost;
        let Some(rate) = task.cost_per_day() else {
            debug!(
                task = %task.name,
                duration_days = task.duration_days,
                "skipping task that cannot be spread over days"
            );
            excluded.push(idx);
            continue;
        };
        // First charged day is start + 1, last is start + duration.
        let offset = (task.start_date - range_start).num_days();
        let first = (offset + 1) as usize;
        let last = (offset + task.duration_days) as usize;
        for slot in &mut daily_cost[first..=last] {
            *slot += rate;
        }
    }

    let mut rows = Vec::with_capacity(daily_cost.len());
    let mut running = 0.0;
    for (date, cost) in range_start.iter_days().zip(daily_cost) {
        running += cost;
        rows.push(DailyRow {
            date,
            daily_cost: cost,
            cumulative_cost: running,
            daily_progress_pct: percent_of(cost, total_cost),
            cumulative_progress_pct: percent_of(running, total_cost),
        });
    }

    debug!(
        tasks = tasks.len(),
        days = rows.len(),
        excluded = excluded.len(),
        total_cost,
        "aggregated daily series"
    );

    DailySeries {
        rows,
        total_cost,
        excluded,
    }
}

fn date_range(tasks: &[TaskRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let start = tasks.iter().map(|task| task.start_date).min()?;
    // Out-of-range end dates do not widen the range.
    let end = tasks
        .iter()
        .filter_map(TaskRecord::try_end_date)
        .max()
        .unwrap_or(start);
    // A list made only of negative-duration tasks can end before it starts.
    Some((start, end.max(start)))
}

fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        ZERO_TOTAL_PCT
    } else {
        value / total * 100.0
    }
}
