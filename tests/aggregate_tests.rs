use chrono::{Duration, NaiveDate};
use progress_curve::{TaskRecord, ZERO_TOTAL_PCT, aggregate, sample_tasks};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn single_task_spreads_cost_after_start_date() {
    let series = aggregate(&[TaskRecord::new("Pour", 100.0, d(2024, 1, 1), 2)]);

    assert_eq!(series.len(), 3);
    assert_eq!(series.row_for(d(2024, 1, 1)).unwrap().daily_cost, 0.0);
    assert!((series.row_for(d(2024, 1, 2)).unwrap().daily_cost - 50.0).abs() < EPS);
    let last = series.row_for(d(2024, 1, 3)).unwrap();
    assert!((last.daily_cost - 50.0).abs() < EPS);
    assert!((last.cumulative_cost - 100.0).abs() < EPS);
    assert!((last.cumulative_progress_pct - 100.0).abs() < EPS);
}

#[test]
fn overlapping_tasks_add_their_daily_rates() {
    let series = aggregate(&[
        TaskRecord::new("A", 100.0, d(2024, 1, 1), 4), // 25/day on Jan 2..=5
        TaskRecord::new("B", 30.0, d(2024, 1, 3), 3),  // 10/day on Jan 4..=6
    ]);

    assert_eq!(series.start_date(), Some(d(2024, 1, 1)));
    assert_eq!(series.end_date(), Some(d(2024, 1, 6)));
    assert!((series.row_for(d(2024, 1, 3)).unwrap().daily_cost - 25.0).abs() < EPS);
    assert!((series.row_for(d(2024, 1, 4)).unwrap().daily_cost - 35.0).abs() < EPS);
    assert!((series.row_for(d(2024, 1, 6)).unwrap().daily_cost - 10.0).abs() < EPS);
}

#[test]
fn percentages_are_relative_to_total_cost() {
    let series = aggregate(&[TaskRecord::new("A", 200.0, d(2024, 1, 1), 4)]);
    let row = series.row_for(d(2024, 1, 3)).unwrap();
    assert!((row.daily_progress_pct - 25.0).abs() < EPS);
    assert!((row.cumulative_progress_pct - 50.0).abs() < EPS);
}

#[test]
fn empty_list_yields_no_rows() {
    let series = aggregate(&[]);
    assert!(series.is_empty());
    assert_eq!(series.total_cost, 0.0);
    assert!(series.start_date().is_none());
}

#[test]
fn zero_total_cost_uses_sentinel_percentages() {
    let series = aggregate(&[TaskRecord::new("Free", 0.0, d(2024, 1, 1), 3)]);
    assert_eq!(series.len(), 4);
    for row in &series.rows {
        assert_eq!(row.daily_progress_pct, ZERO_TOTAL_PCT);
        assert_eq!(row.cumulative_progress_pct, ZERO_TOTAL_PCT);
        assert!(!row.cumulative_progress_pct.is_nan());
    }
}

#[test]
fn non_positive_durations_are_excluded_but_widen_the_range() {
    let series = aggregate(&[
        TaskRecord::new("Real", 60.0, d(2024, 1, 1), 3),
        TaskRecord::new("Zero", 500.0, d(2024, 1, 10), 0),
        TaskRecord::new("Negative", 700.0, d(2024, 1, 2), -1),
    ]);

    assert_eq!(series.excluded, vec![1, 2]);
    assert_eq!(series.end_date(), Some(d(2024, 1, 10)));
    // Excluded tasks are not spread but stay in the total.
    assert!((series.total_cost - 1260.0).abs() < EPS);
    assert!((series.distributed_cost() - 60.0).abs() < EPS);
    let last = series.rows.last().unwrap();
    assert!((last.cumulative_progress_pct - 60.0 / 1260.0 * 100.0).abs() < EPS);
}

#[test]
fn out_of_range_tasks_are_excluded_without_panicking() {
    let series = aggregate(&[
        TaskRecord::new("Real", 20.0, d(2024, 1, 1), 2),
        TaskRecord::new("Forever", 10.0, d(2024, 1, 1), i64::MAX),
    ]);
    assert_eq!(series.excluded, vec![1]);
    assert_eq!(series.end_date(), Some(d(2024, 1, 3)));
    assert!((series.total_cost - 30.0).abs() < EPS);
}

#[test]
fn result_does_not_depend_on_task_order() {
    let tasks = sample_tasks();
    let mut reversed = tasks.clone();
    reversed.reverse();

    let a = aggregate(&tasks);
    let b = aggregate(&reversed);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.rows.iter().zip(&b.rows) {
        assert_eq!(x.date, y.date);
        assert!((x.cumulative_cost - y.cumulative_cost).abs() < EPS);
    }
}

#[test]
fn sample_tasks_span_july_to_august() {
    let series = aggregate(&sample_tasks());
    assert_eq!(series.start_date(), Some(d(2024, 7, 1)));
    // Fire safety: 2024-08-15 + 9 days.
    assert_eq!(series.end_date(), Some(d(2024, 8, 24)));
    assert!((series.total_cost - 850_000.0).abs() < EPS);
}

fn task_strategy() -> impl Strategy<Value = TaskRecord> {
    (0.0..10_000.0f64, 0i64..60, 1i64..30).prop_map(|(cost, offset, days)| {
        TaskRecord::new(
            "t",
            cost,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset),
            days,
        )
    })
}

proptest! {
    #[test]
    fn daily_costs_sum_to_total(tasks in proptest::collection::vec(task_strategy(), 1..12)) {
        let series = aggregate(&tasks);
        let expected: f64 = tasks.iter().map(|t| t.cost).sum();
        prop_assert!((series.distributed_cost() - expected).abs() < 1e-6 * expected.max(1.0));
        prop_assert!((series.total_cost - expected).abs() < 1e-6 * expected.max(1.0));
    }

    #[test]
    fn cumulative_cost_never_decreases(tasks in proptest::collection::vec(task_strategy(), 0..12)) {
        let series = aggregate(&tasks);
        for pair in series.rows.windows(2) {
            prop_assert!(pair[1].cumulative_cost >= pair[0].cumulative_cost);
        }
    }

    #[test]
    fn curve_ends_at_one_hundred(tasks in proptest::collection::vec(task_strategy(), 1..12)) {
        let series = aggregate(&tasks);
        if series.total_cost > 0.0 {
            let last = series.rows.last().unwrap();
            prop_assert!((last.cumulative_progress_pct - 100.0).abs() < 1e-6);
        }
    }
}
