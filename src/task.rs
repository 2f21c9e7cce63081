use chrono::{NaiveDate, TimeDelta};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a task within a session. Never derived from position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One schedule line item as entered by the user or read from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub cost: f64,
    pub start_date: NaiveDate,
    pub duration_days: i64,
}

impl TaskRecord {
    pub fn new(
        name: impl Into<String>,
        cost: f64,
        start_date: NaiveDate,
        duration_days: i64,
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            start_date,
            duration_days,
        }
    }

    /// `start_date + duration_days`, or `None` when that date cannot be
    /// represented.
    pub fn try_end_date(&self) -> Option<NaiveDate> {
        self.start_date
            .checked_add_signed(TimeDelta::try_days(self.duration_days)?)
    }

    /// Derived end date. Saturates at the calendar bounds for records that
    /// never passed validation.
    pub fn end_date(&self) -> NaiveDate {
        self.try_end_date().unwrap_or(if self.duration_days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    /// Tasks shorter than one day, or whose end date is out of range, carry
    /// no cost into the daily series.
    pub fn is_schedulable(&self) -> bool {
        self.duration_days >= 1 && self.try_end_date().is_some()
    }

    pub fn cost_per_day(&self) -> Option<f64> {
        if self.is_schedulable() {
            Some(self.cost / self.duration_days as f64)
        } else {
            None
        }
    }
}

/// A record held by the task store, together with its identity and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub order: usize,
    #[serde(flatten)]
    pub record: TaskRecord,
}

impl Task {
    pub fn new(id: TaskId, order: usize, record: TaskRecord) -> Self {
        Self { id, order, record }
    }

    pub fn end_date(&self) -> NaiveDate {
        self.record.end_date()
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(7);

        let id_data: [u64; 1] = [self.id.0];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let name_data: [&str; 1] = [self.record.name.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("name"), name_data).into_column());

        let cost_data: [f64; 1] = [self.record.cost];
        columns.push(Series::new(PlSmallStr::from_static("cost"), cost_data).into_column());

        columns.push(Self::series_from_date("start_date", self.record.start_date)?.into_column());

        let duration_data: [i64; 1] = [self.record.duration_days];
        columns.push(
            Series::new(PlSmallStr::from_static("duration_days"), duration_data).into_column(),
        );

        columns.push(Self::series_from_date("end_date", self.end_date())?.into_column());

        DataFrame::new(columns)
    }

    pub(crate) fn series_from_date(name: &str, date: NaiveDate) -> PolarsResult<Series> {
        let data: [i32; 1] = [date_to_i32(date)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }
}

pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    (date - NaiveDate::default()).num_days() as i32
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or(NaiveDate::default())
}

/// The ten construction items a fresh session starts with.
pub fn sample_tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new("Foundation framing", 50_000.0, d(2024, 7, 1), 5),
        TaskRecord::new("Structural reinforcement", 120_000.0, d(2024, 7, 15), 12),
        TaskRecord::new("Groundworks", 80_000.0, d(2024, 8, 1), 8),
        TaskRecord::new("Roof repair", 100_000.0, d(2024, 7, 1), 10),
        TaskRecord::new("Interior fit-out", 60_000.0, d(2024, 7, 5), 6),
        TaskRecord::new("Electrical upgrade", 70_000.0, d(2024, 7, 20), 7),
        TaskRecord::new("Water facilities", 90_000.0, d(2024, 7, 25), 9),
        TaskRecord::new("Road widening", 110_000.0, d(2024, 8, 5), 11),
        TaskRecord::new("Landscaping", 80_000.0, d(2024, 8, 10), 8),
        TaskRecord::new("Fire safety system", 90_000.0, d(2024, 8, 15), 9),
    ]
}
