use crate::aggregate::DailySeries;
use crate::task::{Task, TaskId, date_to_i32};
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One day of the progress curve, as handed to exporters and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRow {
    pub date: NaiveDate,
    pub daily_cost: f64,
    pub cumulative_cost: f64,
    pub daily_progress_pct: f64,
    pub cumulative_progress_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: TaskId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub cost: f64,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.record.name.clone(),
            start_date: task.record.start_date,
            end_date: task.end_date(),
            duration_days: task.record.duration_days,
            cost: task.record.cost,
        }
    }
}

/// Row shape of the progress export file. Percentages are fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressExportRecord {
    pub date: String,
    #[serde(rename = "progress(%)")]
    pub progress: f64,
    #[serde(rename = "sum_progress(%)")]
    pub sum_progress: f64,
}

/// Aggregator output packaged for the outer surfaces. Pure shaping: row
/// order is the aggregator's date order, task order is list order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressReport {
    pub rows: Vec<ProgressRow>,
    pub tasks: Vec<TaskSummary>,
    pub total_cost: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub excluded: Vec<TaskId>,
}

impl ProgressReport {
    pub fn assemble(tasks: &[Task], series: &DailySeries) -> Self {
        let rows = series
            .rows
            .iter()
            .map(|row| ProgressRow {
                date: row.date,
                daily_cost: row.daily_cost,
                cumulative_cost: row.cumulative_cost,
                daily_progress_pct: row.daily_progress_pct,
                cumulative_progress_pct: row.cumulative_progress_pct,
            })
            .collect();

        let excluded = series
            .excluded
            .iter()
            .filter_map(|&idx| tasks.get(idx).map(|task| task.id))
            .collect();

        Self {
            rows,
            tasks: tasks.iter().map(TaskSummary::from).collect(),
            total_cost: series.total_cost,
            start_date: series.start_date(),
            end_date: series.end_date(),
            excluded,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn progress_export_rows(&self) -> Vec<ProgressExportRecord> {
        self.rows
            .iter()
            .map(|row| ProgressExportRecord {
                date: row.date.format("%Y-%m-%d").to_string(),
                progress: row.daily_progress_pct / 100.0,
                sum_progress: row.cumulative_progress_pct / 100.0,
            })
            .collect()
    }

    pub fn rows_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<i32> = self.rows.iter().map(|r| date_to_i32(r.date)).collect();
        let daily: Vec<f64> = self.rows.iter().map(|r| r.daily_cost).collect();
        let cumulative: Vec<f64> = self.rows.iter().map(|r| r.cumulative_cost).collect();
        let daily_pct: Vec<f64> = self.rows.iter().map(|r| r.daily_progress_pct).collect();
        let cumulative_pct: Vec<f64> = self
            .rows
            .iter()
            .map(|r| r.cumulative_progress_pct)
            .collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("daily_cost"), daily).into_column(),
            Series::new(PlSmallStr::from_static("cumulative_cost"), cumulative).into_column(),
            Series::new(PlSmallStr::from_static("daily_progress_pct"), daily_pct).into_column(),
            Series::new(
                PlSmallStr::from_static("cumulative_progress_pct"),
                cumulative_pct,
            )
            .into_column(),
        ])
    }

    pub fn tasks_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
        let mut df = DataFrame::empty_with_schema(&Self::task_schema());
        for task in tasks {
            df = df.vstack(&task.to_dataframe_row()?)?;
        }
        Ok(df)
    }

    fn task_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::UInt64),
            Field::new("name".into(), DataType::String),
            Field::new("cost".into(), DataType::Float64),
            Field::new("start_date".into(), DataType::Date),
            Field::new("duration_days".into(), DataType::Int64),
            Field::new("end_date".into(), DataType::Date),
        ])
    }
}
