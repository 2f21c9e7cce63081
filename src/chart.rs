use crate::report::ProgressReport;
use crate::task::TaskId;
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Number of colours in the qualitative palette bars cycle through.
pub const PALETTE_SIZE: usize = 12;
/// Every n-th curve point is annotated with its percentage.
pub const ANNOTATION_STRIDE: usize = 5;
/// Days of padding on each side of the x axis.
pub const X_PADDING_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttBar {
    pub task_id: TaskId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub color_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub cumulative_progress_pct: f64,
}

/// Everything a renderer needs to draw the Gantt bars with the cumulative
/// progress curve overlaid. Data only; no drawing happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub bars: Vec<GanttBar>,
    pub curve: Vec<CurvePoint>,
    pub annotations: Vec<usize>,
    pub x_range: (NaiveDate, NaiveDate),
    pub show_labels: bool,
}

impl ChartSpec {
    /// Returns `None` for an empty report.
    pub fn build(report: &ProgressReport, show_labels: bool) -> Option<Self> {
        let (start, end) = (report.start_date?, report.end_date?);
        let padding = TimeDelta::days(X_PADDING_DAYS);

        let bars = report
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| !report.excluded.contains(&task.id))
            .map(|(position, task)| GanttBar {
                task_id: task.id,
                name: task.name.clone(),
                start_date: task.start_date,
                end_date: task.end_date,
                duration_days: task.duration_days,
                color_index: position % PALETTE_SIZE,
                label: show_labels.then(|| format!("{}: {} days", task.name, task.duration_days)),
            })
            .collect();

        let curve: Vec<CurvePoint> = report
            .rows
            .iter()
            .map(|row| CurvePoint {
                date: row.date,
                cumulative_progress_pct: row.cumulative_progress_pct,
            })
            .collect();

        let annotations = curve
            .iter()
            .enumerate()
            .filter(|(idx, point)| {
                idx % ANNOTATION_STRIDE == 0 || point.cumulative_progress_pct == 100.0
            })
            .map(|(idx, _)| idx)
            .collect();

        Some(Self {
            bars,
            curve,
            annotations,
            x_range: (
                start.checked_sub_signed(padding).unwrap_or(start),
                end.checked_add_signed(padding).unwrap_or(end),
            ),
            show_labels,
        })
    }

    /// Whole-percent text for an annotated point, truncated like the axis labels.
    pub fn annotation_text(&self, idx: usize) -> Option<String> {
        self.curve
            .get(idx)
            .map(|point| format!("{}%", point.cumulative_progress_pct.trunc() as i64))
    }
}
