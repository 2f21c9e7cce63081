use super::{TASK_COLUMNS, TransferError, TransferResult};
use crate::report::ProgressReport;
use crate::task::{Task, TaskRecord};
use crate::task_validation;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Serialize, Deserialize)]
struct TaskCsvRecord {
    name: String,
    cost: String,
    start_date: String,
    duration_days: String,
    end_date: String,
}

impl From<&TaskRecord> for TaskCsvRecord {
    fn from(record: &TaskRecord) -> Self {
        Self {
            name: record.name.clone(),
            cost: record.cost.to_string(),
            start_date: format_date(record.start_date),
            duration_days: record.duration_days.to_string(),
            end_date: format_date(record.end_date()),
        }
    }
}

impl TaskCsvRecord {
    /// `end_date` is ignored: it is always derived from start and duration.
    fn into_record(self) -> Result<TaskRecord, String> {
        let cost = parse_f64(&self.cost)?.unwrap_or(0.0);
        let duration_days = parse_days(&self.duration_days)?.unwrap_or(0);
        let start_date = parse_date(&self.start_date)?
            .ok_or_else(|| format!("task '{}' has no start_date", self.name))?;
        Ok(TaskRecord::new(self.name, cost, start_date, duration_days))
    }
}

/// Reads task records from CSV. The header must hold exactly the task
/// columns, in any order. Every other failure is reported as
/// [`TransferError::ParseFailure`] carrying the underlying message.
pub fn read_tasks_csv<R: Read>(reader: R) -> TransferResult<Vec<TaskRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|err| TransferError::ParseFailure(err.to_string()))?
        .clone();
    let columns = check_columns(&headers)?;
    reader.set_headers(csv::StringRecord::from(columns));

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<TaskCsvRecord>().enumerate() {
        let row = row.map_err(|err| TransferError::ParseFailure(err.to_string()))?;
        let record = row
            .into_record()
            .map_err(|msg| TransferError::ParseFailure(format!("row {}: {msg}", idx + 1)))?;
        records.push(record);
    }

    task_validation::validate_records(&records)
        .map_err(|err| TransferError::ParseFailure(err.to_string()))?;
    Ok(records)
}

pub fn import_tasks_from_csv<P: AsRef<Path>>(path: P) -> TransferResult<Vec<TaskRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| TransferError::ParseFailure(err.to_string()))?;
    let records = read_tasks_csv(file)?;
    info!(path = %path.display(), count = records.len(), "imported tasks");
    Ok(records)
}

pub fn write_tasks_csv<W: Write>(tasks: &[Task], writer: W) -> TransferResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    if tasks.is_empty() {
        writer.write_record(TASK_COLUMNS)?;
    }
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(&task.record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> TransferResult<()> {
    let file = File::create(path)?;
    write_tasks_csv(tasks, file)
}

pub fn write_progress_csv<W: Write>(report: &ProgressReport, writer: W) -> TransferResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let rows = report.progress_export_rows();
    if rows.is_empty() {
        writer.write_record(super::PROGRESS_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_progress_to_csv<P: AsRef<Path>>(
    report: &ProgressReport,
    path: P,
) -> TransferResult<()> {
    let file = File::create(path)?;
    write_progress_csv(report, file)
}

pub fn save_report_to_json<P: AsRef<Path>>(report: &ProgressReport, path: P) -> TransferResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

/// Returns the normalised (BOM-stripped, trimmed) header names.
fn check_columns(headers: &csv::StringRecord) -> TransferResult<Vec<String>> {
    let found: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let found_set: HashSet<&str> = found.iter().map(String::as_str).collect();
    let expected_set: HashSet<&str> = TASK_COLUMNS.into_iter().collect();
    if found_set != expected_set || found.len() != TASK_COLUMNS.len() {
        return Err(TransferError::SchemaMismatch {
            expected: TASK_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }
    Ok(found)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .map(Some)
        .map_err(|e| format!("invalid date '{input}': {e}"))
}

fn parse_f64(input: &str) -> Result<Option<f64>, String> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid number '{input}': {e}"))
}

/// Whole days; spreadsheet-style `5.0` is accepted, `2.5` is not.
fn parse_days(input: &str) -> Result<Option<i64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(days) = trimmed.parse::<i64>() {
        return Ok(Some(days));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(Some(value as i64)),
        _ => Err(format!("invalid duration '{input}': expected whole days")),
    }
}
