use crate::task::TaskRecord;
use std::fmt;

/// Upper bound on `|duration_days|`, roughly a century.
pub const MAX_DURATION_DAYS: i64 = 36_600;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

/// Checks made by the editor and import paths before a record reaches the
/// store. A duration below one day is accepted here; the aggregator excludes
/// such tasks from cost distribution.
pub fn validate_record(record: &TaskRecord) -> Result<(), TaskValidationError> {
    if !record.cost.is_finite() {
        return Err(TaskValidationError::new(format!(
            "task '{}' has non-finite cost {}",
            record.name, record.cost
        )));
    }
    if record.cost < 0.0 {
        return Err(TaskValidationError::new(format!(
            "task '{}' has negative cost {}",
            record.name, record.cost
        )));
    }
    if record.duration_days.unsigned_abs() > MAX_DURATION_DAYS.unsigned_abs() {
        return Err(TaskValidationError::new(format!(
            "task '{}' has duration {} days (limit {MAX_DURATION_DAYS})",
            record.name, record.duration_days
        )));
    }
    if record.try_end_date().is_none() {
        return Err(TaskValidationError::new(format!(
            "task '{}' ends outside the supported calendar ({} + {} days)",
            record.name, record.start_date, record.duration_days
        )));
    }
    Ok(())
}

pub fn validate_records(records: &[TaskRecord]) -> Result<(), TaskValidationError> {
    for (idx, record) in records.iter().enumerate() {
        validate_record(record)
            .map_err(|err| TaskValidationError::new(format!("row {}: {err}", idx + 1)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(cost: f64, duration_days: i64) -> TaskRecord {
        TaskRecord::new(
            "T",
            cost,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration_days,
        )
    }

    #[test]
    fn rejects_negative_and_nan_cost() {
        assert!(validate_record(&record(-1.0, 1)).is_err());
        assert!(validate_record(&record(f64::NAN, 1)).is_err());
    }

    #[test]
    fn rejects_end_date_past_calendar_bounds() {
        let late = TaskRecord::new("Late", 1.0, NaiveDate::MAX, 1);
        let err = validate_record(&late).unwrap_err();
        assert!(err.to_string().contains("outside the supported calendar"));
        let early = TaskRecord::new("Early", 1.0, NaiveDate::MIN, -1);
        assert!(validate_record(&early).is_err());
    }

    #[test]
    fn accepts_zero_duration() {
        assert!(validate_record(&record(10.0, 0)).is_ok());
    }

    #[test]
    fn collection_errors_name_the_row() {
        let err = validate_records(&[record(1.0, 1), record(1.0, 99_999)]).unwrap_err();
        assert!(err.to_string().starts_with("row 2:"));
    }
}
