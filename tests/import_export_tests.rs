use std::fs;
use std::io::Write;

use chrono::NaiveDate;
use progress_curve::{
    ProjectSession, TaskRecord, TransferError, export_progress_to_csv, export_tasks_to_csv,
    import_tasks_from_csv, import_tasks_into, read_tasks_csv, save_report_to_json,
};
use tempfile::{NamedTempFile, tempdir};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn reads_columns_in_any_order_and_derives_end_date() {
    let csv = "end_date,duration_days,name,start_date,cost\n\
               1999-01-01,3,Pour slab,2024-07-01,300\n\
               ,5.0,Frame,2024-07-04 00:00:00,500\n";
    let records = read_tasks_csv(csv.as_bytes()).expect("valid csv");

    assert_eq!(
        records,
        vec![
            TaskRecord::new("Pour slab", 300.0, d(2024, 7, 1), 3),
            TaskRecord::new("Frame", 500.0, d(2024, 7, 4), 5),
        ]
    );
    // The stale end_date column is not trusted.
    assert_eq!(records[0].end_date(), d(2024, 7, 4));
}

#[test]
fn header_with_bom_and_padding_is_accepted() {
    let csv = "\u{feff}name, cost ,start_date,duration_days,end_date\nA,10,2024-01-01,1,2024-01-02\n";
    let records = read_tasks_csv(csv.as_bytes()).expect("valid csv");
    assert_eq!(records.len(), 1);
}

#[test]
fn missing_column_is_schema_mismatch_and_session_untouched() {
    let file = csv_file("name,cost,start_date,duration_days\nA,10,2024-01-01,1\n");
    let mut session = ProjectSession::with_sample_data();
    let before = session.snapshot();

    let err = import_tasks_into(&mut session, file.path()).unwrap_err();
    match err {
        TransferError::SchemaMismatch { expected, found } => {
            assert_eq!(expected.len(), 5);
            assert_eq!(found.len(), 4);
        }
        other => panic!("expected schema mismatch, got {other:?}"),
    }
    assert_eq!(session.snapshot(), before);
}

#[test]
fn extra_or_duplicate_columns_are_schema_mismatch() {
    let extra = "name,cost,start_date,duration_days,end_date,notes\n";
    assert!(matches!(
        read_tasks_csv(extra.as_bytes()),
        Err(TransferError::SchemaMismatch { .. })
    ));
    let dup = "name,cost,start_date,duration_days,cost\n";
    assert!(matches!(
        read_tasks_csv(dup.as_bytes()),
        Err(TransferError::SchemaMismatch { .. })
    ));
}

#[test]
fn bad_values_are_parse_failures() {
    let cases = [
        "name,cost,start_date,duration_days,end_date\nA,abc,2024-01-01,1,\n",
        "name,cost,start_date,duration_days,end_date\nA,10,01/02/2024,1,\n",
        "name,cost,start_date,duration_days,end_date\nA,10,2024-01-01,2.5,\n",
        "name,cost,start_date,duration_days,end_date\nA,-5,2024-01-01,1,\n",
        "name,cost,start_date,duration_days,end_date\nA,10,,1,\n",
    ];
    for csv in cases {
        let result = read_tasks_csv(csv.as_bytes());
        assert!(
            matches!(result, Err(TransferError::ParseFailure(_))),
            "expected parse failure for {csv:?}, got {result:?}"
        );
    }
}

#[test]
fn end_date_beyond_calendar_is_parse_failure_and_session_untouched() {
    let file = csv_file("name,cost,start_date,duration_days,end_date\nA,10,+262142-12-01,365,\n");
    let mut session = ProjectSession::with_sample_data();
    let before = session.snapshot();

    let err = import_tasks_into(&mut session, file.path()).unwrap_err();
    match err {
        TransferError::ParseFailure(message) => assert!(message.contains("row 1:")),
        other => panic!("expected parse failure, got {other:?}"),
    }
    assert_eq!(session.snapshot(), before);
}

#[test]
fn unreadable_path_is_parse_failure() {
    let dir = tempdir().unwrap();
    let result = import_tasks_from_csv(dir.path().join("missing.csv"));
    assert!(matches!(result, Err(TransferError::ParseFailure(_))));
}

#[test]
fn import_replaces_tasks_and_recomputes_series() {
    let file = csv_file(
        "name,cost,start_date,duration_days,end_date\nPour,100,2024-01-01,2,2024-01-03\n",
    );
    let mut session = ProjectSession::with_sample_data();
    let snapshot = import_tasks_into(&mut session, file.path()).expect("import");

    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.series.len(), 3);
    assert!((snapshot.series.total_cost - 100.0).abs() < 1e-9);
    assert!(session.selection().is_empty());
}

#[test]
fn exported_tasks_reimport_to_the_same_records() {
    let session = ProjectSession::with_sample_data();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.csv");

    export_tasks_to_csv(session.tasks(), &path).expect("export");
    let header = fs::read_to_string(&path).unwrap();
    assert!(header.starts_with("name,cost,start_date,duration_days,end_date"));

    let records = import_tasks_from_csv(&path).expect("reimport");
    let original: Vec<TaskRecord> = session.tasks().iter().map(|t| t.record.clone()).collect();
    assert_eq!(records, original);
}

#[test]
fn empty_task_list_exports_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    export_tasks_to_csv(&[], &path).expect("export");
    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), "name,cost,start_date,duration_days,end_date");
    assert!(import_tasks_from_csv(&path).unwrap().is_empty());
}

#[test]
fn progress_export_uses_fraction_columns() {
    let session = ProjectSession::new(vec![TaskRecord::new("Pour", 100.0, d(2024, 1, 1), 2)]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.csv");
    export_progress_to_csv(&session.report(), &path).expect("export");

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "date,progress(%),sum_progress(%)");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "2024-01-01,0.0,0.0");
    assert_eq!(lines[3], "2024-01-03,0.5,1.0");
}

#[test]
fn report_json_carries_rows_and_tasks() {
    let session = ProjectSession::with_sample_data();
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    save_report_to_json(&session.report(), &path).expect("save");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["tasks"].as_array().unwrap().len(), 10);
    assert_eq!(value["start_date"], "2024-07-01");
    assert!(value["rows"].as_array().unwrap().len() > 50);
}
