//! Tests for loading QC series and event files

use lab_kpi::loader::load_records;
use lab_kpi::{Error, EventRecord, LoaderConfig, QcRecord, load_records_async};

use crate::utils::{EVENTS_CSV, QC_CSV, d, ts, write_fixture};

#[test]
fn test_load_qc_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "qc.csv", QC_CSV);

    let records: Vec<QcRecord> = load_records(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0], QcRecord::new(d(2024, 1, 1), "A", 10.0));
    assert_eq!(records[3], QcRecord::new(d(2024, 1, 2), "B", 5.5));
}

#[test]
fn test_load_events_with_normalized_headers_and_mixed_formats() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "events.csv", EVENTS_CSV);

    let events: Vec<EventRecord> = load_records(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0].resulting_lab, "Main");
    assert_eq!(events[0].ordered, ts(2024, 1, 1, 9, 0));
    assert_eq!(events[0].result, ts(2024, 1, 1, 10, 0));
    // US month/day format in the fourth row
    assert_eq!(events[3].collection, ts(2024, 1, 3, 8, 15));
}

#[test]
fn test_tab_separated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "qc.tsv",
        "Date\tQC Code\tValue\n2024-01-01\tA\t10\n",
    );

    let records: Vec<QcRecord> = load_records(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(records, vec![QcRecord::new(d(2024, 1, 1), "A", 10.0)]);
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "qc.csv", "date,value\n2024-01-01,10\n");

    let result: lab_kpi::Result<Vec<QcRecord>> = load_records(&path, &LoaderConfig::default());
    match result {
        Err(Error::ColumnNotFound { column }) => assert_eq!(column, "qc_code"),
        other => panic!("expected missing column, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_fatal() {
    let result: lab_kpi::Result<Vec<QcRecord>> = load_records(
        std::path::Path::new("/nonexistent/qc.csv"),
        &LoaderConfig::default(),
    );
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_row_fails_unless_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "qc.csv",
        "date,qc_code,value\n2024-01-01,A,10\nsoon,A,11\n2024-01-03,A,abc\n2024-01-04,A,13\n",
    );

    let strict: lab_kpi::Result<Vec<QcRecord>> = load_records(&path, &LoaderConfig::default());
    match strict {
        Err(Error::MalformedValue { row, column, value }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "date");
            assert_eq!(value, "soon");
        }
        other => panic!("expected malformed value, got {other:?}"),
    }

    let lenient = LoaderConfig {
        skip_invalid_rows: true,
        ..LoaderConfig::default()
    };
    let records: Vec<QcRecord> = load_records(&path, &lenient).unwrap();
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    assert_eq!(values, [10.0, 13.0]);
}

#[test]
fn test_row_numbers_continue_across_batches() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "qc.csv",
        "date,qc_code,value\n2024-01-01,A,1\n2024-01-02,A,2\n2024-01-03,A,3\n2024-01-04,A,x\n",
    );
    let config = LoaderConfig {
        batch_size: 2,
        ..LoaderConfig::default()
    };

    let result: lab_kpi::Result<Vec<QcRecord>> = load_records(&path, &config);
    assert!(matches!(result, Err(Error::MalformedValue { row: 3, .. })));
}

#[tokio::test]
async fn test_async_csv_load_matches_sync() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "events.csv", EVENTS_CSV);
    let config = LoaderConfig::default();

    let sync: Vec<EventRecord> = load_records(&path, &config).unwrap();
    let async_events: Vec<EventRecord> = load_records_async(&path, &config).await.unwrap();
    assert_eq!(sync, async_events);
}
