use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use lab_kpi::{EventRecord, QcRecord};

/// Calendar date shorthand
#[must_use]
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Timestamp shorthand
#[must_use]
pub fn ts(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

/// Write a fixture file into a temporary directory
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// QC series used by the Levey-Jennings tests
#[must_use]
pub fn qc_series() -> Vec<QcRecord> {
    vec![
        QcRecord::new(d(2024, 1, 1), "A", 10.0),
        QcRecord::new(d(2024, 1, 2), "A", 12.0),
        QcRecord::new(d(2024, 1, 3), "A", 14.0),
        QcRecord::new(d(2024, 1, 4), "A", 30.0),
        QcRecord::new(d(2024, 1, 1), "B", 100.0),
        QcRecord::new(d(2024, 1, 2), "B", 104.0),
        QcRecord::new(d(2024, 1, 5), "C", 1.0),
    ]
}

/// One event with minute offsets of collection, receipt and result from
/// the order time
#[must_use]
pub fn event(
    lab: &str,
    test: &str,
    priority: &str,
    ordered: NaiveDateTime,
    offsets: [i64; 3],
) -> EventRecord {
    let at = |m| ordered + chrono::TimeDelta::minutes(m);
    EventRecord {
        resulting_lab: lab.to_string(),
        test: test.to_string(),
        priority: priority.to_string(),
        ordered,
        collection: at(offsets[0]),
        received: at(offsets[1]),
        result: at(offsets[2]),
    }
}

/// Event file with spreadsheet-style headers
pub const EVENTS_CSV: &str = "\
Resulting Lab,Test,Priority,Ordered Date,Collection Date,Received Date,Result Date
Main,K,S,2024-01-01 09:00,2024-01-01 09:10,2024-01-01 09:20,2024-01-01 10:00
Main,K,S,2024-01-02 09:00,2024-01-02 09:05,2024-01-02 09:30,2024-01-02 09:50
Main,K,R,2024-01-02 14:00,2024-01-02 14:30,2024-01-02 15:00,2024-01-02 16:00
Main,Na,S,01/03/2024 08:00,01/03/2024 08:15,01/03/2024 08:30,01/03/2024 09:30
North,K,S,2024-01-03 11:00,2024-01-03 11:20,2024-01-03 11:50,2024-01-03 12:10
";

/// QC file with a native header
pub const QC_CSV: &str = "\
date,qc_code,value
2024-01-01,A,10
2024-01-02,A,12
2024-01-03,A,14
2024-01-02,B,5.5
";
