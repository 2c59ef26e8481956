//! Tests for the turnaround-time KPI pipeline and report

use chrono::TimeDelta;
use lab_kpi::kpi::{
    Interval, TurnaroundIntervals, daily_percentiles, derive_all, summarize_by_lab_test,
};
use lab_kpi::loader::load_records;
use lab_kpi::{EventRecord, KpiConfig, KpiReport, LoaderConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::{EVENTS_CSV, event, ts, write_fixture};

#[test]
fn test_interval_scenario() {
    let e = event("Main", "K", "S", ts(2024, 1, 1, 9, 0), [10, 20, 60]);
    let intervals = TurnaroundIntervals::from_event(&e);

    assert_eq!(intervals.minutes(Interval::OrderToCollection), 10.0);
    assert_eq!(intervals.minutes(Interval::CollectionToReceipt), 10.0);
    assert_eq!(intervals.minutes(Interval::ReceiptToResult), 40.0);
    assert_eq!(intervals.minutes(Interval::OrderToResult), 60.0);
}

#[test]
fn test_intervals_round_trip_exactly() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let ordered = ts(2024, 1, 1, 0, 0) + TimeDelta::seconds(rng.random_range(0..31_536_000));
        let step = |rng: &mut StdRng| TimeDelta::milliseconds(rng.random_range(-600_000..7_200_000));
        let collection = ordered + step(&mut rng);
        let received = collection + step(&mut rng);
        let result = received + step(&mut rng);
        let e = EventRecord {
            resulting_lab: "Main".to_string(),
            test: "K".to_string(),
            priority: "R".to_string(),
            ordered,
            collection,
            received,
            result,
        };

        let i = TurnaroundIntervals::from_event(&e);
        assert_eq!(e.ordered + i.otc, e.collection);
        assert_eq!(e.collection + i.ctr, e.received);
        assert_eq!(e.received + i.rtr, e.result);
        assert_eq!(e.ordered + i.otr, e.result);
    }
}

#[test]
fn test_percentiles_are_monotone_for_random_groups() {
    let mut rng = StdRng::seed_from_u64(11);
    let events: Vec<EventRecord> = (0..400)
        .map(|_| {
            let day = rng.random_range(1..=10);
            let otc = rng.random_range(0..30);
            let ctr = otc + rng.random_range(0..60);
            let otr = ctr + rng.random_range(1..600);
            event(
                ["Main", "North"][rng.random_range(0..2)],
                ["K", "Na", "Hb"][rng.random_range(0..3)],
                "S",
                ts(2024, 1, day, rng.random_range(0..24), 0),
                [otc, ctr, otr],
            )
        })
        .collect();
    let derived = derive_all(&events);

    for row in daily_percentiles(&derived) {
        assert!(row.p10 <= row.p50, "{row:?}");
        assert!(row.p50 <= row.p90, "{row:?}");
    }
    for row in summarize_by_lab_test(&derived) {
        assert!(row.otc_median <= row.otc_p90);
        assert!(row.rtr_median <= row.rtr_p90);
    }
}

#[test]
fn test_report_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "events.csv", EVENTS_CSV);
    let events: Vec<EventRecord> = load_records(&path, &LoaderConfig::default()).unwrap();

    let report = KpiReport::build(&events, &KpiConfig::default());
    assert_eq!(report.event_count, 5);
    assert_eq!(report.focus_lab.as_deref(), Some("Main"));
    assert_eq!(report.focus_test.as_deref(), Some("K"));

    let groups: Vec<(&str, &str, usize)> = report
        .lab_test_summary
        .iter()
        .map(|r| (r.resulting_lab.as_str(), r.test.as_str(), r.count))
        .collect();
    assert_eq!(groups, [("Main", "K", 3), ("Main", "Na", 1), ("North", "K", 1)]);

    // Main/K OTC = [10, 5, 30], RTR = [40, 20, 60]
    let main_k = &report.lab_test_summary[0];
    assert_eq!(main_k.otc_median, 10.0);
    assert!((main_k.otc_p90 - 26.0).abs() < 1e-9);
    assert_eq!(main_k.rtr_median, 40.0);
    assert!((main_k.rtr_p90 - 56.0).abs() < 1e-9);

    // Stat-only: Main/K OTR = [60, 50]
    assert_eq!(report.priority_summary.len(), 3);
    assert_eq!(report.priority_summary[0].count, 2);
    assert_eq!(report.priority_summary[0].otr_median, 55.0);

    let names: Vec<&str> = report.charts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "otr_density",
            "daily_percentiles",
            "weekday_violin",
            "component_bar",
            "hourly_boxplot",
            "weekday_rose",
        ]
    );
    assert!(report.chart("weekday_rose").unwrap().has_data());
    assert!(report.chart("missing").is_none());
}

#[test]
fn test_report_focus_from_config() {
    let events = vec![
        event("Main", "K", "S", ts(2024, 1, 1, 9, 0), [5, 10, 30]),
        event("Main", "K", "S", ts(2024, 1, 2, 9, 0), [5, 10, 30]),
        event("North", "Na", "S", ts(2024, 1, 2, 9, 0), [5, 10, 30]),
    ];
    let config = KpiConfig {
        focus_lab: Some("North".to_string()),
        ..KpiConfig::default()
    };

    let report = KpiReport::build(&events, &config);
    assert_eq!(report.focus_lab.as_deref(), Some("North"));
    assert_eq!(report.focus_test.as_deref(), Some("Na"));
    assert_eq!(
        report.chart("hourly_boxplot").unwrap().series_names(),
        vec!["North"]
    );
}

#[test]
fn test_report_files_and_tables() {
    let events = vec![
        event("Main", "K", "S", ts(2024, 1, 1, 9, 0), [10, 20, 60]),
        event("Main", "K", "S", ts(2024, 1, 2, 9, 0), [5, 25, 45]),
    ];
    let report = KpiReport::build(&events, &KpiConfig::default());

    let table = report.lab_test_table();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Lab"));
    assert!(lines[2].starts_with("Main"));
    assert!(report.priority_table().contains("52.5"));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    let written = report.write_to_dir(&out).unwrap();
    assert_eq!(written.len(), 2 + report.charts.len());
    assert!(written.iter().all(|p| p.exists()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    assert_eq!(json["event_count"], 2);
    assert_eq!(json["lab_test_summary"][0]["test"], "K");
    assert_eq!(json["charts"][4]["chart"]["facet_by"][0], "test");
}

#[test]
fn test_empty_input_gives_zero_rows() {
    let report = KpiReport::build(&[], &KpiConfig::default());
    assert!(report.lab_test_summary.is_empty());
    assert!(report.priority_summary.is_empty());
    assert!(report.to_json().is_ok());
}
