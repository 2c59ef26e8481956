//! Tests for the Levey-Jennings chart pipeline

use lab_kpi::chart::{Layer, XValue};
use lab_kpi::filter::FilterCriteria;
use lab_kpi::levey_jennings::standardize;
use lab_kpi::{DateWindow, Error, QcChartConfig, QcParams, QcRecord, QcSession, render};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::{d, qc_series};

fn params(start: chrono::NaiveDate, end: chrono::NaiveDate) -> QcParams {
    QcParams {
        start,
        end,
        today: d(2024, 6, 30),
    }
}

fn points_of<'a>(layers: &'a [Layer], code: &str) -> Vec<(&'a XValue, f64)> {
    layers
        .iter()
        .find_map(|l| match l {
            Layer::Points { series, points, .. } if series == code => {
                Some(points.iter().map(|p| (&p.x, p.y)).collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}

#[test]
fn test_three_point_scenario() {
    let records = vec![
        QcRecord::new(d(2024, 1, 1), "A", 10.0),
        QcRecord::new(d(2024, 1, 2), "A", 12.0),
        QcRecord::new(d(2024, 1, 3), "A", 14.0),
    ];
    let chart = render(
        &records,
        &params(d(2024, 1, 1), d(2024, 1, 3)),
        &QcChartConfig::default(),
    )
    .unwrap();

    let points = points_of(&chart.layers, "A");
    let z: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    assert_eq!(z.len(), 3);
    for (actual, expected) in z.iter().zip([-1.0, 0.0, 1.0]) {
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }
    assert_eq!(points[0].0, &XValue::Date(d(2024, 1, 1)));
}

#[test]
fn test_normalization_uses_visible_window_only() {
    let records = qc_series();
    let config = QcChartConfig::default();

    // Without the outlier on Jan 4 series A is exactly the 10/12/14 scenario
    let narrow = render(&records, &params(d(2024, 1, 1), d(2024, 1, 3)), &config).unwrap();
    let wide = render(&records, &params(d(2024, 1, 1), d(2024, 1, 4)), &config).unwrap();

    let narrow_first = points_of(&narrow.layers, "A")[0].1;
    let wide_first = points_of(&wide.layers, "A")[0].1;
    assert!((narrow_first + 1.0).abs() < 1e-12);
    assert!(wide_first > -1.0);
}

#[test]
fn test_singleton_series_is_omitted_from_chart() {
    let chart = render(
        &qc_series(),
        &params(d(2024, 1, 1), d(2024, 1, 31)),
        &QcChartConfig::default(),
    )
    .unwrap();

    // C has a single record in the window
    assert_eq!(chart.series_names(), vec!["A", "B"]);
}

#[test]
fn test_singleton_series_scales_to_none() {
    let records = qc_series();
    let refs: Vec<&QcRecord> = records.iter().collect();
    let scaled = standardize(&refs);

    let c = scaled.iter().find(|r| r.qc_code == "C").unwrap();
    assert_eq!(c.value_scaled, None);
    assert_eq!(c.value, 1.0);
}

#[test]
fn test_empty_window_renders_bands_only() {
    let chart = render(
        &qc_series(),
        &params(d(2024, 3, 1), d(2024, 3, 31)),
        &QcChartConfig::default(),
    )
    .unwrap();

    assert!(!chart.has_data());
    assert_eq!(chart.layers.len(), 3);
}

#[test]
fn test_reversed_range_is_rejected() {
    let result = render(
        &qc_series(),
        &params(d(2024, 1, 5), d(2024, 1, 1)),
        &QcChartConfig::default(),
    );
    assert!(matches!(result, Err(Error::InvalidDateRange { .. })));
}

#[test]
fn test_range_before_rolling_window_renders_bands_only() {
    // Records exist on the requested dates but are older than the window
    let params = QcParams {
        start: d(2024, 1, 1),
        end: d(2024, 1, 31),
        today: d(2025, 6, 30),
    };
    let chart = render(&qc_series(), &params, &QcChartConfig::default()).unwrap();

    assert!(!chart.has_data());
    assert!(chart.series_names().is_empty());
    assert!(chart.title.contains("2024-01-01 to 2024-01-31"), "{}", chart.title);
}

#[test]
fn test_reversed_range_outside_window_is_rejected() {
    let today = d(2024, 6, 30);
    for (start, end) in [
        (d(2025, 3, 1), d(2025, 2, 1)),
        (d(2020, 3, 1), d(2020, 2, 1)),
    ] {
        let params = QcParams { start, end, today };
        let result = render(&qc_series(), &params, &QcChartConfig::default());
        assert!(
            matches!(result, Err(Error::InvalidDateRange { .. })),
            "{start}..{end}"
        );
    }
}

#[test]
fn test_session_rerenders_on_each_change() {
    let records = qc_series();
    let config = QcChartConfig::default();
    let mut session = QcSession::new(&records, &config, d(2024, 1, 20));

    // Defaults (Dec 6 .. Jan 5) cover every record
    assert_eq!(session.params().start, d(2023, 12, 6));
    assert_eq!(session.render().unwrap().series_names(), vec!["A", "B"]);

    let chart = session.set_start(d(2024, 1, 3)).unwrap();
    // Only A remains, with two points (14 and 30)
    assert_eq!(chart.series_names(), vec!["A"]);
    assert_eq!(points_of(&chart.layers, "A").len(), 2);

    assert!(session.set_end(d(2024, 1, 2)).is_err());
    assert_eq!(session.params().end, d(2024, 1, 2));
}

#[test]
fn test_random_windows_filter_inclusively() {
    let mut rng = StdRng::seed_from_u64(17);
    let base = d(2024, 1, 1);
    let records: Vec<QcRecord> = (0..200)
        .map(|i| {
            let offset = rng.random_range(0..60);
            QcRecord::new(
                base + chrono::Days::new(offset),
                if i % 2 == 0 { "A" } else { "B" },
                rng.random_range(50.0..150.0),
            )
        })
        .collect();

    for _ in 0..50 {
        let a = base + chrono::Days::new(rng.random_range(0..60));
        let b = base + chrono::Days::new(rng.random_range(0..60));
        let window = DateWindow::new(a.min(b), a.max(b)).unwrap();

        let kept = window.apply(&records);
        let expected = records
            .iter()
            .filter(|r| r.date >= window.start() && r.date <= window.end())
            .count();
        assert_eq!(kept.len(), expected);
        assert!(kept.iter().all(|r| window.contains(r.date)));
    }
}

#[test]
fn test_random_groups_standardize_to_unit_scale() {
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<QcRecord> = (0..300)
        .map(|i| {
            QcRecord::new(
                d(2024, 1, 1) + chrono::Days::new(i % 90),
                ["L1", "L2", "L3"][(i % 3) as usize],
                rng.random_range(-20.0..80.0),
            )
        })
        .collect();
    let refs: Vec<&QcRecord> = records.iter().collect();
    let scaled = standardize(&refs);

    for code in ["L1", "L2", "L3"] {
        let z: Vec<f64> = scaled
            .iter()
            .filter(|r| r.qc_code == code)
            .map(|r| r.value_scaled.unwrap())
            .collect();
        let mean = lab_kpi::stats::mean(&z).unwrap();
        let sd = lab_kpi::stats::sample_sd(&z).unwrap();
        assert!(mean.abs() < 1e-9, "{code} mean {mean}");
        assert!((sd - 1.0).abs() < 1e-9, "{code} sd {sd}");
    }
}
