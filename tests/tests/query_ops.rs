//! Query operations over a loaded snapshot.

use chrono::NaiveDate;
use integration_tests::fixtures;
use query_engine::{
    correlation_matrix, filter_by_category, filter_by_date_range, top_n, top_n_by, totals,
    CorrelationCell, Selection,
};
use store_core::MetricsSnapshot;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, d).unwrap()
}

#[test]
fn date_filter_narrows_the_totals() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let window = filter_by_date_range(&snapshot.dates, day(2), day(3)).unwrap();
    assert_eq!(window.len(), 2);

    let t = totals(&window).unwrap();
    assert_eq!(t.total_clicks, 45);
    assert_eq!(t.total_impressions, 450);
    assert!((t.average_position - 3.5).abs() < 1e-12);
}

#[test]
fn date_filter_is_idempotent_over_snapshot_data() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let once = filter_by_date_range(&snapshot.dates, day(1), day(3)).unwrap();
    let twice = filter_by_date_range(&once, day(1), day(3)).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn inverted_range_is_rejected() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let err = filter_by_date_range(&snapshot.dates, day(4), day(1)).unwrap_err();
    assert_eq!(err.code(), "QUERY_001");
}

#[test]
fn category_filter_selects_one_device() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let all = filter_by_category(&snapshot.devices, "device", &Selection::All).unwrap();
    assert_eq!(all.len(), 3);

    let mobile =
        filter_by_category(&snapshot.devices, "device", &Selection::parse("Mobile")).unwrap();
    assert_eq!(mobile.len(), 1);
    assert_eq!(mobile[0].clicks, 20);
}

#[test]
fn category_filter_rejects_unknown_columns() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let err = filter_by_category(&snapshot.countries, "continent", &Selection::All).unwrap_err();
    assert_eq!(err.code(), "QUERY_002");
}

#[test]
fn top_n_respects_presorted_order_and_clamps() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let top = top_n(&snapshot.queries, 3).unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].query, "seo dashboard");

    assert_eq!(top_n(&snapshot.queries, 99).unwrap().len(), 5);
}

#[test]
fn top_countries_by_impressions_resorts() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let top = top_n_by(&snapshot.countries, 2, "impressions").unwrap();
    let names: Vec<_> = top.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(names, vec!["United States", "Germany"]);
}

#[test]
fn clicks_and_impressions_correlate_perfectly_in_fixture() {
    // Impressions are exactly 10x clicks throughout the fixture.
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let matrix = correlation_matrix(&snapshot.dates, &["clicks", "impressions"]).unwrap();
    match matrix.get(0, 1) {
        CorrelationCell::Coefficient(r) => assert!((r - 1.0).abs() < 1e-9, "r = {r}"),
        CorrelationCell::Undefined => panic!("expected a defined coefficient"),
    }
}

#[test]
fn constant_ctr_column_is_undefined_in_correlation() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let matrix = correlation_matrix(&snapshot.dates, &["clicks", "ctr"]).unwrap();
    assert_eq!(matrix.get(0, 1), CorrelationCell::Undefined);
    assert_eq!(matrix.get(1, 1), CorrelationCell::Coefficient(1.0));
}

#[test]
fn correlation_composes_with_date_filter() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let window = filter_by_date_range(&snapshot.dates, day(1), day(2)).unwrap();
    let matrix = correlation_matrix(&window, &["clicks", "position"]).unwrap();
    // Two points always correlate at |1|; the sign reflects the slope.
    match matrix.get(0, 1) {
        CorrelationCell::Coefficient(r) => assert!((r + 1.0).abs() < 1e-9, "r = {r}"),
        CorrelationCell::Undefined => panic!("expected a defined coefficient"),
    }
}
