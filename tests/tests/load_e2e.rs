//! End-to-end: CSV text in, KPI answers out.

use integration_tests::fixtures;
use query_engine::{top_n, totals};
use session_store::SessionStore;
use store_core::MetricsSnapshot;
use telemetry::StoreMetrics;

#[test]
fn full_upload_produces_headline_kpis() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    assert!(snapshot.issues.is_empty());
    assert_eq!(snapshot.dates.len(), 4);

    let t = totals(&snapshot.dates).unwrap();
    assert_eq!(t.total_clicks, 60);
    assert_eq!(t.total_impressions, 600);
    assert!((t.average_ctr - 10.0).abs() < 1e-12);
    assert!((t.average_position - 5.0).abs() < 1e-12);
}

#[test]
fn top_queries_come_back_in_export_order() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();

    let top = top_n(&snapshot.queries, 3).unwrap();
    let keys: Vec<_> = top.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(keys, vec!["seo dashboard", "search console export", "gsc csv"]);
}

#[test]
fn optional_search_appearance_is_loaded_when_present() {
    let without = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    assert!(without.search_appearance.is_none());

    let with = MetricsSnapshot::load(&fixtures::full_upload_with_appearance()).unwrap();
    let appearances = with.search_appearance.as_deref().unwrap();
    assert_eq!(appearances.len(), 2);
    assert_eq!(appearances[0].appearance, "Rich results");
    assert_eq!(appearances[0].ctr, 10.0);
}

#[test]
fn session_store_serves_the_loaded_snapshot() {
    let store = SessionStore::new();
    let session = store.open();
    assert!(store.snapshot(session).is_none(), "fresh session awaits input");

    let loaded = store.load(session, &fixtures::full_upload()).unwrap();
    let served = store.snapshot(session).unwrap();
    assert_eq!(served.fingerprint, loaded.fingerprint);
    assert_eq!(served.queries.len(), 5);
}

#[test]
fn snapshot_serializes_for_the_presentation_layer() {
    let snapshot = MetricsSnapshot::load(&fixtures::full_upload()).unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["dates"].as_array().unwrap().len(), 4);
    assert_eq!(json["queries"][0]["query"], "seo dashboard");
    assert_eq!(json["queries"][0]["ctr"], 10.0);
    assert!(json["issues"].as_array().unwrap().is_empty());
}

#[test]
fn load_stats_feed_the_metrics_counters() {
    let metrics = StoreMetrics::new();
    let store = SessionStore::new();
    let session = store.open();
    metrics.active_sessions.set(store.active_sessions() as u64);

    let snapshot = store.load(session, &fixtures::full_upload()).unwrap();
    metrics.uploads_loaded.inc();
    metrics.rows_ingested.inc_by(
        (snapshot.dates.len()
            + snapshot.queries.len()
            + snapshot.pages.len()
            + snapshot.devices.len()
            + snapshot.countries.len()) as u64,
    );
    metrics.rows_rejected.inc_by(snapshot.dropped_rows() as u64);

    let stats = metrics.snapshot();
    assert_eq!(stats.uploads_loaded, 1);
    assert_eq!(stats.rows_ingested, 18);
    assert_eq!(stats.rows_rejected, 0);
    assert_eq!(stats.active_sessions, 1);
}

#[test]
fn identical_uploads_hit_the_snapshot_cache() {
    let store = SessionStore::new();
    let a = store.open();
    let b = store.open();

    let first = store.load(a, &fixtures::full_upload()).unwrap();
    let second = store.load(b, &fixtures::full_upload()).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}
