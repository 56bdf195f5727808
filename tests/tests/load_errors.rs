//! Error-path tests: missing tables, malformed rows, broken headers.

use integration_tests::fixtures;
use store_core::{Error, IssueKind, MetricsSnapshot, TableKind};

#[test]
fn missing_devices_yields_missing_input_naming_devices() {
    let mut upload = fixtures::full_upload();
    upload.devices = None;

    let err = MetricsSnapshot::load(&upload).unwrap_err();
    assert_eq!(err.code(), "LOAD_001");
    match err {
        Error::MissingInput { missing } => assert_eq!(missing, vec![TableKind::Devices]),
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn all_tables_missing_are_enumerated_in_order() {
    let err = MetricsSnapshot::load(&Default::default()).unwrap_err();
    match err {
        Error::MissingInput { missing } => {
            assert_eq!(missing, TableKind::REQUIRED.to_vec());
        }
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn malformed_ctr_rejects_only_that_row() {
    let queries = "\
Top queries,Clicks,Impressions,CTR,Position
good query,30,300,10.0%,1.5
bad query,15,150,not-a-ctr,2.5
another good one,10,100,10.0%,4.0
";
    let mut upload = fixtures::full_upload();
    upload.queries = Some(fixtures::raw(TableKind::Queries, queries));

    let snapshot = MetricsSnapshot::load(&upload).unwrap();
    assert_eq!(snapshot.queries.len(), 2);
    assert_eq!(snapshot.dropped_rows(), 1);

    let issue = snapshot.issues_for(TableKind::Queries).next().unwrap();
    assert_eq!(issue.row, 1);
    assert!(issue.dropped);
    assert!(matches!(
        &issue.issue,
        IssueKind::MalformedCtr { value } if value == "not-a-ctr"
    ));
}

#[test]
fn malformed_date_rejects_only_that_row() {
    let dates = "\
Date,Clicks,Impressions,CTR,Position
2023-03-01,10,100,10.0%,5.0
yesterday,20,200,10.0%,3.0
";
    let mut upload = fixtures::full_upload();
    upload.dates = Some(fixtures::raw(TableKind::Dates, dates));

    let snapshot = MetricsSnapshot::load(&upload).unwrap();
    assert_eq!(snapshot.dates.len(), 1);
    let issue = snapshot.issues_for(TableKind::Dates).next().unwrap();
    assert_eq!(issue.row, 1);
    assert!(matches!(
        &issue.issue,
        IssueKind::MalformedDate { value } if value == "yesterday"
    ));
}

#[test]
fn header_without_position_column_fails_the_load() {
    let dates = "\
Date,Clicks,Impressions,CTR
2023-03-01,10,100,10.0%
";
    let mut upload = fixtures::full_upload();
    upload.dates = Some(fixtures::raw(TableKind::Dates, dates));

    let err = MetricsSnapshot::load(&upload).unwrap_err();
    assert_eq!(err.code(), "LOAD_004");
    assert_eq!(
        err,
        Error::MissingColumn {
            table: TableKind::Dates,
            column: "Position"
        }
    );
}

#[test]
fn clicks_over_impressions_is_flagged_but_kept() {
    let devices = "\
Device,Clicks,Impressions
Desktop,500,100
";
    let mut upload = fixtures::full_upload();
    upload.devices = Some(fixtures::raw(TableKind::Devices, devices));

    let snapshot = MetricsSnapshot::load(&upload).unwrap();
    assert_eq!(snapshot.devices.len(), 1);
    assert_eq!(snapshot.dropped_rows(), 0);

    let issue = snapshot.issues_for(TableKind::Devices).next().unwrap();
    assert!(!issue.dropped);
    assert!(matches!(
        issue.issue,
        IssueKind::ClicksExceedImpressions {
            clicks: 500,
            impressions: 100
        }
    ));
}

#[test]
fn duplicate_dates_keep_the_last_row() {
    let dates = "\
Date,Clicks,Impressions,CTR,Position
2023-03-01,10,100,10.0%,5.0
2023-03-01,99,990,10.0%,5.0
";
    let mut upload = fixtures::full_upload();
    upload.dates = Some(fixtures::raw(TableKind::Dates, dates));

    let snapshot = MetricsSnapshot::load(&upload).unwrap();
    assert_eq!(snapshot.dates.len(), 1);
    assert_eq!(snapshot.dates[0].clicks, 99);
    assert!(matches!(
        snapshot.issues_for(TableKind::Dates).next().unwrap().issue,
        IssueKind::DuplicateDate { .. }
    ));
}

#[test]
fn non_utf8_payload_is_a_reader_error() {
    let err = csv_io::read_table(TableKind::Queries, b"Query,CTR\nfoo,\xFF\xFE\n").unwrap_err();
    assert!(matches!(err, csv_io::ReadError::Malformed { .. }));
}
