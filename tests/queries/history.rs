use chrono::NaiveDate;

use bbgdata_rs::{
    BbgError, DataHistory, HistoryKey, PeriodicityAdjustment, PeriodicitySelection, Value,
};

use crate::common::{client_for, mock_request, mock_session, setup_server};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn history_through_gateway() {
    let server = setup_server();
    let (start, _open, stop) = mock_session(&server);
    let request = mock_request(&server, "HistoricalDataRequest");

    let table = DataHistory::new(
        &client_for(&server),
        ["YM1 Comdty", "XM1 Comdty"],
        ["PX_LAST"],
        d(2020, 1, 6),
        d(2020, 1, 7),
    )
    .adjustment(PeriodicityAdjustment::Actual)
    .selection(PeriodicitySelection::Daily)
    .fetch()
    .await
    .unwrap();

    start.assert();
    request.assert();
    stop.assert();

    assert_eq!(table.len(), 4);
    let keys: Vec<_> = table
        .keys()
        .map(|k| (k.security.as_str(), k.date))
        .collect();
    assert_eq!(
        keys,
        [
            ("YM1 Comdty", d(2020, 1, 6)),
            ("YM1 Comdty", d(2020, 1, 7)),
            ("XM1 Comdty", d(2020, 1, 6)),
            ("XM1 Comdty", d(2020, 1, 7)),
        ]
    );
    let key = HistoryKey {
        security: "YM1 Comdty".into(),
        date: d(2020, 1, 7),
    };
    assert_eq!(table.get(&key, "PX_LAST"), Some(&Value::Float(99.225)));
}

#[tokio::test]
async fn request_body_carries_compact_dates() {
    let server = setup_server();
    let _session = mock_session(&server);
    let request = server.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/gw/sessions/s1/requests")
            .body_includes(r#""startDate":"20200106""#)
            .body_includes(r#""endDate":"20200107""#)
            .body_includes(r#""periodicitySelection":"DAILY""#);
        then.status(200)
            .header("content-type", "application/json")
            .body(crate::common::fixture("request", "HistoricalDataRequest", "json"));
    });

    DataHistory::new(
        &client_for(&server),
        ["YM1 Comdty"],
        ["PX_LAST"],
        d(2020, 1, 6),
        d(2020, 1, 7),
    )
    .selection(PeriodicitySelection::Daily)
    .fetch()
    .await
    .unwrap();

    request.assert();
}

#[tokio::test]
async fn reversed_range_never_reaches_gateway() {
    let server = setup_server();
    let (start, _open, _stop) = mock_session(&server);

    let err = DataHistory::new(
        &client_for(&server),
        ["YM1 Comdty"],
        ["PX_LAST"],
        d(2020, 1, 7),
        d(2020, 1, 6),
    )
    .fetch()
    .await
    .unwrap_err();

    assert!(matches!(err, BbgError::InvalidDates));
    assert_eq!(start.hits(), 0);
}
