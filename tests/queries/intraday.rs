use chrono::{NaiveDate, NaiveDateTime, Timelike};

use bbgdata_rs::{BarEvent, IntradayBar, IntradayTick, Value};

use crate::common::{client_for, mock_request, mock_session, setup_server};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[tokio::test]
async fn bars_through_gateway_in_sydney_time() {
    let server = setup_server();
    let _session = mock_session(&server);
    let request = server.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/gw/sessions/s1/requests")
            // 10:00 Sydney (AEDT) is 23:00 UTC the day before.
            .body_includes(r#""startDateTime":"2020-03-01T23:00:00""#)
            .body_includes(r#""eventType":"TRADE""#)
            .body_includes(r#""interval":60"#)
            .body_includes(r#""adjustmentSplit":true"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(crate::common::fixture("request", "IntradayBarRequest", "json"));
    });

    let table = IntradayBar::new(&client_for(&server), ["AMP AU Equity"], at(10, 0), at(12, 0))
        .event(BarEvent::Trade)
        .interval(60)
        .time_zone(chrono_tz::Australia::Sydney)
        .fetch()
        .await
        .unwrap();
    request.assert();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.columns().collect::<Vec<_>>(),
        ["close", "high", "low", "numEvents", "open", "value", "volume"]
    );
    let hours: Vec<u32> = table.keys().map(|k| k.time.hour()).collect();
    assert_eq!(hours, [10, 11]);
    assert_eq!(table.rows()[1].get("close"), Some(&Value::Float(1.83)));
    assert_eq!(table.rows()[0].get("numEvents"), Some(&Value::Int(1845)));
}

#[tokio::test]
async fn ticks_through_gateway() {
    let server = setup_server();
    let _session = mock_session(&server);
    let request = mock_request(&server, "IntradayTickRequest");

    let table = IntradayTick::new(
        &client_for(&server),
        ["AAPL US Equity"],
        ["TRADE"],
        at(14, 30),
        at(14, 31),
    )
    .fetch()
    .await
    .unwrap();
    request.assert();

    assert_eq!(table.len(), 2, "ticks at the same instant keep separate rows");
    let seqs: Vec<u32> = table.keys().map(|k| k.seq).collect();
    assert_eq!(seqs, [0, 1]);
    assert_eq!(
        table.rows()[0]
            .get("conditionCodes")
            .and_then(Value::as_str),
        Some("R6,IS")
    );
    assert_eq!(table.rows()[1].get("conditionCodes"), None);
}
