use httpmock::Method::{DELETE, GET, POST};

use bbgdata_rs::{DataPoint, REFDATA_SERVICE, Value};

use crate::common::{SESSION, client_for, fixture, mock_open, mock_session, mock_start, setup_server};

#[tokio::test]
async fn answers_are_polled_when_not_inline() {
    let server = setup_server();
    let (_start, _open, stop) = mock_session(&server);
    let send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"))
            .body_includes(r#""correlationId":1"#)
            .body_includes(r#""service":"//blp/refdata""#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"events": []}"#);
    });
    let poll = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/gw/sessions/{SESSION}/events"))
            .query_param("timeout", "500");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("request", "ReferenceDataRequest", "json"));
    });

    let table = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap();

    send.assert();
    poll.assert();
    stop.assert();
    assert_eq!(
        table.get(&"IBM US Equity".to_string(), "PX_LAST"),
        Some(&Value::Float(143.73))
    );
}

#[tokio::test]
async fn each_query_opens_its_own_session() {
    let server = setup_server();
    let (start, open, stop) = mock_session(&server);
    let _request = crate::common::mock_request(&server, "ReferenceDataRequest");
    let client = client_for(&server);

    for _ in 0..2 {
        DataPoint::new(&client, ["IBM US Equity"], ["PX_LAST"])
            .fetch()
            .await
            .unwrap();
    }

    start.assert_hits(2);
    open.assert_hits(2);
    stop.assert_hits(2);
}

#[tokio::test]
async fn stop_answered_without_events_still_succeeds() {
    let server = setup_server();
    let _start = mock_start(&server);
    let _open = mock_open(&server);
    let stop = server.mock(|when, then| {
        when.method(DELETE).path(format!("/gw/sessions/{SESSION}"));
        then.status(200);
    });

    let mut session = client_for(&server).new_session();
    session.start().await.unwrap();
    session.open_service(REFDATA_SERVICE).await.unwrap();
    session.stop().await.unwrap();

    stop.assert();
}
