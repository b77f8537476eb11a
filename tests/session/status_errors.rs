use httpmock::Method::{DELETE, POST};

use bbgdata_rs::{BbgClient, BbgError, DataPoint};
use url::Url;

use crate::common::{SESSION, client_for, mock_session, mock_start, mock_stop, setup_server};

#[tokio::test]
async fn refused_start_is_a_connection_error() {
    let server = setup_server();
    let start = server.mock(|when, then| {
        when.method(POST).path("/gw/sessions");
        then.status(503).body("no terminal");
    });
    let stop = server.mock(|when, then| {
        when.method(DELETE).path(format!("/gw/sessions/{SESSION}"));
        then.status(200);
    });

    let err = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    start.assert();
    assert_eq!(stop.hits(), 0, "a session that never started is not stopped");
    assert!(matches!(err, BbgError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_gateway_is_a_connection_error() {
    let client = BbgClient::builder()
        .gateway(Url::parse("http://127.0.0.1:1/gw/").unwrap())
        .build()
        .unwrap();

    let err = DataPoint::new(&client, ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    match err {
        BbgError::Connection(msg) => assert!(msg.starts_with("failed to start session"), "{msg}"),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_service_is_a_connection_error() {
    let server = setup_server();
    let _start = mock_start(&server);
    let open = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/services"));
        then.status(404);
    });
    let stop = mock_stop(&server);

    let err = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    open.assert();
    stop.assert();
    match err {
        BbgError::Connection(msg) => assert!(msg.contains("//blp/refdata")),
        other => panic!("expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_2xx_on_send_is_a_status_error() {
    let server = setup_server();
    let (_start, _open, stop) = mock_session(&server);
    let send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"));
        then.status(500).body("oops");
    });

    let err = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    send.assert();
    stop.assert();
    match err {
        BbgError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/gw/sessions/s1/requests"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn response_error_rejects_the_whole_request() {
    let server = setup_server();
    let _session = mock_session(&server);
    let _send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"events": [{
                "eventType": "RESPONSE",
                "messages": [{
                    "messageType": "ReferenceDataResponse",
                    "correlationIds": [1],
                    "element": {
                        "name": "ReferenceDataResponse",
                        "datatype": "CHOICE",
                        "choice": {
                            "name": "responseError",
                            "datatype": "SEQUENCE",
                            "elements": [
                                {"name": "category", "datatype": "STRING", "value": "BAD_ARGS"},
                                {"name": "message", "datatype": "STRING", "value": "No securities specified"}
                            ]
                        }
                    }
                }]
            }]}"#);
    });

    let err = DataPoint::new(&client_for(&server), Vec::<String>::new(), ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    match err {
        BbgError::Response { category, message } => {
            assert_eq!(category, "BAD_ARGS");
            assert_eq!(message, "No securities specified");
        }
        other => panic!("expected Response error, got {other:?}"),
    }
}

#[tokio::test]
async fn session_going_down_mid_request_is_reported() {
    let server = setup_server();
    let _session = mock_session(&server);
    let _send = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"events": [{
                "eventType": "SESSION_STATUS",
                "messages": [{"messageType": "SessionConnectionDown"}]
            }]}"#);
    });

    let err = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    assert!(
        matches!(&err, BbgError::SessionClosed(t) if t == "SessionConnectionDown"),
        "got {err:?}"
    );
}
