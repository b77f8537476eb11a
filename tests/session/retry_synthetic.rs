use httpmock::Method::POST;
use std::time::Duration;

use bbgdata_rs::{Backoff, BbgError, DataPoint, RetryConfig};

use crate::common::{SESSION, client_for, mock_session, setup_server};

#[tokio::test]
async fn gateway_calls_retry_on_persistent_5xx_when_enabled() {
    let server = setup_server();
    let _session = mock_session(&server);

    // Persistently failing, so every attempt is counted.
    let fail_mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"));
        then.status(503).body("Service Unavailable");
    });

    let max_retries = 3;
    let retry = RetryConfig {
        enabled: true,
        max_retries,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    };
    let client = bbgdata_rs::BbgClient::builder()
        .gateway(client_for(&server).gateway().clone())
        .retry_config(retry)
        .build()
        .unwrap();

    let result = DataPoint::new(&client, ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await;

    fail_mock.assert_hits((1 + max_retries) as usize);
    match result {
        Err(BbgError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected a Status error after all retries failed, got {other:?}"),
    }
}

#[tokio::test]
async fn no_retry_by_default() {
    let server = setup_server();
    let _session = mock_session(&server);
    let fail_mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"));
        then.status(503);
    });

    let err = DataPoint::new(&client_for(&server), ["IBM US Equity"], ["PX_LAST"])
        .fetch()
        .await
        .unwrap_err();

    fail_mock.assert_hits(1);
    assert!(matches!(err, BbgError::Status { status: 503, .. }));
}
