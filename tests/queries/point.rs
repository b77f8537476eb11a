use std::collections::BTreeMap;

use bbgdata_rs::{DataPoint, Value};

use crate::common::{client_for, mock_request, mock_session, setup_server};

#[tokio::test]
async fn reference_data_through_gateway() {
    let server = setup_server();
    let (start, open, stop) = mock_session(&server);
    let request = mock_request(&server, "ReferenceDataRequest");
    let client = client_for(&server);

    let table = DataPoint::new(
        &client,
        ["IBM US Equity", "MSFT US Equity", "NOPE Equity"],
        ["PX_LAST", "NAME", "BAD_FIELD"],
    )
    .fetch()
    .await
    .unwrap();

    start.assert();
    open.assert();
    request.assert();
    stop.assert();

    assert_eq!(table.len(), 2, "the unknown security gets no row");
    assert_eq!(table.columns().collect::<Vec<_>>(), ["NAME", "PX_LAST"]);
    assert_eq!(
        table.get(&"IBM US Equity".to_string(), "PX_LAST"),
        Some(&Value::Float(143.73))
    );
    assert_eq!(
        table
            .get(&"MSFT US Equity".to_string(), "NAME")
            .and_then(Value::as_str),
        Some("MICROSOFT CORP")
    );

    assert_eq!(table.field_exceptions.len(), 1);
    assert_eq!(table.field_exceptions[0].security, "IBM US Equity");
    assert_eq!(table.field_exceptions[0].field_id, "BAD_FIELD");
    assert_eq!(table.security_errors.len(), 1);
    assert_eq!(table.security_errors[0].security, "NOPE Equity");
    assert_eq!(table.security_errors[0].category.as_deref(), Some("BAD_SEC"));
}

#[tokio::test]
async fn overrides_are_sent_as_field_value_pairs() {
    let server = setup_server();
    let _session = mock_session(&server);
    let request = server.mock(|when, then| {
        when.method(httpmock::Method::POST)
            .path("/gw/sessions/s1/requests")
            .body_includes(r#""overrides":[{"fieldId":"SETTLE_DT","value":"20200615"},{"fieldId":"PX_BID","value":"104.0189"}]"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(crate::common::fixture("request", "ReferenceDataRequest", "json"));
    });

    let client = client_for(&server);
    let table = DataPoint::new(&client, ["AP364296 Corp"], ["YLD_CNV_BID"])
        .overrides([("SETTLE_DT", "20200615"), ("PX_BID", "104.0189")])
        .fetch()
        .await
        .unwrap();

    request.assert();
    assert!(!table.is_empty());
}

#[tokio::test]
async fn inspect_keeps_partial_and_final_messages() {
    let server = setup_server();
    let _session = mock_session(&server);
    let _request = mock_request(&server, "ReferenceDataRequest");
    let client = client_for(&server);

    let messages = DataPoint::new(&client, ["IBM US Equity", "MSFT US Equity"], ["PX_LAST"])
        .inspect()
        .await
        .unwrap();

    assert_eq!(messages.len(), 2);
    assert!(
        messages
            .iter()
            .all(|m| m.message_type == "ReferenceDataResponse")
    );
    let second = messages[1]
        .content
        .get("securityData")
        .and_then(Value::as_list)
        .unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].get("fieldData"), Some(&Value::Map(BTreeMap::new())));
}
