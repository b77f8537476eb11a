use httpmock::Method::POST;

use bbgdata_rs::{BulkData, BulkKey, Value};

use crate::common::{SESSION, client_for, mock_session, setup_server};

// Two index members for one security; the second field is scalar and ignored.
const BODY: &str = r#"{
  "events": [{
    "eventType": "RESPONSE",
    "messages": [{
      "messageType": "ReferenceDataResponse",
      "correlationIds": [1],
      "element": {
        "name": "ReferenceDataResponse",
        "datatype": "CHOICE",
        "choice": {
          "name": "securityData",
          "datatype": "SEQUENCE",
          "isArray": true,
          "values": [{
            "datatype": "SEQUENCE",
            "elements": [
              {"name": "security", "datatype": "STRING", "value": "AS51 Index"},
              {"name": "fieldExceptions", "datatype": "SEQUENCE", "isArray": true, "values": []},
              {"name": "fieldData", "datatype": "SEQUENCE", "elements": [
                {"name": "INDX_MWEIGHT", "datatype": "SEQUENCE", "isArray": true, "values": [
                  {"datatype": "SEQUENCE", "elements": [
                    {"name": "Member Ticker and Exchange Code", "datatype": "STRING", "value": "BHP AT"},
                    {"name": "Percentage Weight", "datatype": "FLOAT64", "value": 9.1}
                  ]},
                  {"datatype": "SEQUENCE", "elements": [
                    {"name": "Member Ticker and Exchange Code", "datatype": "STRING", "value": "CBA AT"},
                    {"name": "Percentage Weight", "datatype": "FLOAT64", "value": 7.4}
                  ]}
                ]},
                {"name": "COUNT_INDEX_MEMBERS", "datatype": "INT32", "value": 200}
              ]}
            ]
          }]
        }
      }
    }]
  }]
}"#;

#[tokio::test]
async fn bulk_field_becomes_one_row_per_member() {
    let server = setup_server();
    let _session = mock_session(&server);
    let request = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/gw/sessions/{SESSION}/requests"))
            .body_includes(r#""fields":["INDX_MWEIGHT","COUNT_INDEX_MEMBERS"]"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(BODY);
    });

    let table = BulkData::new(
        &client_for(&server),
        ["AS51 Index"],
        ["INDX_MWEIGHT", "COUNT_INDEX_MEMBERS"],
    )
    .fetch()
    .await
    .unwrap();
    request.assert();

    assert_eq!(table.len(), 2);
    let second = BulkKey {
        security: "AS51 Index".into(),
        field: "INDX_MWEIGHT".into(),
        position: 1,
    };
    assert_eq!(
        table
            .get(&second, "Member Ticker and Exchange Code")
            .and_then(Value::as_str),
        Some("CBA AT")
    );
    assert_eq!(
        table.get(&second, "Percentage Weight"),
        Some(&Value::Float(7.4))
    );
    assert!(table.keys().all(|k| k.field == "INDX_MWEIGHT"));
}
