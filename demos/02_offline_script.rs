//! Runs a reference data query against a scripted transport; no gateway needed.

use serde_json::json;

use bbgdata_rs::{BbgClient, DataPoint, DataType, Element, ScriptedTransport, Transport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let security = Element::sequence(
        "securityData",
        vec![
            Element::scalar("security", DataType::String, json!("IBM US Equity")),
            Element::sequence(
                "fieldData",
                vec![
                    Element::scalar("PX_LAST", DataType::Float64, json!(143.73)),
                    Element::scalar("PX_BID", DataType::Float64, json!("N.A.")),
                ],
            ),
        ],
    );
    let script = ScriptedTransport::connected().reply(vec![Element::choice(
        "ReferenceDataResponse",
        Element::array("securityData", DataType::Sequence, vec![security]),
    )]);
    let log = script.log();

    let client = BbgClient::builder()
        .connector(move || Box::new(script.clone()) as Box<dyn Transport>)
        .build()?;

    let table = DataPoint::new(&client, ["IBM US Equity"], ["PX_LAST", "PX_BID"])
        .fetch()
        .await?;

    for row in table.rows() {
        // PX_BID could not be read as a number and comes back empty.
        println!("{}: {:?}", row.key, row.cells);
    }
    if let Some(sent) = log.requests().first() {
        println!("sent: {}", serde_json::to_string_pretty(&sent.to_json())?);
    }
    Ok(())
}
