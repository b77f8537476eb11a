use chrono::NaiveDate;
use std::time::Duration;
use url::Url;

use bbgdata_rs::{
    BbgClient, BulkData, DataHistory, DataPoint, IntradayBar, PeriodicitySelection,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A client pointed at a local gateway, polling the session every 500 ms.
    let client = BbgClient::builder()
        .gateway(Url::parse("http://localhost:8195/")?)
        .host("localhost")
        .port(8194)
        .poll_timeout(Duration::from_millis(500))
        .timeout(Duration::from_secs(10))
        .build()?;

    // 2. Current values, with an override.
    let points = DataPoint::new(
        &client,
        ["IBM US Equity", "MSFT US Equity"],
        ["PX_LAST", "PX_HIGH", "PX_LOW"],
    )
    .with_override("EQY_FUND_CRNCY", "AUD")
    .fetch()
    .await?;
    println!("--- Reference data ---");
    for row in points.rows() {
        println!(
            "  {}: last={}",
            row.key,
            row.get("PX_LAST").map(ToString::to_string).unwrap_or_default()
        );
    }
    for err in &points.security_errors {
        println!("  {} failed: {:?}", err.security, err.message);
    }
    println!();

    // 3. Daily history.
    let history = DataHistory::new(
        &client,
        ["YM1 Comdty", "XM1 Comdty"],
        ["PX_LAST"],
        NaiveDate::from_ymd_opt(2020, 1, 6).ok_or("bad date")?,
        NaiveDate::from_ymd_opt(2020, 1, 10).ok_or("bad date")?,
    )
    .selection(PeriodicitySelection::Daily)
    .fetch()
    .await?;
    println!("--- History ({} rows) ---", history.len());
    for row in history.rows() {
        println!("  {} {}: {:?}", row.key.security, row.key.date, row.get("PX_LAST"));
    }
    println!();

    // 4. Index members as a bulk field.
    let members = BulkData::new(&client, ["AS51 Index"], ["INDX_MWEIGHT"])
        .fetch()
        .await?;
    println!("--- Bulk: {} members ---", members.len());
    println!();

    // 5. Hourly bars in Sydney time.
    let day = NaiveDate::from_ymd_opt(2020, 3, 2).ok_or("bad date")?;
    let bars = IntradayBar::new(
        &client,
        ["AMP AU Equity"],
        day.and_hms_opt(10, 0, 0).ok_or("bad time")?,
        day.and_hms_opt(16, 0, 0).ok_or("bad time")?,
    )
    .interval(60)
    .time_zone(chrono_tz::Australia::Sydney)
    .fetch()
    .await?;
    println!("--- Bars ---");
    for row in bars.rows() {
        println!("  {} close={:?}", row.key.time, row.get("close"));
    }

    Ok(())
}
