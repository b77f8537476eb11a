use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::core::client::REFDATA_SERVICE;
use crate::core::refdata;
use crate::core::{BbgClient, BbgError, Table, TableKey, Value};
use crate::intraday::{unique_securities, utc_range, wire_datetime};
use crate::session::{Request, ResponseMessage};

/// Row key of a tick table.
///
/// Ticks can share a timestamp; `seq` numbers them in arrival order within one
/// (security, time) pair so every tick keeps its own row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TickKey {
    pub security: String,
    pub time: DateTime<Tz>,
    pub seq: u32,
}

impl TableKey for TickKey {
    fn index_names() -> &'static [&'static str] {
        &["security", "time", "seq"]
    }

    fn index_values(&self) -> Vec<Value> {
        vec![
            Value::String(self.security.clone()),
            Value::String(self.time.to_rfc3339()),
            Value::Int(i64::from(self.seq)),
        ]
    }
}

/// Raw intraday ticks for one or more securities.
#[derive(Debug, Clone)]
pub struct IntradayTick {
    client: BbgClient,
    securities: Vec<String>,
    event_types: Vec<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    tz: Tz,
    condition_codes: bool,
}

impl IntradayTick {
    /// Ticks of `event_types` (e.g. `TRADE`, `BID`, `ASK`) between `start` and `end`,
    /// both read in UTC unless [`IntradayTick::time_zone`] says otherwise.
    /// An empty `event_types` asks for trades. A security listed twice is queried once.
    pub fn new<S, E>(
        client: &BbgClient,
        securities: impl IntoIterator<Item = S>,
        event_types: impl IntoIterator<Item = E>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self
    where
        S: Into<String>,
        E: Into<String>,
    {
        Self {
            client: client.clone(),
            securities: unique_securities(securities),
            event_types: event_types.into_iter().map(Into::into).collect(),
            start,
            end,
            tz: Tz::UTC,
            condition_codes: true,
        }
    }

    /// Zone of `start`/`end` and of the returned timestamps. Default: UTC.
    #[must_use]
    pub fn time_zone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    /// Whether to ask for trade condition codes. (Default: `true`)
    #[must_use]
    pub fn condition_codes(mut self, yes: bool) -> Self {
        self.condition_codes = yes;
        self
    }

    fn requests(&self) -> Result<Vec<Request>, BbgError> {
        let (start, end) = utc_range(self.start, self.end, self.tz)?;
        let events: Vec<&str> = if self.event_types.is_empty() {
            vec!["TRADE"]
        } else {
            self.event_types.iter().map(String::as_str).collect()
        };

        Ok(self
            .securities
            .iter()
            .map(|security| {
                let mut req = Request::new(REFDATA_SERVICE, "IntradayTickRequest");
                req.set("security", security.as_str())
                    .set("startDateTime", wire_datetime(start))
                    .set("endDateTime", wire_datetime(end))
                    .set("includeConditionCodes", self.condition_codes);
                for ev in &events {
                    req.append_event_type(ev);
                }
                req
            })
            .collect())
    }

    /// Executes one request per security on a single session and returns every tick.
    ///
    /// # Errors
    ///
    /// Returns [`BbgError::InvalidDates`] for an empty or reversed range (no session is
    /// opened), or an error if the session fails or a request is rejected.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(securities = self.securities.len())))]
    pub async fn fetch(self) -> Result<Table<TickKey>, BbgError> {
        let requests = self.requests()?;
        let answers = refdata::execute(&self.client, &requests).await?;

        let mut table = Table::new();
        for (security, messages) in self.securities.iter().zip(&answers) {
            table.extend(assemble_ticks(security, messages, self.tz)?);
        }
        Ok(table)
    }
}

fn assemble_ticks(
    security: &str,
    messages: &[ResponseMessage],
    tz: Tz,
) -> Result<Table<TickKey>, BbgError> {
    let mut table = Table::new();
    let mut seen: HashMap<DateTime<Tz>, u32> = HashMap::new();

    for msg in messages {
        let ticks = msg
            .content
            .path(&["tickData", "tickData"])
            .and_then(Value::as_list)
            .ok_or_else(|| BbgError::Data(format!("{} message without tickData", msg.message_type)))?;

        for tick in ticks {
            let Some(fields) = tick.as_map() else {
                continue;
            };
            let Some(time) = fields.get("time").and_then(Value::as_datetime) else {
                continue;
            };
            let time = time.with_timezone(&tz);
            let seq = seen.entry(time).or_insert(0);
            let key = TickKey {
                security: security.to_string(),
                time,
                seq: *seq,
            };
            *seq += 1;
            table.upsert(
                key,
                fields
                    .iter()
                    .filter(|(k, _)| k.as_str() != "time")
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }
    Ok(table)
}
