use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::core::client::REFDATA_SERVICE;
use crate::core::refdata;
use crate::core::{BbgClient, BbgError, Table, TableKey, Value};
use crate::intraday::{unique_securities, utc_range, wire_datetime};
use crate::session::{Request, ResponseMessage};

/// Row key of a bar table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BarKey {
    pub security: String,
    /// Opening time of the bar, in the query's time zone.
    pub time: DateTime<Tz>,
}

impl TableKey for BarKey {
    fn index_names() -> &'static [&'static str] {
        &["security", "time"]
    }

    fn index_values(&self) -> Vec<Value> {
        vec![
            Value::String(self.security.clone()),
            Value::String(self.time.to_rfc3339()),
        ]
    }
}

/// Event stream the bars are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarEvent {
    #[default]
    Trade,
    Bid,
    Ask,
    BidBest,
    AskBest,
    BestBid,
    BestAsk,
}

impl BarEvent {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            BarEvent::Trade => "TRADE",
            BarEvent::Bid => "BID",
            BarEvent::Ask => "ASK",
            BarEvent::BidBest => "BID_BEST",
            BarEvent::AskBest => "ASK_BEST",
            BarEvent::BestBid => "BEST_BID",
            BarEvent::BestAsk => "BEST_ASK",
        }
    }
}

/// Open/high/low/close bars of a fixed interval for one or more securities.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct IntradayBar {
    client: BbgClient,
    securities: Vec<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    event: BarEvent,
    interval: u32,
    tz: Tz,
    gap_fill_initial_bar: bool,
    adjustment_split: bool,
    adjustment_abnormal: bool,
    adjustment_normal: bool,
    adjustment_follow_dpdf: bool,
}

impl IntradayBar {
    /// Hourly trade bars between `start` and `end` (UTC unless a zone is set).
    pub fn new<S>(
        client: &BbgClient,
        securities: impl IntoIterator<Item = S>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self
    where
        S: Into<String>,
    {
        Self {
            client: client.clone(),
            securities: unique_securities(securities),
            start,
            end,
            event: BarEvent::default(),
            interval: 60,
            tz: Tz::UTC,
            gap_fill_initial_bar: false,
            adjustment_split: true,
            adjustment_abnormal: false,
            adjustment_normal: false,
            adjustment_follow_dpdf: true,
        }
    }

    #[must_use]
    pub fn event(mut self, event: BarEvent) -> Self {
        self.event = event;
        self
    }

    /// Bar length in minutes, 1..=1440. (Default: 60)
    #[must_use]
    pub fn interval(mut self, minutes: u32) -> Self {
        self.interval = minutes;
        self
    }

    /// Zone of `start`/`end` and of the returned bar times. Default: UTC.
    #[must_use]
    pub fn time_zone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    /// Fill the first bar from the last tick before `start` when it would be empty.
    #[must_use]
    pub fn gap_fill_initial_bar(mut self, yes: bool) -> Self {
        self.gap_fill_initial_bar = yes;
        self
    }

    /// Adjust for splits. (Default: `true`)
    #[must_use]
    pub fn adjustment_split(mut self, yes: bool) -> Self {
        self.adjustment_split = yes;
        self
    }

    /// Adjust for abnormal cash distributions. (Default: `false`)
    #[must_use]
    pub fn adjustment_abnormal(mut self, yes: bool) -> Self {
        self.adjustment_abnormal = yes;
        self
    }

    /// Adjust for normal cash distributions. (Default: `false`)
    #[must_use]
    pub fn adjustment_normal(mut self, yes: bool) -> Self {
        self.adjustment_normal = yes;
        self
    }

    /// Follow the terminal's DPDF adjustment settings. (Default: `true`)
    #[must_use]
    pub fn adjustment_follow_dpdf(mut self, yes: bool) -> Self {
        self.adjustment_follow_dpdf = yes;
        self
    }

    fn requests(&self) -> Result<Vec<Request>, BbgError> {
        if !(1..=1440).contains(&self.interval) {
            return Err(BbgError::InvalidInterval(self.interval));
        }
        let (start, end) = utc_range(self.start, self.end, self.tz)?;

        Ok(self
            .securities
            .iter()
            .map(|security| {
                let mut req = Request::new(REFDATA_SERVICE, "IntradayBarRequest");
                req.set("security", security.as_str())
                    .set("eventType", self.event.as_str())
                    .set("interval", self.interval)
                    .set("startDateTime", wire_datetime(start))
                    .set("endDateTime", wire_datetime(end))
                    .set("adjustmentSplit", self.adjustment_split)
                    .set("adjustmentAbnormal", self.adjustment_abnormal)
                    .set("adjustmentNormal", self.adjustment_normal)
                    .set("adjustmentFollowDPDF", self.adjustment_follow_dpdf);
                if self.gap_fill_initial_bar {
                    req.set("gapFillInitialBar", true);
                }
                req
            })
            .collect())
    }

    /// Executes one request per security on a single session and returns every bar.
    ///
    /// # Errors
    ///
    /// Returns [`BbgError::InvalidInterval`] or [`BbgError::InvalidDates`] before any
    /// session is opened, or an error if the session fails or a request is rejected.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(securities = self.securities.len(), interval = self.interval)))]
    pub async fn fetch(self) -> Result<Table<BarKey>, BbgError> {
        let requests = self.requests()?;
        let answers = refdata::execute(&self.client, &requests).await?;

        let mut table = Table::new();
        for (security, messages) in self.securities.iter().zip(&answers) {
            table.extend(assemble_bars(security, messages, self.tz)?);
        }
        Ok(table)
    }
}

fn assemble_bars(
    security: &str,
    messages: &[ResponseMessage],
    tz: Tz,
) -> Result<Table<BarKey>, BbgError> {
    let mut table = Table::new();
    for msg in messages {
        let bars = msg
            .content
            .path(&["barData", "barTickData"])
            .and_then(Value::as_list)
            .ok_or_else(|| BbgError::Data(format!("{} message without barData", msg.message_type)))?;

        for bar in bars {
            let Some(fields) = bar.as_map() else {
                continue;
            };
            let Some(time) = fields.get("time").and_then(Value::as_datetime) else {
                continue;
            };
            let key = BarKey {
                security: security.to_string(),
                time: time.with_timezone(&tz),
            };
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
