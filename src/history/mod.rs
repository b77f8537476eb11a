//! Historical end-of-day data over a date range.

mod assemble;
mod params;

use chrono::NaiveDate;
use serde::Serialize;

pub use params::{
    NonTradingDayFillMethod, NonTradingDayFillOption, PeriodicityAdjustment,
    PeriodicitySelection, PricingOption,
};

use crate::core::refdata::{self, Overrides};
use crate::core::{BbgClient, BbgError, Table, TableKey, Value};
use crate::session::Request;

use assemble::assemble_history;

/// Row key of a historical table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HistoryKey {
    pub security: String,
    pub date: NaiveDate,
}

impl TableKey for HistoryKey {
    fn index_names() -> &'static [&'static str] {
        &["security", "date"]
    }

    fn index_values(&self) -> Vec<Value> {
        vec![Value::String(self.security.clone()), Value::Date(self.date)]
    }
}

/// A builder for historical data requests.
///
/// Defaults follow the service: `ACTUAL` periodicity adjustment and `MONTHLY` selection.
#[derive(Debug, Clone)]
pub struct DataHistory {
    client: BbgClient,
    securities: Vec<String>,
    fields: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
    adjustment: PeriodicityAdjustment,
    selection: PeriodicitySelection,
    overrides: Overrides,
    currency: Option<String>,
    pricing_option: Option<PricingOption>,
    fill_option: Option<NonTradingDayFillOption>,
    fill_method: Option<NonTradingDayFillMethod>,
    max_data_points: Option<u32>,
    calendar_code: Option<String>,
}

impl DataHistory {
    pub fn new<S, F>(
        client: &BbgClient,
        securities: impl IntoIterator<Item = S>,
        fields: impl IntoIterator<Item = F>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self
    where
        S: Into<String>,
        F: Into<String>,
    {
        Self {
            client: client.clone(),
            securities: securities.into_iter().map(Into::into).collect(),
            fields: fields.into_iter().map(Into::into).collect(),
            start,
            end,
            adjustment: PeriodicityAdjustment::default(),
            selection: PeriodicitySelection::default(),
            overrides: Vec::new(),
            currency: None,
            pricing_option: None,
            fill_option: None,
            fill_method: None,
            max_data_points: None,
            calendar_code: None,
        }
    }

    #[must_use]
    pub fn adjustment(mut self, adjustment: PeriodicityAdjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    #[must_use]
    pub fn selection(mut self, selection: PeriodicitySelection) -> Self {
        self.selection = selection;
        self
    }

    /// Overrides `field` with `value` for the duration of this request.
    #[must_use]
    pub fn with_override(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.overrides.push((field.into(), value.to_string()));
        self
    }

    /// Converts values from the local currency into `currency` (ISO code).
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn pricing_option(mut self, option: PricingOption) -> Self {
        self.pricing_option = Some(option);
        self
    }

    /// Which non-trading days get a point at all.
    #[must_use]
    pub fn non_trading_day_fill_option(mut self, option: NonTradingDayFillOption) -> Self {
        self.fill_option = Some(option);
        self
    }

    /// How the points of non-trading days are filled.
    #[must_use]
    pub fn non_trading_day_fill_method(mut self, method: NonTradingDayFillMethod) -> Self {
        self.fill_method = Some(method);
        self
    }

    /// Caps the number of points returned per security.
    #[must_use]
    pub fn max_data_points(mut self, n: u32) -> Self {
        self.max_data_points = Some(n);
        self
    }

    /// Uses the trading calendar of `code` (country, exchange or religion).
    #[must_use]
    pub fn calendar_code(mut self, code: impl Into<String>) -> Self {
        self.calendar_code = Some(code.into());
        self
    }

    pub(crate) fn request(&self) -> Request {
        let mut req = refdata::securities_fields_request(
            "HistoricalDataRequest",
            &self.securities,
            &self.fields,
            &self.overrides,
        );
        req.set("periodicityAdjustment", self.adjustment.as_str())
            .set("periodicitySelection", self.selection.as_str())
            .set("startDate", self.start.format("%Y%m%d").to_string())
            .set("endDate", self.end.format("%Y%m%d").to_string());

        if let Some(c) = &self.currency {
            req.set("currency", c.as_str());
        }
        if let Some(p) = self.pricing_option {
            req.set("pricingOption", p.as_str());
        }
        if let Some(o) = self.fill_option {
            req.set("nonTradingDayFillOption", o.as_str());
        }
        if let Some(m) = self.fill_method {
            req.set("nonTradingDayFillMethod", m.as_str());
        }
        if let Some(n) = self.max_data_points {
            req.set("maxDataPoints", n);
        }
        if let Some(code) = &self.calendar_code {
            req.set("calendarCodeOverride", code.as_str());
        }
        req
    }

    /// Executes the request and returns one row per (security, date).
    ///
    /// # Errors
    ///
    /// Returns [`BbgError::InvalidDates`] if `start` is after `end` (no session is opened),
    /// or an error if the session cannot be established or the request is rejected.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(start = %self.start, end = %self.end)))]
    pub async fn fetch(self) -> Result<Table<HistoryKey>, BbgError> {
        if self.start > self.end {
            return Err(BbgError::InvalidDates);
        }
        let mut answers = refdata::execute(&self.client, &[self.request()]).await?;
        assemble_history(&answers.pop().unwrap_or_default())
    }
}
