//! bbgdata-rs: async market-data queries reshaped into tables.
//!
//! Every query shape owns one session for its lifetime: it starts the session, opens the
//! reference data service, sends its requests, decodes the answers through the generic
//! element decoder and pivots them into a [`Table`].
//!
//! - [`DataPoint`]: current field values per security.
//! - [`BulkData`]: list-valued fields, one row per list entry.
//! - [`DataHistory`]: end-of-day series over a date range.
//! - [`IntradayTick`] and [`IntradayBar`]: raw ticks and fixed-interval bars.
//!
//! Sessions run over a [`Transport`]. [`HttpTransport`] talks to a JSON gateway in
//! front of the vendor service; [`ScriptedTransport`] replays a fixed script offline.

pub mod bulk;
pub mod core;
pub mod history;
pub mod intraday;
pub mod point;
pub mod session;

pub use bulk::{BulkData, BulkKey};
pub use crate::core::client::{Backoff, RetryConfig};
pub use crate::core::refdata::Overrides;
pub use crate::core::{
    BbgClient, BbgClientBuilder, BbgError, DataType, Element, ElementError, FieldException,
    Name, REFDATA_SERVICE, Row, SecurityError, Table, TableKey, Value, decode,
};
pub use history::{
    DataHistory, HistoryKey, NonTradingDayFillMethod, NonTradingDayFillOption,
    PeriodicityAdjustment, PeriodicitySelection, PricingOption,
};
pub use intraday::{BarEvent, BarKey, IntradayBar, IntradayTick, TickKey};
pub use point::DataPoint;
pub use session::{
    CorrelationId, Event, EventType, HttpTransport, Message, Request, RequestLog,
    ResponseMessage, ScriptedTransport, Session, Transport,
};

#[cfg(feature = "dataframe")]
pub use crate::core::dataframe::ToDataFrame;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`. Intended for demos and tests.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing_for_tests() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
