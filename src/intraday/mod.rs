//! Intraday data: raw ticks and fixed-interval bars.
//!
//! Both shapes take naive start/end times in a caller time zone, query the service in
//! UTC and hand results back in that same zone. Each distinct security gets its own
//! request; all of them share one session.

mod bar;
mod tick;

pub use bar::{BarEvent, BarKey, IntradayBar};
pub use tick::{IntradayTick, TickKey};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::BbgError;

/// Securities in first-seen order with repeats removed; each one gets a single request.
pub(crate) fn unique_securities<S: Into<String>>(
    securities: impl IntoIterator<Item = S>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in securities {
        let s = s.into();
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

/// Interprets `naive` in `tz`. On a DST fold the earlier instant wins.
pub(crate) fn to_utc(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, BbgError> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| BbgError::Data(format!("{naive} does not exist in {tz}")))
}

/// Validates the range and converts both ends to UTC.
pub(crate) fn utc_range(
    start: NaiveDateTime,
    end: NaiveDateTime,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), BbgError> {
    let (s, e) = (to_utc(start, tz)?, to_utc(end, tz)?);
    if s >= e {
        return Err(BbgError::InvalidDates);
    }
    Ok((s, e))
}

/// Datetime as the request schema expects it (UTC, no offset).
pub(crate) fn wire_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
