use std::time::Duration;

/// Wait between two attempts of the same gateway call.
#[derive(Clone, Debug)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// `base * factor^attempt`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
    },
}

impl Backoff {
    /// Delay before retry number `attempt` (zero based).
    pub(crate) fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(d) => *d,
            Self::Exponential { base, factor, max } => {
                let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
                let secs = base.as_secs_f64() * factor.powi(exp);
                if secs.is_finite() && secs < max.as_secs_f64() {
                    Duration::from_secs_f64(secs)
                } else {
                    *max
                }
            }
        }
    }
}

/// Configuration for retrying gateway calls.
///
/// Retries are off unless enabled: a request is sent once and a failed session
/// surfaces immediately. Enabling retries only repeats individual HTTP calls to the
/// gateway; it never re-sends a request on a new session.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Off by default.
    pub enabled: bool,
    /// Retries after the first attempt; a call is tried at most `max_retries + 1` times.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Gateway statuses worth another attempt.
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: 3,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(200),
                factor: 2.0,
                max: Duration::from_secs(3),
            },
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}
