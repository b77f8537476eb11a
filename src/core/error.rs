use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
///
/// Field-level problems (a missing field, a field exception, a value that cannot be
/// extracted) are never reported through this type; they surface as missing cells.
#[derive(Debug, Error)]
pub enum BbgError {
    /// An error occurred during an HTTP request to the gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A gateway body could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The gateway returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The session could not be started or the service could not be opened.
    #[error("connection error: {0}")]
    Connection(String),

    /// A session or service status event carried an unexpected message type.
    #[error("unexpected {event} event with message type {message_type}")]
    SessionStatus {
        /// The event type name, e.g. `SESSION_STATUS`.
        event: String,
        /// The message type of the last message in the event.
        message_type: String,
    },

    /// The session terminated before the terminal response arrived.
    #[error("session closed: {0}")]
    SessionClosed(String),

    /// The service rejected the request as a whole (`responseError`).
    #[error("request rejected ({category}): {message}")]
    Response {
        /// Vendor error category, e.g. `BAD_ARGS`.
        category: String,
        /// Human readable message.
        message: String,
    },

    /// The data received was in an unexpected format or was missing a required part.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    /// An invalid date range was provided (start must be before end).
    #[error("invalid date range: start must be before end")]
    InvalidDates,

    /// A bar interval outside of 1..=1440 minutes was requested.
    #[error("invalid bar interval: {0} minutes (expected 1..=1440)")]
    InvalidInterval(u32),
}
