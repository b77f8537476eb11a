//! Centralized constants for default endpoints and session settings.

/// Identifies this client to the gateway.
pub(crate) const USER_AGENT: &str = concat!("bbgdata-rs/", env!("CARGO_PKG_VERSION"));

/// Default host of the market-data server the gateway connects to.
pub(crate) const DEFAULT_HOST: &str = "localhost";

/// Default port of the market-data server (desktop API port).
pub(crate) const DEFAULT_PORT: u16 = 8194;

/// Fixed interval used when polling a session for its next event.
pub(crate) const DEFAULT_POLL_TIMEOUT_MS: u64 = 500;

/// Default base URL of the HTTP gateway that fronts the vendor session API.
pub(crate) const DEFAULT_GATEWAY: &str = "http://localhost:8195/";

/// Reference data service; hosts every request shape this crate issues.
pub const REFDATA_SERVICE: &str = "//blp/refdata";
