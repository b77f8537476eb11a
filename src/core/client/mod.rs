//! Public client surface + builder.
//! Defaults live in `constants`, the retry policy in `retry`.

mod constants;
mod retry;

pub use constants::REFDATA_SERVICE;
pub use retry::{Backoff, RetryConfig};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use constants::{DEFAULT_GATEWAY, DEFAULT_HOST, DEFAULT_POLL_TIMEOUT_MS, DEFAULT_PORT, USER_AGENT};
use reqwest::Client;
use url::Url;

use crate::core::BbgError;
use crate::session::{HttpTransport, Session, Transport};

type Connector = Arc<dyn Fn() -> Box<dyn Transport> + Send + Sync>;

/// Connection settings shared by every query.
///
/// Cheap to clone. Each query opens its own session from these settings and tears it
/// down when done.
#[derive(Clone)]
pub struct BbgClient {
    http: Client,
    gateway: Url,
    host: String,
    port: u16,
    poll_timeout: Duration,
    retry: RetryConfig,
    connector: Option<Connector>,
}

impl fmt::Debug for BbgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BbgClient")
            .field("gateway", &self.gateway.as_str())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("poll_timeout", &self.poll_timeout)
            .field("retry", &self.retry)
            .field("custom_connector", &self.connector.is_some())
            .finish()
    }
}

impl BbgClient {
    /// Create a new builder.
    pub fn builder() -> BbgClientBuilder {
        BbgClientBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn gateway(&self) -> &Url {
        &self.gateway
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// A fresh, not yet started session.
    pub fn new_session(&self) -> Session<Box<dyn Transport>> {
        let transport: Box<dyn Transport> = match &self.connector {
            Some(make) => make(),
            None => Box::new(HttpTransport::new(
                self.http.clone(),
                self.gateway.clone(),
                self.host.clone(),
                self.port,
                self.retry.clone(),
            )),
        };
        Session::new(transport, self.poll_timeout)
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct BbgClientBuilder {
    user_agent: Option<String>,
    gateway: Option<Url>,
    host: Option<String>,
    port: Option<u16>,
    poll_timeout: Option<Duration>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    connector: Option<Connector>,
}

impl BbgClientBuilder {
    /// Override the User-Agent sent to the gateway.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the gateway base URL (e.g., `http://localhost:8195/`).
    #[must_use]
    pub fn gateway(mut self, url: Url) -> Self {
        self.gateway = Some(url);
        self
    }

    /// Host of the market-data server. Default: `localhost`.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Port of the market-data server. Default: `8194`.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Interval used when polling for the next event. Default: 500 ms.
    #[must_use]
    pub fn poll_timeout(mut self, dur: Duration) -> Self {
        self.poll_timeout = Some(dur);
        self
    }

    /// Set a global HTTP timeout for gateway calls. Default: none.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout for gateway calls. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Retry policy for individual gateway calls. Default: disabled.
    #[must_use]
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Replace the HTTP gateway with a custom transport, created once per session.
    #[must_use]
    pub fn connector<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Box<dyn Transport> + Send + Sync + 'static,
    {
        self.connector = Some(Arc::new(make));
        self
    }

    pub fn build(self) -> Result<BbgClient, BbgError> {
        let mut gateway = match self.gateway {
            Some(u) => u,
            None => Url::parse(DEFAULT_GATEWAY)?,
        };
        // `Url::join` drops the last path segment unless the base ends with '/'.
        if !gateway.path().ends_with('/') {
            let path = format!("{}/", gateway.path());
            gateway.set_path(&path);
        }

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        let http = httpb.build()?;

        Ok(BbgClient {
            http,
            gateway,
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            poll_timeout: self
                .poll_timeout
                .unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS)),
            retry: self.retry.unwrap_or_default(),
            connector: self.connector,
        })
    }
}
