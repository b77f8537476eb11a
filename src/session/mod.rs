//! Session lifecycle: start, open a service, send requests, poll for their answers.
//!
//! One session serves one query object. It is started, used for one or more requests
//! and stopped again; nothing is shared between queries.

mod event;
mod http;
mod request;
mod scripted;
mod transport;
mod wire;

use std::time::Duration;

pub use event::{CorrelationId, Event, EventType, Message, ResponseMessage};
pub use http::HttpTransport;
pub use request::Request;
pub use scripted::{RequestLog, ScriptedTransport};
pub use transport::Transport;

use crate::core::BbgError;
use crate::core::value::Value;

const SESSION_UP: &[&str] = &["SessionConnectionUp", "SessionStarted"];
const SERVICE_UP: &[&str] = &["ServiceOpened", "SessionStarted"];
const SESSION_DOWN: &[&str] = &[
    "SessionTerminated",
    "SessionConnectionDown",
    "SessionStartupFailure",
];

/// An opened service. Creates requests bound to its URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    uri: String,
}

impl Service {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn create_request(&self, operation: &str) -> Request {
        Request::new(self.uri.as_str(), operation)
    }
}

/// A session over some [`Transport`].
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    poll_timeout: Duration,
    next_cid: u64,
    started: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, poll_timeout: Duration) -> Self {
        Self {
            transport,
            poll_timeout,
            next_cid: 1,
            started: false,
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Starts the session and waits for it to come up.
    ///
    /// # Errors
    /// [`BbgError::Connection`] if the transport cannot start or cannot be reached,
    /// [`BbgError::SessionStatus`] if the first status event is not a session-up message.
    pub async fn start(&mut self) -> Result<(), BbgError> {
        #[cfg(feature = "tracing")]
        tracing::info!("starting session");
        let started = self
            .transport
            .start()
            .await
            .map_err(|e| BbgError::Connection(format!("failed to start session: {e}")))?;
        if !started {
            return Err(BbgError::Connection("failed to start session".into()));
        }
        self.started = true;
        let ev = self.transport.next_event(self.poll_timeout).await?;
        expect_status(&ev, SESSION_UP)?;
        #[cfg(feature = "tracing")]
        tracing::info!(event = %ev.event_type, message_type = ev.last_message_type().unwrap_or_default(), "session started");
        Ok(())
    }

    /// Opens `uri` and waits for the service to be reported open.
    ///
    /// # Errors
    /// [`BbgError::Connection`] if the open is refused or fails, [`BbgError::SessionStatus`]
    /// if the next status event does not confirm it.
    pub async fn open_service(&mut self, uri: &str) -> Result<Service, BbgError> {
        #[cfg(feature = "tracing")]
        tracing::info!(service = uri, "opening service");
        let opened = self
            .transport
            .open_service(uri)
            .await
            .map_err(|e| BbgError::Connection(format!("failed to open service {uri}: {e}")))?;
        if !opened {
            return Err(BbgError::Connection(format!("failed to open service {uri}")));
        }
        let ev = self.transport.next_event(self.poll_timeout).await?;
        expect_status(&ev, SERVICE_UP)?;
        Ok(Service {
            uri: uri.to_string(),
        })
    }

    /// Sends `request` and returns the correlation id its answers will carry.
    pub async fn send(&mut self, request: &Request) -> Result<CorrelationId, BbgError> {
        let cid = CorrelationId(self.next_cid);
        self.next_cid += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(%cid, operation = request.operation(), "sending request");
        self.transport.send_request(request, cid).await?;
        Ok(cid)
    }

    /// Polls until the terminal `RESPONSE` event and returns every message for `cid`,
    /// decoded, in arrival order.
    ///
    /// `TIMEOUT` events and messages for other requests are skipped.
    ///
    /// # Errors
    /// [`BbgError::SessionClosed`] if the session goes down first, [`BbgError::Response`]
    /// if the service rejected the request as a whole.
    pub async fn collect(&mut self, cid: CorrelationId) -> Result<Vec<ResponseMessage>, BbgError> {
        let mut out = Vec::new();
        loop {
            let ev = self.transport.next_event(self.poll_timeout).await?;

            if ev.event_type == EventType::SessionStatus
                && let Some(down) = ev
                    .messages
                    .iter()
                    .find(|m| SESSION_DOWN.contains(&m.message_type.as_str()))
            {
                return Err(BbgError::SessionClosed(down.message_type.clone()));
            }

            if ev.event_type.is_response() {
                for msg in ev.messages.iter().filter(|m| m.correlation_ids.contains(&cid)) {
                    let decoded = ResponseMessage::from(msg);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%cid, message_type = %decoded.message_type, event = %ev.event_type, "response message");
                    check_response_error(&decoded)?;
                    out.push(decoded);
                }
            }

            if ev.event_type == EventType::Response {
                return Ok(out);
            }
        }
    }

    /// Sends `request` and collects its answers.
    pub async fn request(&mut self, request: &Request) -> Result<Vec<ResponseMessage>, BbgError> {
        let cid = self.send(request).await?;
        self.collect(cid).await
    }

    /// Stops the session and reads the final status event. A session that never
    /// started is left alone.
    pub async fn stop(&mut self) -> Result<(), BbgError> {
        if !self.started {
            return Ok(());
        }
        self.started = false;
        self.transport.stop().await?;
        let _ev = self.transport.next_event(self.poll_timeout).await?;
        #[cfg(feature = "tracing")]
        tracing::info!(event = %_ev.event_type, message_type = _ev.last_message_type().unwrap_or_default(), "session stopped");
        Ok(())
    }

    /// Like [`Session::stop`] but never fails; a failed stop is only logged.
    pub async fn close(&mut self) {
        if let Err(_e) = self.stop().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "failed to stop session cleanly");
        }
    }
}

fn expect_status(ev: &Event, accepted: &[&str]) -> Result<(), BbgError> {
    match ev.last_message_type() {
        Some(t) if accepted.contains(&t) => Ok(()),
        other => Err(BbgError::SessionStatus {
            event: ev.event_type.to_string(),
            message_type: other.unwrap_or_default().to_string(),
        }),
    }
}

/// Turns a request-level `responseError` into [`BbgError::Response`].
fn check_response_error(msg: &ResponseMessage) -> Result<(), BbgError> {
    let Some(err) = msg.content.get("responseError") else {
        return Ok(());
    };
    let text = |k: &str| err.get(k).and_then(Value::as_str).unwrap_or_default().to_string();
    Err(BbgError::Response {
        category: text("category"),
        message: text("message"),
    })
}
