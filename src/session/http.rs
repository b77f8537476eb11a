//! Transport that drives a vendor session through an HTTP gateway.
//!
//! Gateway routes (relative to the configured base URL):
//! - `POST sessions` `{serverHost, serverPort}` -> `{sessionId, events}`
//! - `POST sessions/{id}/services` `{service}` -> `{events}`
//! - `POST sessions/{id}/requests` `{correlationId, service, operation, request}` -> `{events}`
//! - `GET sessions/{id}/events?timeout=<ms>` -> `{events}`
//! - `DELETE sessions/{id}` -> `{events}`
//!
//! Events carried in any response body are queued and handed out one by one. A stop
//! answered without events is reported as `SessionTerminated`.

use std::collections::VecDeque;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use url::Url;

use crate::core::client::RetryConfig;
use crate::core::{BbgError, net};
use crate::session::event::{CorrelationId, Event, EventType};
use crate::session::request::Request;
use crate::session::transport::Transport;
use crate::session::wire::{EventsEnvelope, SessionEnvelope};

#[derive(Debug)]
pub struct HttpTransport {
    http: Client,
    gateway: Url,
    host: String,
    port: u16,
    retry: RetryConfig,
    session_id: Option<String>,
    pending: VecDeque<Event>,
}

impl HttpTransport {
    pub(crate) fn new(
        http: Client,
        gateway: Url,
        host: String,
        port: u16,
        retry: RetryConfig,
    ) -> Self {
        Self {
            http,
            gateway,
            host,
            port,
            retry,
            session_id: None,
            pending: VecDeque::new(),
        }
    }

    fn session_url(&self, tail: &str) -> Result<Url, BbgError> {
        let id = self
            .session_id
            .as_deref()
            .ok_or_else(|| BbgError::Connection("session not started".into()))?;
        let path = if tail.is_empty() {
            format!("sessions/{id}")
        } else {
            format!("sessions/{id}/{tail}")
        };
        Ok(self.gateway.join(&path)?)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, BbgError> {
        send_with_retry(req, &self.retry).await
    }

    fn enqueue(&mut self, body: &str) -> Result<(), BbgError> {
        if body.trim().is_empty() {
            return Ok(());
        }
        let env: EventsEnvelope = serde_json::from_str(body)?;
        self.pending.extend(env.events.into_iter().map(Event::from));
        Ok(())
    }

    async fn do_start(&mut self) -> Result<bool, BbgError> {
        let url = self.gateway.join("sessions")?;
        let req = self
            .http
            .post(url.clone())
            .json(&json!({ "serverHost": self.host, "serverPort": self.port }));
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!(status = resp.status().as_u16(), %url, "gateway refused session start");
            return Ok(false);
        }
        let body = net::get_text(resp, "session_start", "gateway", "json").await?;
        let env: SessionEnvelope = serde_json::from_str(&body)?;
        self.session_id = Some(env.session_id);
        self.pending.extend(env.events.into_iter().map(Event::from));
        Ok(true)
    }

    async fn do_open_service(&mut self, uri: &str) -> Result<bool, BbgError> {
        let url = self.session_url("services")?;
        let req = self.http.post(url).json(&json!({ "service": uri }));
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let body = net::get_text(resp, "open_service", "gateway", "json").await?;
        self.enqueue(&body)?;
        Ok(true)
    }

    async fn do_send_request(
        &mut self,
        request: &Request,
        cid: CorrelationId,
    ) -> Result<(), BbgError> {
        let url = self.session_url("requests")?;
        let payload = json!({
            "correlationId": cid,
            "service": request.service(),
            "operation": request.operation(),
            "request": request.to_json(),
        });
        let resp = self.send(self.http.post(url.clone()).json(&payload)).await?;
        if !resp.status().is_success() {
            return Err(BbgError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = net::get_text(resp, "request", request.operation(), "json").await?;
        self.enqueue(&body)
    }

    async fn do_next_event(&mut self, timeout: Duration) -> Result<Event, BbgError> {
        if let Some(ev) = self.pending.pop_front() {
            return Ok(ev);
        }
        let mut url = self.session_url("events")?;
        url.query_pairs_mut()
            .append_pair("timeout", &timeout.as_millis().to_string());
        let resp = self.send(self.http.get(url.clone())).await?;
        if !resp.status().is_success() {
            return Err(BbgError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = net::get_text(resp, "events", "gateway", "json").await?;
        self.enqueue(&body)?;
        Ok(self.pending.pop_front().unwrap_or_else(Event::timeout))
    }

    async fn do_stop(&mut self) -> Result<(), BbgError> {
        if self.session_id.is_none() {
            return Ok(());
        }
        let url = self.session_url("")?;
        let resp = self.send(self.http.delete(url.clone())).await?;
        self.session_id = None;
        self.pending.clear();
        if !resp.status().is_success() {
            return Err(BbgError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = net::get_text(resp, "session_stop", "gateway", "json").await?;
        self.enqueue(&body)?;
        if self.pending.is_empty() {
            self.pending.push_back(Event::status(
                EventType::SessionStatus,
                &["SessionTerminated"],
            ));
        }
        Ok(())
    }
}

impl Transport for HttpTransport {
    fn start(&mut self) -> BoxFuture<'_, Result<bool, BbgError>> {
        self.do_start().boxed()
    }

    fn open_service<'a>(&'a mut self, uri: &'a str) -> BoxFuture<'a, Result<bool, BbgError>> {
        self.do_open_service(uri).boxed()
    }

    fn send_request<'a>(
        &'a mut self,
        request: &'a Request,
        cid: CorrelationId,
    ) -> BoxFuture<'a, Result<(), BbgError>> {
        self.do_send_request(request, cid).boxed()
    }

    fn next_event(&mut self, timeout: Duration) -> BoxFuture<'_, Result<Event, BbgError>> {
        self.do_next_event(timeout).boxed()
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<(), BbgError>> {
        self.do_stop().boxed()
    }
}

/// Sends a gateway call, retrying per `cfg` on retryable statuses and transport errors.
pub(crate) async fn send_with_retry(
    req: RequestBuilder,
    cfg: &RetryConfig,
) -> Result<Response, BbgError> {
    let mut attempt: u32 = 0;
    loop {
        let this_try = req
            .try_clone()
            .ok_or_else(|| BbgError::Data("request body cannot be cloned for retry".into()))?;
        let can_retry = cfg.enabled && attempt < cfg.max_retries;

        match this_try.send().await {
            Ok(resp) => {
                if can_retry && cfg.retry_on_status.contains(&resp.status().as_u16()) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(status = resp.status().as_u16(), attempt, "retrying gateway call");
                } else {
                    return Ok(resp);
                }
            }
            Err(e) => {
                let retryable = (e.is_timeout() && cfg.retry_on_timeout)
                    || (e.is_connect() && cfg.retry_on_connect);
                if !(can_retry && retryable) {
                    return Err(e.into());
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %e, attempt, "retrying gateway call");
            }
        }

        tokio::time::sleep(cfg.backoff.delay(attempt)).await;
        attempt += 1;
    }
}
