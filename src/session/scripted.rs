//! An in-memory transport that replays a fixed script of events.
//!
//! Used for offline runs and tests: no gateway, no network. Replies are queued per
//! request and stamped with the correlation id the session assigns at send time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::core::BbgError;
use crate::core::element::Element;
use crate::session::event::{CorrelationId, Event, EventType, Message};
use crate::session::request::Request;
use crate::session::transport::Transport;

/// Requests observed by a [`ScriptedTransport`], shared between clones.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<Request>>>);

impl RequestLog {
    pub fn requests(&self) -> Vec<Request> {
        self.0.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|g| g.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, req: Request) {
        if let Ok(mut g) = self.0.lock() {
            g.push(req);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    queue: VecDeque<Event>,
    replies: VecDeque<Vec<Event>>,
    start_ok: bool,
    open_ok: bool,
    log: RequestLog,
    stopped: bool,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// An empty script. Starting and opening succeed but no status events are queued.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            replies: VecDeque::new(),
            start_ok: true,
            open_ok: true,
            log: RequestLog::default(),
            stopped: false,
        }
    }

    /// A script whose session comes up and whose service opens.
    pub fn connected() -> Self {
        Self::new()
            .event(Event::status(
                EventType::SessionStatus,
                &["SessionConnectionUp"],
            ))
            .event(Event::status(EventType::ServiceStatus, &["ServiceOpened"]))
    }

    /// Queues a raw event, delivered before any reply.
    #[must_use]
    pub fn event(mut self, ev: Event) -> Self {
        self.queue.push_back(ev);
        self
    }

    /// Queues the answer to the next request: every element but the last arrives as a
    /// `PARTIAL_RESPONSE`, the last one as the terminal `RESPONSE`.
    #[must_use]
    pub fn reply(self, elements: Vec<Element>) -> Self {
        let n = elements.len();
        let events = elements
            .into_iter()
            .enumerate()
            .map(|(i, el)| {
                let kind = if i + 1 == n {
                    EventType::Response
                } else {
                    EventType::PartialResponse
                };
                Event::new(kind, vec![Message::response(CorrelationId(0), el)])
            })
            .collect();
        self.reply_events(events)
    }

    /// Queues raw events as the answer to the next request. Messages without
    /// correlation ids are stamped with the id of that request.
    #[must_use]
    pub fn reply_events(mut self, events: Vec<Event>) -> Self {
        self.replies.push_back(events);
        self
    }

    #[must_use]
    pub fn fail_start(mut self) -> Self {
        self.start_ok = false;
        self
    }

    #[must_use]
    pub fn fail_open(mut self) -> Self {
        self.open_ok = false;
        self
    }

    /// Handle on every request sent through this script or its clones.
    pub fn log(&self) -> RequestLog {
        self.log.clone()
    }

    fn terminated() -> Event {
        Event::status(EventType::SessionStatus, &["SessionTerminated"])
    }
}

impl Transport for ScriptedTransport {
    fn start(&mut self) -> BoxFuture<'_, Result<bool, BbgError>> {
        let ok = self.start_ok;
        async move { Ok(ok) }.boxed()
    }

    fn open_service<'a>(&'a mut self, _uri: &'a str) -> BoxFuture<'a, Result<bool, BbgError>> {
        let ok = self.open_ok;
        async move { Ok(ok) }.boxed()
    }

    fn send_request<'a>(
        &'a mut self,
        request: &'a Request,
        cid: CorrelationId,
    ) -> BoxFuture<'a, Result<(), BbgError>> {
        self.log.push(request.clone());
        if let Some(events) = self.replies.pop_front() {
            for mut ev in events {
                for msg in &mut ev.messages {
                    if ev.event_type.is_response()
                        && (msg.correlation_ids.is_empty()
                            || msg.correlation_ids == [CorrelationId(0)])
                    {
                        msg.correlation_ids = vec![cid];
                    }
                }
                self.queue.push_back(ev);
            }
        }
        async { Ok(()) }.boxed()
    }

    fn next_event(&mut self, _timeout: Duration) -> BoxFuture<'_, Result<Event, BbgError>> {
        let ev = self.queue.pop_front().unwrap_or_else(Self::terminated);
        async move { Ok(ev) }.boxed()
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<(), BbgError>> {
        if !self.stopped {
            self.stopped = true;
            self.queue.clear();
            self.queue.push_back(Self::terminated());
        }
        async { Ok(()) }.boxed()
    }
}
