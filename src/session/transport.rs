use std::time::Duration;

use futures::future::BoxFuture;

use crate::core::BbgError;
use crate::session::event::{CorrelationId, Event};
use crate::session::request::Request;

/// The raw session surface a vendor connection offers.
///
/// Implementations only move events; every decision about which events matter is
/// made by [`Session`](crate::session::Session).
pub trait Transport: Send {
    /// Begins connecting. `Ok(false)` means the connection could not be initiated.
    fn start(&mut self) -> BoxFuture<'_, Result<bool, BbgError>>;

    /// Requests that a service be opened. `Ok(false)` means the open was refused.
    fn open_service<'a>(&'a mut self, uri: &'a str) -> BoxFuture<'a, Result<bool, BbgError>>;

    /// Sends `request`, tagging every answer with `cid`.
    fn send_request<'a>(
        &'a mut self,
        request: &'a Request,
        cid: CorrelationId,
    ) -> BoxFuture<'a, Result<(), BbgError>>;

    /// Waits up to `timeout` for the next event. Yields a `TIMEOUT` event when none arrives.
    fn next_event(&mut self, timeout: Duration) -> BoxFuture<'_, Result<Event, BbgError>>;

    /// Tears the connection down. A final status event is queued for `next_event`.
    fn stop(&mut self) -> BoxFuture<'_, Result<(), BbgError>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn start(&mut self) -> BoxFuture<'_, Result<bool, BbgError>> {
        (**self).start()
    }

    fn open_service<'a>(&'a mut self, uri: &'a str) -> BoxFuture<'a, Result<bool, BbgError>> {
        (**self).open_service(uri)
    }

    fn send_request<'a>(
        &'a mut self,
        request: &'a Request,
        cid: CorrelationId,
    ) -> BoxFuture<'a, Result<(), BbgError>> {
        (**self).send_request(request, cid)
    }

    fn next_event(&mut self, timeout: Duration) -> BoxFuture<'_, Result<Event, BbgError>> {
        (**self).next_event(timeout)
    }

    fn stop(&mut self) -> BoxFuture<'_, Result<(), BbgError>> {
        (**self).stop()
    }
}
