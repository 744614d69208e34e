//! The network collaborator the client wraps.
//!
//! # Design
//! The client never performs I/O itself. A `Transport` receives the target
//! URL and the final configuration and returns a future of the response.
//! `send` is called synchronously while dispatching, before anything is
//! awaited; the returned future must be `'static` because the client runs it
//! on its own task so it can be raced against a timer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::Config;
use crate::error::TransportError;
use crate::http::HttpResponse;

pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'static>>;

pub trait Transport: Send + Sync + 'static {
    fn send(&self, url: &str, config: &Config) -> TransportFuture;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, url: &str, config: &Config) -> TransportFuture {
        (**self).send(url, config)
    }
}

/// Wraps a closure as a `Transport`. Keeps one-off test doubles short.
pub struct FnTransport<F>(pub F);

impl<F> Transport for FnTransport<F>
where
    F: Fn(&str, &Config) -> TransportFuture + Send + Sync + 'static,
{
    fn send(&self, url: &str, config: &Config) -> TransportFuture {
        (self.0)(url, config)
    }
}
