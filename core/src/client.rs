//! Per-verb API client over a pluggable transport.
//!
//! # Design
//! `Client` holds the client-level configuration and the transport, both
//! behind `Arc`, and carries no other state. Every verb method funnels into
//! one `dispatch` routine: merge the call configuration over the client's,
//! stamp the method, race the transport against the timeout, then resolve
//! the response. `download` shares the merge and race steps but hands back
//! the raw body.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;

use crate::config::{Config, DEFAULT_TIMEOUT, METHOD};
use crate::error::Error;
use crate::http::{HttpResponse, Method};
use crate::race::{race, TimeoutPolicy};
use crate::resolve::{extract_bytes, resolve};
use crate::transport::Transport;

/// Builder for a `Client` with non-default settings.
pub struct ClientBuilder<T> {
    transport: T,
    config: Config,
    default_timeout: Duration,
    policy: TimeoutPolicy,
}

impl<T: Transport> ClientBuilder<T> {
    /// Client-level configuration merged under every call.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Timeout used when no configuration names one.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Abort the transport task when a request times out instead of letting
    /// it run to completion in the background.
    pub fn cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.policy = if cancel {
            TimeoutPolicy::Cancel
        } else {
            TimeoutPolicy::Detach
        };
        self
    }

    pub fn build(self) -> Client<T> {
        Client {
            transport: Arc::new(self.transport),
            config: Arc::new(self.config),
            default_timeout: self.default_timeout,
            policy: self.policy,
        }
    }
}

/// Asynchronous API client.
///
/// Cheap to clone; clones share the transport and client configuration.
pub struct Client<T> {
    transport: Arc<T>,
    config: Arc<Config>,
    default_timeout: Duration,
    policy: TimeoutPolicy,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            default_timeout: self.default_timeout,
            policy: self.policy,
        }
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::builder(transport).build()
    }

    pub fn with_config(transport: T, config: Config) -> Self {
        Self::builder(transport).config(config).build()
    }

    pub fn builder(transport: T) -> ClientBuilder<T> {
        ClientBuilder {
            transport,
            config: Config::default(),
            default_timeout: DEFAULT_TIMEOUT,
            policy: TimeoutPolicy::default(),
        }
    }

    /// The client-level configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn get(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Get, url, call).await
    }

    pub async fn post(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Post, url, call).await
    }

    pub async fn put(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Put, url, call).await
    }

    pub async fn delete(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Delete, url, call).await
    }

    pub async fn patch(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Patch, url, call).await
    }

    pub async fn head(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Head, url, call).await
    }

    pub async fn options(&self, url: &str, call: Config) -> Result<Value, Error> {
        self.request(Method::Options, url, call).await
    }

    /// Sends `method` to `url` and resolves the decoded body.
    ///
    /// Any `method` key in `call` is overwritten with `method`.
    pub async fn request(&self, method: Method, url: &str, call: Config) -> Result<Value, Error> {
        let response = self.dispatch(method.as_str().into(), url, call).await?;
        resolve(response).await
    }

    /// Fetches the raw body of `url`.
    ///
    /// Forwards the `method` from `call` unchanged unless it is missing or
    /// falsy, in which case POST is used. The response status is not
    /// inspected.
    pub async fn download(&self, url: &str, call: Config) -> Result<Bytes, Error> {
        let method = call
            .method_value()
            .cloned()
            .unwrap_or_else(|| Value::from(Method::Post.as_str()));
        let response = self.dispatch(method, url, call).await?;
        Ok(extract_bytes(response))
    }

    /// The configuration a call with `method` and `call` sends to the
    /// transport.
    pub fn final_config(&self, method: impl Into<Value>, call: Config) -> Config {
        self.config.merged(&call.set(METHOD, method))
    }

    async fn dispatch(
        &self,
        method: Value,
        url: &str,
        call: Config,
    ) -> Result<HttpResponse, Error> {
        tracing::debug!(%method, url, "dispatching request");
        let config = self.final_config(method, call);
        let timeout = config.effective_timeout(self.default_timeout);
        tracing::trace!(url, timeout_ms = timeout.as_millis() as u64, "racing transport");

        let pending = self.transport.send(url, &config);
        race(url, pending, timeout, self.policy).await
    }
}
