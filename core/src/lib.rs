//! Asynchronous per-verb API client over a pluggable transport.
//!
//! # Overview
//! `Client` exposes `get`, `post`, `put`, `delete`, `patch`, `head`,
//! `options` and `download`. Each call deep-merges its configuration over
//! the client's defaults, races the transport against a timeout, and turns
//! the response into either the decoded body or an `Error`.
//!
//! # Design
//! - The core performs no I/O. A `Transport` executes the request and hands
//!   back an `HttpResponse` as plain data.
//! - Configuration is an open JSON object; only `method` and `timeout` are
//!   interpreted, every key is forwarded to the transport.
//! - A timed-out transport call is detached by default, not cancelled.
//!   `ClientBuilder::cancel_on_timeout` opts into aborting it.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod merge;
pub mod outcome;
pub mod race;
pub mod resolve;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use config::{Config, DEFAULT_TIMEOUT};
pub use error::{Error, Result, TransportError};
pub use http::{HttpResponse, Method, UnknownMethod};
pub use merge::merge;
pub use outcome::{to, Outcome};
pub use race::{race, TimeoutPolicy};
pub use resolve::resolve;
pub use transport::{FnTransport, Transport, TransportFuture};
