//! Request configuration.
//!
//! # Design
//! One type serves as Client, Call and Final configuration: an open-ended
//! JSON object whose keys are handed to the transport as-is. A handful of
//! keys (`method`, `timeout`, `headers`, `query`, `body`) get typed builder
//! helpers, but any other key is allowed and passes through untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::merge::merge;

/// Timeout applied when neither client nor call configuration sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const METHOD: &str = "method";
pub const TIMEOUT: &str = "timeout";
pub const HEADERS: &str = "headers";
pub const QUERY: &str = "query";
pub const BODY: &str = "body";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with `overrides` deep-merged on top of `self`.
    pub fn merged(&self, overrides: &Config) -> Config {
        Config(merge(&self.0, &overrides.0))
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn method(self, method: impl Into<String>) -> Self {
        self.set(METHOD, method.into())
    }

    /// Stored in whole milliseconds, rounded up.
    pub fn timeout(self, timeout: Duration) -> Self {
        let partial = u128::from(timeout.subsec_nanos() % 1_000_000 != 0);
        let millis = u64::try_from(timeout.as_millis() + partial).unwrap_or(u64::MAX);
        self.set(TIMEOUT, millis)
    }

    pub fn body(self, body: impl Into<Value>) -> Self {
        self.set(BODY, body)
    }

    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_nested(HEADERS, name.into(), value.into())
    }

    pub fn query(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_nested(QUERY, name.into(), value.into())
    }

    fn insert_nested(mut self, section: &str, name: String, value: String) -> Self {
        let entry = self
            .0
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(name, Value::String(value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The `method` key, when it holds a non-empty string.
    pub fn method_name(&self) -> Option<&str> {
        self.0
            .get(METHOD)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    /// The `method` key unless it is missing or falsy (`null`, `false`, `0`,
    /// `""`). Non-string values are returned as they are.
    pub fn method_value(&self) -> Option<&Value> {
        self.0.get(METHOD).filter(|v| is_truthy(v))
    }

    /// The `timeout` key in whole milliseconds, when it holds a positive
    /// finite number. Fractions round up so a sub-millisecond timeout never
    /// becomes zero.
    pub fn timeout_ms(&self) -> Option<u64> {
        let value = self.0.get(TIMEOUT)?;
        if let Some(ms) = value.as_u64() {
            return (ms > 0).then_some(ms);
        }
        let ms = value.as_f64()?;
        if ms.is_finite() && ms > 0.0 {
            Some(ms.ceil() as u64)
        } else {
            None
        }
    }

    /// Explicit timeout if set, otherwise `fallback`.
    pub fn effective_timeout(&self, fallback: Duration) -> Duration {
        self.timeout_ms()
            .map(Duration::from_millis)
            .unwrap_or(fallback)
    }

    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.0.get(HEADERS).and_then(Value::as_object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Config(map)
    }
}

impl From<Config> for Value {
    fn from(config: Config) -> Self {
        Value::Object(config.0)
    }
}

impl TryFrom<Value> for Config {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Config(map)),
            Value::Null => Ok(Config::default()),
            other => Err(Error::InvalidConfig(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}
