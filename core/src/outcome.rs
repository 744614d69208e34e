//! Outcome pairs: failure as a returned value instead of an early exit.
//!
//! `to` awaits a fallible future and packs the result into an `Outcome`,
//! which holds exactly one of an error or a value. Only futures are
//! accepted; handing `to` a plain value does not compile.

use std::future::Future;

/// An `(error, value)` pair where exactly one side is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T, E> {
    error: Option<E>,
    value: Option<T>,
}

impl<T, E> Outcome<T, E> {
    pub fn success(value: T) -> Self {
        Self {
            error: None,
            value: Some(value),
        }
    }

    pub fn failure(error: E) -> Self {
        Self {
            error: Some(error),
            value: None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_pair(self) -> (Option<E>, Option<T>) {
        (self.error, self.value)
    }

    pub fn into_result(self) -> Result<T, E> {
        match (self.error, self.value) {
            (Some(error), _) => Err(error),
            (None, Some(value)) => Ok(value),
            (None, None) => unreachable!("outcome holds neither error nor value"),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::success(value),
            Err(error) => Outcome::failure(error),
        }
    }
}

/// Awaits `future` and reports how it settled.
pub async fn to<F, T, E>(future: F) -> Outcome<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    Outcome::from(future.await)
}
