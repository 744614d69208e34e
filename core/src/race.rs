//! Timeout race between a transport call and a timer.
//!
//! The transport future runs on its own task and reports back over a oneshot
//! channel. Whichever of the channel and the timer is ready first decides
//! the outcome. With `TimeoutPolicy::Detach` the losing transport task keeps
//! running and whatever it eventually produces is dropped.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::error::Error;
use crate::http::HttpResponse;
use crate::transport::TransportFuture;

/// What happens to the transport task when the timer wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Leave the task running and discard its result.
    #[default]
    Detach,
    /// Abort the task.
    Cancel,
}

/// Runs `call` against a timer of length `timeout`.
///
/// A transport result that is ready at the same instant as the timer wins.
pub async fn race(
    url: &str,
    call: TransportFuture,
    timeout: Duration,
    policy: TimeoutPolicy,
) -> Result<HttpResponse, Error> {
    let (tx, rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        let result = call.await;
        if tx.send(result).is_err() {
            tracing::debug!("transport settled after the timeout fired; result discarded");
        }
    });

    tokio::select! {
        biased;

        settled = rx => match settled {
            Ok(result) => result.map_err(Error::Transport),
            // The sender only goes away unsent if the task panicked.
            Err(_) => match task.await {
                Err(join_err) => Err(Error::Transport(Box::new(join_err))),
                Ok(()) => Err(Error::Transport("transport task ended without a result".into())),
            },
        },
        () = tokio::time::sleep(timeout) => {
            tracing::debug!(url, timeout_ms = timeout.as_millis() as u64, "request timed out");
            if policy == TimeoutPolicy::Cancel {
                task.abort();
                tracing::debug!(url, "transport task cancelled");
            }
            Err(Error::timeout(url))
        }
    }
}
