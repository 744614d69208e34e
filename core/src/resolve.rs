//! Turning a response into the caller's result.

use serde_json::Value;

use crate::error::Error;
use crate::http::HttpResponse;
use crate::outcome::to;

/// Decodes the body and classifies the response.
///
/// A body that fails to decode is an error whatever the status. A decoded
/// body is the success value for 2xx and the error payload otherwise.
pub async fn resolve(response: HttpResponse) -> Result<Value, Error> {
    let (err, body) = to(async { response.decode() }).await.into_pair();
    if let Some(err) = err {
        return Err(Error::Decode(err));
    }
    let body = body.unwrap_or(Value::Null);
    if response.ok() {
        Ok(body)
    } else {
        Err(Error::Response {
            status: response.status,
            body,
        })
    }
}

/// Raw body of a download. No decoding, no status check.
pub fn extract_bytes(response: HttpResponse) -> bytes::Bytes {
    response.into_bytes()
}
