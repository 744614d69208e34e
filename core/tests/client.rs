//! End-to-end client behavior against an in-memory transport.
//!
//! The transport records the URL and final configuration it receives and
//! answers with a canned result, standing in for the network.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use apiclient_core::{
    Client, Config, Error, HttpResponse, Method, Transport, TransportError, TransportFuture,
};
use serde_json::{json, Value};

type Calls = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone)]
enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
    After(Duration, HttpResponse),
}

struct FakeTransport {
    calls: Calls,
    reply: Reply,
}

impl Transport for FakeTransport {
    fn send(&self, url: &str, config: &Config) -> TransportFuture {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), Value::from(config.clone())));
        let reply = self.reply.clone();
        Box::pin(async move {
            match reply {
                Reply::Respond(resp) => Ok(resp),
                Reply::Fail(msg) => Err(TransportError::from(msg)),
                Reply::Hang => std::future::pending().await,
                Reply::After(delay, resp) => {
                    tokio::time::sleep(delay).await;
                    Ok(resp)
                }
            }
        })
    }
}

fn fake(reply: Reply) -> (FakeTransport, Calls) {
    let calls = Calls::default();
    let transport = FakeTransport {
        calls: Arc::clone(&calls),
        reply,
    };
    (transport, calls)
}

fn config(value: Value) -> Config {
    Config::try_from(value).unwrap()
}

fn json_client(reply: Reply) -> (Client<FakeTransport>, Calls) {
    let (transport, calls) = fake(reply);
    let client = Client::with_config(
        transport,
        config(json!({"headers": {"content-type": "application/json"}})),
    );
    (client, calls)
}

fn only_call(calls: &Calls) -> (String, Value) {
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1, "expected exactly one transport call");
    calls[0].clone()
}

// ---------------------------------------------------------------------------
// Configuration sent to the transport
// ---------------------------------------------------------------------------

#[tokio::test]
async fn post_sends_merged_configuration() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::json(200, &json!({}))));

    client
        .post("http:///url.com", config(json!({"body": {"data": "123"}})))
        .await
        .unwrap();

    let (url, sent) = only_call(&calls);
    assert_eq!(url, "http:///url.com");
    assert_eq!(
        sent,
        json!({
            "headers": {"content-type": "application/json"},
            "body": {"data": "123"},
            "method": "POST"
        })
    );
}

#[tokio::test]
async fn nested_call_headers_merge_with_client_headers() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::json(200, &json!({}))));

    client
        .post(
            "http:///url.com",
            config(json!({
                "query": {},
                "headers": {"user-agent": "agent"},
                "body": {"data": "123"}
            })),
        )
        .await
        .unwrap();

    let (_, sent) = only_call(&calls);
    assert_eq!(
        sent,
        json!({
            "query": {},
            "headers": {"user-agent": "agent", "content-type": "application/json"},
            "body": {"data": "123"},
            "method": "POST"
        })
    );
}

#[tokio::test]
async fn call_values_win_at_every_nested_key() {
    let (transport, calls) = fake(Reply::Respond(HttpResponse::json(200, &json!({}))));
    let client = Client::with_config(
        transport,
        config(json!({
            "header": {"content-type": "application/json", "user-agent": "agent"},
            "body": {"text": "abc"},
            "timeout": 5000
        })),
    );

    client
        .post(
            "url/",
            config(json!({
                "header": {"auth": "123"},
                "body": {"params": "123"},
                "timeout": 120000
            })),
        )
        .await
        .unwrap();

    let (_, sent) = only_call(&calls);
    assert_eq!(
        sent,
        json!({
            "header": {"content-type": "application/json", "user-agent": "agent", "auth": "123"},
            "body": {"text": "abc", "params": "123"},
            "timeout": 120000,
            "method": "POST"
        })
    );
}

#[tokio::test]
async fn client_configuration_is_not_mutated_by_calls() {
    let (client, _) = json_client(Reply::Respond(HttpResponse::json(200, &json!({}))));
    let before = client.config().clone();

    client
        .put("u", config(json!({"headers": {"x": "1"}, "body": [1, 2]})))
        .await
        .unwrap();
    client.download("u", Config::new().method("GET")).await.unwrap();

    assert_eq!(client.config(), &before);
}

#[tokio::test]
async fn verb_method_overrides_caller_supplied_method() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::json(200, &json!({}))));

    client
        .request(Method::Delete, "u", Config::new().method("GET"))
        .await
        .unwrap();

    let (_, sent) = only_call(&calls);
    assert_eq!(sent["method"], "DELETE");
}

#[tokio::test]
async fn download_posts_by_default() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::new(200, vec![])));

    client
        .download(
            "some/url",
            config(json!({"query": {}, "headers": {"user-agent": "124"}})),
        )
        .await
        .unwrap();

    let (_, sent) = only_call(&calls);
    assert_eq!(
        sent,
        json!({
            "query": {},
            "headers": {"user-agent": "124", "content-type": "application/json"},
            "method": "POST"
        })
    );
}

#[tokio::test]
async fn download_respects_explicit_method() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::new(200, vec![])));

    client
        .download(
            "some/url",
            config(json!({"query": {}, "headers": {"user-agent": "124"}, "method": "PUT"})),
        )
        .await
        .unwrap();

    let (_, sent) = only_call(&calls);
    assert_eq!(
        sent,
        json!({
            "query": {},
            "headers": {"user-agent": "124", "content-type": "application/json"},
            "method": "PUT"
        })
    );
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_resolves_with_decoded_body_on_success() {
    let body = json!({"data": {}});
    let (client, _) = json_client(Reply::Respond(HttpResponse::json(200, &body)));

    let result = client.get("some/url", Config::new()).await.unwrap();
    assert_eq!(result, body);
}

#[tokio::test]
async fn non_2xx_rejects_with_decoded_body() {
    let body = json!({"error": {}});
    let (client, _) = json_client(Reply::Respond(HttpResponse::json(400, &body)));

    let err = client
        .post("some/url", config(json!({"body": {}})))
        .await
        .unwrap_err();
    assert_eq!(err.body(), Some(&body));
}

#[tokio::test]
async fn undecodable_body_rejects_with_decode_error() {
    let (client, _) = json_client(Reply::Respond(HttpResponse::new(400, "some error")));

    let err = client.put("some/url", Config::new()).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn transport_failure_rejects_with_transport_error() {
    let (client, _) = json_client(Reply::Fail("some error".to_string()));

    let err = client.delete("some/url", Config::new()).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), "transport error: some error");
}

#[tokio::test]
async fn download_transport_failure_rejects() {
    let (client, _) = json_client(Reply::Fail("some error".to_string()));

    let err = client.download("some/url", Config::new()).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn download_resolves_with_exact_bytes() {
    let (client, _) = json_client(Reply::Respond(HttpResponse::new(200, vec![2u8, 6, 7])));

    let bytes = client.download("some/url", Config::new()).await.unwrap();
    assert_eq!(bytes.as_ref(), &[2u8, 6, 7]);
}

#[tokio::test]
async fn download_skips_decode_and_status_checks() {
    let (client, _) = json_client(Reply::Respond(HttpResponse::new(500, "not json")));

    let bytes = client.download("some/url", Config::new()).await.unwrap();
    assert_eq!(bytes.as_ref(), b"not json");
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn client_timeout_rejects_slow_transport() {
    let (transport, _) = fake(Reply::After(
        Duration::from_millis(500),
        HttpResponse::json(200, &json!({})),
    ));
    let client = Client::with_config(
        transport,
        config(json!({"timeout": 1, "headers": {"content-type": "application/json"}})),
    );

    let err = client.get("some/url", Config::new()).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Request to some/url timed out");
}

#[tokio::test(start_paused = true)]
async fn call_timeout_overrides_client_timeout() {
    let (transport, _) = fake(Reply::After(
        Duration::from_millis(50),
        HttpResponse::json(200, &json!({"ok": true})),
    ));
    let client = Client::with_config(transport, config(json!({"timeout": 1})));

    let result = client
        .get("u", Config::new().timeout(Duration::from_millis(200)))
        .await
        .unwrap();
    assert_eq!(result, json!({"ok": true}));
}

#[tokio::test(start_paused = true)]
async fn default_timeout_is_ten_seconds() {
    let (client, _) = json_client(Reply::Hang);
    let started = tokio::time::Instant::now();

    let err = client.get("hang", Config::new()).await.unwrap_err();

    assert!(err.is_timeout());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(10_000), "fired early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(10_050), "fired late: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn download_times_out_too() {
    let (transport, _) = fake(Reply::Hang);
    let client = Client::with_config(transport, config(json!({"timeout": 1})));

    let err = client.download("file", Config::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Request to file timed out");
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_calls_do_not_interfere() {
    let (client, calls) = json_client(Reply::Respond(HttpResponse::json(200, &json!({}))));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .post(&format!("u/{i}"), config(json!({"body": {"n": i}})))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 8);
    for (url, sent) in calls.iter() {
        let n: u64 = url.trim_start_matches("u/").parse().unwrap();
        assert_eq!(sent["body"]["n"], n);
        assert_eq!(sent["headers"]["content-type"], "application/json");
    }
}
