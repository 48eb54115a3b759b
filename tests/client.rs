//! Requests through `Client` against mock backends.

use std::time::Duration;

use reqkit::{ClientError, USER_AGENT_CHROME};
use serde::Deserialize;

mod common;

#[tokio::test]
async fn test_common_headers_reach_the_server() {
    let addr = common::start_echo_backend().await;
    let mut client = common::test_client();
    client.common_header("X-Env", "prod").user_agent("reqkit-test/1.0");

    let resp = client
        .r()
        .get(format!("http://{addr}/echo"))
        .header("x-env", "override")
        .header("X-Request", "42")
        .send()
        .await
        .unwrap();
    let echoed = resp.text().to_ascii_lowercase();

    assert!(echoed.starts_with("get /echo http/1.1"));
    assert!(echoed.contains("x-env: override"));
    assert!(!echoed.contains("x-env: prod"));
    assert!(echoed.contains("user-agent: reqkit-test/1.0"));
    assert!(echoed.contains("x-request: 42"));
}

#[tokio::test]
async fn test_clone_sends_its_own_headers() {
    let addr = common::start_echo_backend().await;
    let mut source = common::test_client();
    source.common_header("X-Env", "prod");
    let mut copy = source.clone();
    copy.common_header("X-Env", "staging");

    let from_source = source.r().get(format!("http://{addr}/")).send().await.unwrap();
    let from_copy = copy.r().get(format!("http://{addr}/")).send().await.unwrap();

    assert!(from_source.text().to_ascii_lowercase().contains("x-env: prod"));
    assert!(from_copy.text().to_ascii_lowercase().contains("x-env: staging"));
}

#[derive(Debug, Deserialize)]
struct Item {
    id: u32,
    title: String,
}

#[tokio::test]
async fn test_json_request_and_response() {
    let addr = common::start_programmable_backend(|req| async move {
        let sent: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        let reply = serde_json::json!({"id": 7, "title": sent["title"]});
        let content_type = req.header("content-type").unwrap_or_default();
        assert_eq!(content_type, "application/json");
        (201, "application/json".to_string(), reply.to_string().into_bytes())
    })
    .await;
    let client = common::test_client();

    let resp = client
        .r()
        .post(format!("http://{addr}/items"))
        .json(&serde_json::json!({"title": "Buy milk"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let item: Item = resp.json().unwrap();
    assert_eq!(item.id, 7);
    assert_eq!(item.title, "Buy milk");
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let addr = common::start_programmable_backend(|_| async {
        (404, "text/plain".to_string(), b"missing".to_vec())
    })
    .await;
    let client = common::test_client();

    let resp = client.r().get(format!("http://{addr}/nope")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    assert!(!resp.is_success());
    assert_eq!(resp.text(), "missing");
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let addr = common::start_slow_backend(Duration::from_secs(2)).await;
    let mut client = common::test_client();
    client.timeout(Duration::from_millis(200));

    let err = client.r().get(format!("http://{addr}/")).send().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(200)),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_request_timeout_overrides_client() {
    let addr = common::start_slow_backend(Duration::from_millis(300)).await;
    let mut client = common::test_client();
    client.timeout(Duration::from_millis(50));

    let resp = client
        .r()
        .get(format!("http://{addr}/"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text(), "late");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = common::test_client();
    let err = client.r().get(format!("http://{addr}/")).send().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn test_invalid_url_is_reported() {
    let client = common::test_client();
    let err = client.r().get("not a url").send().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_auto_decode_uses_declared_charset() {
    let addr = common::start_programmable_backend(|_| async {
        (200, "text/plain; charset=iso-8859-1".to_string(), b"caf\xe9".to_vec())
    })
    .await;
    let mut client = common::test_client();

    let raw = client.r().get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(raw.bytes().as_ref(), b"caf\xe9");

    client.auto_decode_text_content();
    let decoded = client.r().get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(decoded.text(), "café");
}

#[tokio::test]
async fn test_test_mode_sends_browser_user_agent_and_discards() {
    let addr = common::start_echo_backend().await;
    let buffer = reqkit::DumpBuffer::new();
    let mut client = common::test_client();
    client.test_mode().dump_to(buffer.clone());

    let resp = client.r().get(format!("http://{addr}/")).send().await.unwrap();
    assert!(resp.is_discarded());
    let dump = buffer.to_string_lossy();
    assert!(dump.contains(USER_AGENT_CHROME));
}
