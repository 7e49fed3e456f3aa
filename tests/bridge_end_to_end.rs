//! End-to-end tests over a real listener: open a stream, post to it, read
//! what the stream pushes back.

mod support;

use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;

use support::TestServer;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_ping_is_pushed_back_on_the_stream() {
    let server = TestServer::spawn().await;
    let (endpoint, mut events) = server.open_stream().await;
    assert!(endpoint.starts_with("/message?sessionid="));

    let (status, body) = server
        .post(&endpoint, r#"{"requestid":"1","method":"ping"}"#)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));

    assert_eq!(
        events.next_data(WAIT).await.as_deref(),
        Some("this is a ping request")
    );
}

#[tokio::test]
async fn test_every_method_gets_its_response_in_order() {
    let server = TestServer::spawn().await;
    let (endpoint, mut events) = server.open_stream().await;

    let requests = [
        r#"{"requestid":"1","method":"tools/list"}"#,
        r#"{"requestid":"2","method":"resources/list","params":{"cursor":null}}"#,
        r#"{"requestid":"3","method":"ping"}"#,
    ];
    let expected = [
        "this is a list tools request",
        "this is a list resources request",
        "this is a ping request",
    ];

    for (request, response) in requests.into_iter().zip(expected) {
        let (status, _) = server.post(&endpoint, request).await;
        assert_eq!(status, 200);
        assert_eq!(events.next_data(WAIT).await.as_deref(), Some(response));
    }
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = TestServer::spawn().await;

    let (status, body) = server
        .post(
            "/message?sessionid=doesnotexist",
            r#"{"requestid":"1","method":"ping"}"#,
        )
        .await;

    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "sessionid not found" }));
}

#[tokio::test]
async fn test_malformed_body_is_rejected_and_not_relayed() {
    let server = TestServer::spawn().await;
    let (endpoint, mut events) = server.open_stream().await;

    let (status, body) = server.post(&endpoint, "not json").await;
    assert_eq!(status, 400);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid JSON payload"));

    // The next frame on the stream belongs to the next valid request
    let (status, _) = server
        .post(&endpoint, r#"{"requestid":"2","method":"tools/list"}"#)
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        events.next_data(WAIT).await.as_deref(),
        Some("this is a list tools request")
    );
}

#[tokio::test]
async fn test_validation_errors() {
    let server = TestServer::spawn().await;
    let (endpoint, _events) = server.open_stream().await;

    let (status, body) = server.post(&endpoint, "").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "data is required" }));

    let (status, body) = server.post("/message?sessionid=doesnotexist", "").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "data is required" }));

    let (status, body) = server
        .post("/message", r#"{"requestid":"1","method":"ping"}"#)
        .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "sessionid is required" }));

    let (status, body) = server
        .post(&endpoint, r#"{"requestid":"1","method":"prompts/list"}"#)
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("prompts/list"));
}

#[tokio::test]
async fn test_closed_stream_session_is_not_found() {
    let server = TestServer::spawn().await;
    let (endpoint, events) = server.open_stream().await;
    assert_eq!(server.state.sessions.len(), 1);

    drop(events);

    // The server tears the session down once it notices the closed peer
    let mut torn_down = false;
    for _ in 0..100 {
        if server.state.sessions.is_empty() {
            torn_down = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(torn_down, "session was not deregistered after disconnect");

    let (status, body) = server
        .post(&endpoint, r#"{"requestid":"1","method":"ping"}"#)
        .await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "sessionid not found" }));
}

#[tokio::test]
async fn test_concurrent_streams_get_distinct_sessions() {
    let server = TestServer::spawn().await;

    let opened = futures::future::join_all((0..8).map(|_| server.open_stream())).await;
    let endpoints: HashSet<_> = opened.iter().map(|(endpoint, _)| endpoint.clone()).collect();

    assert_eq!(endpoints.len(), 8);
    assert_eq!(server.state.sessions.len(), 8);
}
