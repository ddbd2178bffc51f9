use std::time::Duration;

use cloudcast::server::{CallbackError, CallbackServer};
use reqwest::StatusCode;

#[tokio::test]
async fn test_waits_past_malformed_request_until_code_arrives() {
    let server = CallbackServer::bind("127.0.0.1:0", "/callback").await.unwrap();
    let addr = server.local_addr().unwrap();
    let waiting = tokio::spawn(server.wait_for_code(Some(Duration::from_secs(10))));

    let client = reqwest::Client::new();

    let missing = client
        .get(format!("http://{addr}/callback?state=x"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert!(missing.text().await.unwrap().contains("Missing code parameter."));

    let ok = client
        .get(format!("http://{addr}/callback?code=the-code"))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert!(ok.text().await.unwrap().contains("Authorization complete!"));

    let code = waiting.await.unwrap().unwrap();
    assert_eq!(code, "the-code");
}

#[tokio::test]
async fn test_path_without_leading_slash_is_normalized() {
    let server = CallbackServer::bind("127.0.0.1:0", "oauth").await.unwrap();
    let addr = server.local_addr().unwrap();
    let waiting = tokio::spawn(server.wait_for_code(Some(Duration::from_secs(10))));

    let res = reqwest::get(format!("http://{addr}/oauth?code=xyz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(waiting.await.unwrap().unwrap(), "xyz");
}

#[tokio::test]
async fn test_times_out_without_callback() {
    let server = CallbackServer::bind("127.0.0.1:0", "/callback").await.unwrap();

    let err = server
        .wait_for_code(Some(Duration::from_millis(200)))
        .await
        .unwrap_err();

    assert!(matches!(err, CallbackError::TimedOut(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let first = CallbackServer::bind("127.0.0.1:0", "/callback").await.unwrap();
    let addr = first.local_addr().unwrap();

    let err = CallbackServer::bind(addr, "/callback").await.err().unwrap();
    assert!(matches!(err, CallbackError::Bind(_)));
}
