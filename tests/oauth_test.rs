mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Form, Json, Router, http::StatusCode, routing::post};
use cloudcast::{
    config::OAuthSettings,
    mixcloud::auth::{CallbackTarget, OAuthError, OAuthFlow, callback_target},
    reporter::Level,
};
use common::{MemoryReporter, serve};
use serde_json::json;

fn settings(token_url: String) -> OAuthSettings {
    OAuthSettings {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:8080/callback".to_string(),
        auth_url: "https://www.mixcloud.com/oauth/authorize".to_string(),
        token_url,
        callback_address: None,
        callback_timeout: Some(Duration::from_secs(5)),
    }
}

fn flow(token_url: String) -> (OAuthFlow, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::default());
    let flow = OAuthFlow::new(settings(token_url), reqwest::Client::new(), reporter.clone());
    (flow, reporter)
}

#[test]
fn test_authorize_url_carries_client_and_redirect() {
    let (flow, _) = flow("http://unused/".to_string());
    let url = flow.authorize_url().unwrap();

    assert_eq!(url.host_str(), Some("www.mixcloud.com"));
    assert_eq!(url.path(), "/oauth/authorize");

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(params["client_id"], "client-id");
    assert_eq!(params["redirect_uri"], "http://localhost:8080/callback");
    assert_eq!(params["response_type"], "code");
}

#[test]
fn test_authorize_url_rejects_garbage() {
    let mut bad = settings("http://unused/".to_string());
    bad.auth_url = "not a url".to_string();
    let flow = OAuthFlow::new(bad, reqwest::Client::new(), Arc::new(MemoryReporter::default()));

    assert!(matches!(
        flow.authorize_url(),
        Err(OAuthError::InvalidAuthUrl { .. })
    ));
}

#[test]
fn test_callback_target_from_redirect_uri() {
    assert_eq!(
        callback_target("http://localhost:8080/callback").unwrap(),
        CallbackTarget {
            host: "localhost".to_string(),
            port: 8080,
            path: "/callback".to_string(),
        }
    );

    let default_port = callback_target("http://127.0.0.1/oauth/done").unwrap();
    assert_eq!(default_port.port, 80);
    assert_eq!(default_port.path, "/oauth/done");

    let ipv6 = callback_target("http://[::1]:9000/cb").unwrap();
    assert_eq!(ipv6.host, "::1");
    assert_eq!(ipv6.port, 9000);
}

#[test]
fn test_localhost_callback_binds_ipv4_loopback() {
    let localhost = callback_target("http://LocalHost:8080/callback").unwrap();
    assert_eq!(localhost.bind_host(), "127.0.0.1");

    let explicit = callback_target("http://192.168.1.20:8080/callback").unwrap();
    assert_eq!(explicit.bind_host(), "192.168.1.20");

    let ipv6 = callback_target("http://[::1]:9000/cb").unwrap();
    assert_eq!(ipv6.bind_host(), "::1");
}

#[test]
fn test_callback_target_rejects_invalid_uri() {
    assert!(matches!(
        callback_target("localhost:8080/callback"),
        Err(OAuthError::InvalidRedirectUri { .. })
    ));
}

#[tokio::test]
async fn test_exchange_posts_credentials_and_returns_token() {
    let router = Router::new().route(
        "/oauth/access_token",
        post(|Form(form): Form<HashMap<String, String>>| async move {
            let expected = [
                ("client_id", "client-id"),
                ("client_secret", "client-secret"),
                ("redirect_uri", "http://localhost:8080/callback"),
                ("code", "the-code"),
                ("grant_type", "authorization_code"),
            ];
            let matches = expected
                .iter()
                .all(|(k, v)| form.get(*k).map(String::as_str) == Some(*v));

            if matches {
                (StatusCode::OK, Json(json!({ "access_token": "fresh-token" })))
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad form" })))
            }
        }),
    );
    let addr = serve(router).await;

    let (flow, _) = flow(format!("http://{addr}/oauth/access_token"));
    let token = flow.exchange_code("the-code").await.unwrap();
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn test_exchange_non_200_is_reported() {
    let router = Router::new().route(
        "/token",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid client") }),
    );
    let addr = serve(router).await;

    let (flow, reporter) = flow(format!("http://{addr}/token"));
    let err = flow.exchange_code("the-code").await.unwrap_err();

    match err {
        OAuthError::Exchange { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid client");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        reporter.messages(Level::Error),
        vec!["Failed to get access_token: 401 invalid client".to_string()]
    );
}

#[tokio::test]
async fn test_exchange_without_access_token_fails() {
    let router = Router::new()
        .route("/missing", post(|| async { Json(json!({ "token_type": "bearer" })) }))
        .route("/empty", post(|| async { Json(json!({ "access_token": "" })) }));
    let addr = serve(router).await;

    let (missing, _) = flow(format!("http://{addr}/missing"));
    assert!(matches!(
        missing.exchange_code("c").await,
        Err(OAuthError::MissingAccessToken)
    ));

    let (empty, _) = flow(format!("http://{addr}/empty"));
    assert!(matches!(
        empty.exchange_code("c").await,
        Err(OAuthError::MissingAccessToken)
    ));
}
