use httpmock::prelude::*;
use rca_console::config::AppConfig;
use rca_console::core::{
    auth,
    error::ConsoleError,
    gateway::{Gateway, REFRESH_PATH},
    session::Session,
};
use reqwest::Method;
use serde_json::json;

fn gateway(server: &MockServer, token: Option<&str>) -> Gateway {
    let session = Session::default();
    if let Some(token) = token {
        session.set_token(token.to_string());
    }
    Gateway::with_client(reqwest::Client::new(), &server.base_url(), session)
}

#[tokio::test]
async fn expired_token_is_refreshed_and_retried_once() {
    let server = MockServer::start_async().await;
    let stale = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", "Bearer old");
            then.status(401);
        })
        .await;
    let fresh = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", "Bearer new");
            then.status(200).json_body(json!([]));
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200).json_body(json!({ "accessToken": "new" }));
        })
        .await;

    let gw = gateway(&server, Some("old"));
    let resp = gw
        .request(Method::GET, "/api/v1/incidents", None)
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    stale.assert_hits_async(1).await;
    fresh.assert_hits_async(1).await;
    refresh.assert_hits_async(1).await;
    assert_eq!(gw.session().token().as_deref(), Some("new"));
}

#[tokio::test]
async fn persistent_401_yields_unauthorized_after_two_attempts() {
    let server = MockServer::start_async().await;
    let incidents = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(401);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200).json_body(json!({ "accessToken": "new" }));
        })
        .await;

    let gw = gateway(&server, Some("old"));
    let err = gw
        .request(Method::GET, "/api/v1/incidents", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Unauthorized));
    incidents.assert_hits_async(2).await;
    assert!(!gw.session().is_authenticated());
}

#[tokio::test]
async fn failed_refresh_clears_session_without_retry() {
    let server = MockServer::start_async().await;
    let incidents = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(401);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(401);
        })
        .await;

    let gw = gateway(&server, Some("old"));
    let err = gw
        .request(Method::GET, "/api/v1/incidents", None)
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    incidents.assert_hits_async(1).await;
    assert!(gw.session().token().is_none());
}

#[tokio::test]
async fn non_401_errors_pass_through_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents");
            then.status(500);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200).json_body(json!({ "accessToken": "new" }));
        })
        .await;

    let gw = gateway(&server, Some("old"));
    let resp = gw
        .request(Method::GET, "/api/v1/incidents", None)
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    refresh.assert_hits_async(0).await;
    assert_eq!(gw.session().token().as_deref(), Some("old"));
}

#[tokio::test]
async fn refresh_without_token_in_body_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(REFRESH_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let gw = gateway(&server, Some("old"));
    assert!(!auth::refresh(&gw).await);
    assert!(!gw.session().is_authenticated());
}

#[tokio::test]
async fn login_stores_access_token() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(auth::LOGIN_PATH)
                .json_body(json!({ "id": "ops", "password": "secret" }));
            then.status(200)
                .json_body(json!({ "accessToken": "tok-1", "expiresIn": 900 }));
        })
        .await;

    let gw = gateway(&server, None);
    let resp = auth::login(&gw, "ops", "secret").await.unwrap();

    login.assert_hits_async(1).await;
    assert_eq!(resp.expires_in, 900);
    assert_eq!(gw.session().token().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn rejected_login_is_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(auth::LOGIN_PATH);
            then.status(401);
        })
        .await;

    let gw = gateway(&server, None);
    let err = auth::login(&gw, "ops", "wrong").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Unauthorized));
    assert!(!gw.session().is_authenticated());
}

#[tokio::test]
async fn rejected_registration_is_validation_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(auth::REGISTER_PATH);
            then.status(409).body("id taken");
        })
        .await;

    let gw = gateway(&server, None);
    let err = auth::register(&gw, "ops", "secret").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let server = MockServer::start_async().await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(auth::LOGOUT_PATH)
                .header("authorization", "Bearer tok-1");
            then.status(500);
        })
        .await;

    let gw = gateway(&server, Some("tok-1"));
    auth::logout(&gw).await;

    logout.assert_hits_async(1).await;
    assert!(!gw.session().is_authenticated());
}

#[tokio::test]
async fn auth_config_reads_signup_flag_and_defaults_on_failure() {
    let server = MockServer::start_async().await;
    let mut config = server
        .mock_async(|when, then| {
            when.method(GET).path(auth::CONFIG_PATH);
            then.status(200).json_body(json!({ "allowSignup": true }));
        })
        .await;

    let gw = gateway(&server, None);
    assert!(auth::fetch_auth_config(&gw).await.allow_signup);

    config.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(auth::CONFIG_PATH);
            then.status(503);
        })
        .await;
    assert!(!auth::fetch_auth_config(&gw).await.allow_signup);
}

#[tokio::test]
async fn refresh_cookie_from_login_is_sent_on_refresh() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(auth::LOGIN_PATH);
            then.status(200)
                .header("Set-Cookie", "refresh_token=r-1; Path=/; HttpOnly")
                .json_body(json!({ "accessToken": "old", "expiresIn": 900 }));
        })
        .await;
    let stale = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", "Bearer old");
            then.status(401);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(REFRESH_PATH)
                .cookie("refresh_token", "r-1");
            then.status(200).json_body(json!({ "accessToken": "new" }));
        })
        .await;
    let fresh = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", "Bearer new");
            then.status(200).json_body(json!([]));
        })
        .await;

    let cfg = AppConfig {
        base_url: server.base_url(),
        timeout_ms: 2000,
        ..AppConfig::default()
    };
    let gw = Gateway::new(&cfg, Session::default()).unwrap();
    auth::login(&gw, "ops", "secret").await.unwrap();

    let resp = gw
        .request(Method::GET, "/api/v1/incidents", None)
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    stale.assert_hits_async(1).await;
    refresh.assert_hits_async(1).await;
    fresh.assert_hits_async(1).await;
    assert_eq!(gw.session().token().as_deref(), Some("new"));
}
