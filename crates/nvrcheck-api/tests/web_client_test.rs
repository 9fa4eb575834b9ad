#![allow(clippy::unwrap_used)]
// Integration tests for `WebClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nvrcheck_api::{Error, SessionToken, WebClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WebClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WebClient::with_client(reqwest::Client::new(), base_url, "nvrcheck/6.2");
    (server, client)
}

fn api_path(suffix: &str) -> String {
    format!("/mt/api/rest/v1/{suffix}")
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("health")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    client.health().await.unwrap();
}

#[tokio::test]
async fn test_health_unavailable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("health")))
        .respond_with(ResponseTemplate::new(503).set_body_string("starting up"))
        .mount(&server)
        .await;

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, .. }), "got: {err:?}");
    assert!(err.is_transient());
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .and(body_partial_json(json!({
            "username": "administrator",
            "password": "s3cret",
            "clientName": "nvrcheck/6.2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "result": { "session": "tok-42" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "s3cret".to_string().into();
    let token = client.login("administrator", &secret).await.unwrap();
    assert_eq!(token.expose(), "tok-42");
}

#[tokio::test]
async fn test_login_rejected_by_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("administrator", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_rejected_by_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "invalid-credentials",
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let err = client.login("administrator", &secret).await.unwrap_err();

    match err {
        Error::Authentication { ref message } => {
            assert!(message.contains("Invalid username"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("logout")))
        .and(body_partial_json(json!({ "session": "tok-42" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    client.logout(&SessionToken::new("tok-42")).await.unwrap();
}

// ── Camera tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_cameras() {
    let (server, client) = setup().await;

    let envelope = json!({
        "status": "success",
        "result": {
            "cameras": [
                {
                    "id": "cam-a",
                    "name": "Lobby",
                    "connected": true,
                    "entities": [{ "logicalId": 7 }]
                },
                {
                    "id": "cam-b",
                    "connected": false,
                    "entities": [{ "logicalId": 12 }, { "logicalId": 13 }]
                }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path(api_path("cameras")))
        .and(query_param("session", "tok-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let cameras = client
        .list_cameras(&SessionToken::new("tok-42"))
        .await
        .unwrap();

    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].name.as_deref(), Some("Lobby"));
    assert!(cameras[0].connected);
    assert_eq!(cameras[0].entities[0].logical_id, Some(7));
    assert!(!cameras[1].connected);
    assert_eq!(cameras[1].entities.len(), 2);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("cameras")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "session-expired",
            "message": "Session expired"
        })))
        .mount(&server)
        .await;

    let err = client
        .list_cameras(&SessionToken::new("stale"))
        .await
        .unwrap_err();
    assert!(err.is_auth_failure(), "got: {err:?}");
}

#[tokio::test]
async fn test_api_error_code() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("cameras")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "server-busy",
            "message": "Try again later"
        })))
        .mount(&server)
        .await;

    let err = client
        .list_cameras(&SessionToken::new("tok-42"))
        .await
        .unwrap_err();
    assert_eq!(err.api_error_code(), Some("server-busy"));
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("cameras")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client
        .list_cameras(&SessionToken::new("tok-42"))
        .await
        .unwrap_err();
    match err {
        Error::Deserialization { ref body, .. } => assert!(body.contains("not json")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
