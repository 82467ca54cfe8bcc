#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use directory_service::{
    build_router,
    config::{AuthConfig, AuthMode, DirectoryConfig, DirectorySource, RateLimitConfig, TokenConfig},
    models::ClientCredential,
    services::SigningAlgorithm,
    startup::build_state,
};
use serde_json::Value;
use service_core::config::ServerConfig;
use std::path::PathBuf;
use tower::util::ServiceExt;

pub const CLIENT_ID: &str = "client_id_1";
pub const CLIENT_SECRET: &str = "client_secret_1";

pub fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        server: ServerConfig::default(),
        service_name: "directory-service-test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        auth: AuthConfig {
            mode: AuthMode::Jwt,
            clients: vec![
                ClientCredential::new(CLIENT_ID, CLIENT_SECRET),
                ClientCredential::new("client_id_2", "client_secret_2"),
            ],
            token: TokenConfig {
                algorithm: SigningAlgorithm::Rs256,
                private_key_path: Some(testdata("keys/rsa_private.pem")),
                public_key_path: Some(testdata("keys/rsa_public.pem")),
                ttl_seconds: 7200,
                require_known_subject: true,
            },
        },
        directory: DirectorySource::File {
            departments: testdata("departments.json"),
            users: testdata("users.json"),
            groups: testdata("groups.json"),
            group_users: testdata("group-users.json"),
            strict: true,
        },
        rate_limit: RateLimitConfig::default(),
    }
}

pub async fn app_with(config: DirectoryConfig) -> Router {
    let state = build_state(config)
        .await
        .expect("Failed to build application state");
    build_router(state)
}

pub async fn test_app() -> Router {
    app_with(test_config()).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn token_request(client_id: &str, client_secret: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "client_id": client_id,
                "client_secret": client_secret,
            })
            .to_string(),
        ))
        .unwrap()
}

pub async fn fetch_token(app: &Router) -> String {
    let response = send(app, token_request(CLIENT_ID, CLIENT_SECRET)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

pub fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data missing")
        .iter()
        .map(|item| match item {
            Value::String(id) => id.clone(),
            other => other["id"].as_str().unwrap_or_default().to_string(),
        })
        .collect()
}
