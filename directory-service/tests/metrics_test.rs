mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{fetch_token, get, send, test_app, token_request};
use directory_service::services::metrics;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

#[tokio::test]
async fn metrics_endpoint_exposes_service_counters() {
    tokio_test::assert_ok!(metrics::init_metrics());
    let app = test_app().await;

    let token = fetch_token(&app).await;
    send(&app, token_request("client_id_1", "wrong")).await;
    send(&app, get("/v1/depts", Some(&token))).await;
    send(&app, get("/v1/depts", None)).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("tokens_issued_total"), "{text}");
    assert!(text.contains("directory_queries_total{query=\"list_departments\"}"), "{text}");
    assert!(text.contains("token_rejections_total{reason=\"missing\"}"), "{text}");
    assert!(text.contains("http_requests_total"), "{text}");
}
