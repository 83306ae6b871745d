#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use escritorio_backend::{
    app,
    config::{AppConfig, AppState},
};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub fn router_for(server: &MockServer) -> Router {
    let config = AppConfig {
        api_base_url: server.uri(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_allow_origin: None,
    };
    app(AppState::new(config).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", "Bearer token-admin")
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("Authorization", "Bearer token-admin")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

pub async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
