use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{NotificationConfig, NotificationProvider};
use crate::notifications::{NotificationSender, ResendSender};

pub const TEST_FROM: &str = "MeetSync <reminders@meetsync.test>";
pub const TEST_API_KEY: &str = "re_test_key";

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("meetsync_backend=debug")
        .with_test_writer()
        .try_init();
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(http_method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(http_method)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// Resend mock server helpers

pub fn resend_sender(server: &MockServer) -> Arc<dyn NotificationSender> {
    let config = NotificationConfig {
        provider: NotificationProvider::Resend,
        api_url: server.uri(),
        api_key: TEST_API_KEY.to_string(),
        from: TEST_FROM.to_string(),
        timeout_secs: 2,
    };
    Arc::new(ResendSender::new(&config).unwrap())
}

pub async fn mount_resend_accepts(server: &MockServer, message_id: &str) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": message_id })))
        .mount(server)
        .await;
}

pub async fn mount_resend_rejects(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "statusCode": status,
            "name": "validation_error",
            "message": message,
        })))
        .mount(server)
        .await;
}
