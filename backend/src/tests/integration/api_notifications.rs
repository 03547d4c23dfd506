use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::MockServer;

use crate::notifications::{MockNotificationSender, SentEmail};
use crate::tests::helpers::*;
use crate::tests::TestContext;

#[tokio::test]
async fn test_send_requires_all_fields() {
    let ctx = TestContext::without_delivery();
    let body = json!({
        "clientEmail": "sarah@techcorp.test",
        "clientName": "Sarah Johnson",
        "emailSubject": "",
    });

    let response = ctx
        .app
        .clone()
        .oneshot(json_request("POST", "/api/v1/notifications/send", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["message"], "Missing required fields");
}

#[tokio::test]
async fn test_send_returns_message_id() {
    let mut sender = MockNotificationSender::new();
    sender
        .expect_send()
        .withf(|email| email.to == "sarah@techcorp.test" && email.subject == "Agenda for Friday")
        .times(1)
        .returning(|_| Ok(SentEmail { id: "msg_42".to_string() }));
    let ctx = TestContext::new(Arc::new(sender));

    let body = json!({
        "clientEmail": " sarah@techcorp.test ",
        "clientName": "Sarah Johnson",
        "emailSubject": "Agenda for Friday",
        "emailBody": "<p>See attached.</p>",
    });
    let response = ctx
        .app
        .clone()
        .oneshot(json_request("POST", "/api/v1/notifications/send", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = read_json(response).await;
    assert_eq!(sent["success"], true);
    assert_eq!(sent["messageId"], "msg_42");
    assert_eq!(sent["message"], "Email sent successfully");
}

#[tokio::test]
async fn test_send_through_resend_mock() {
    let server = MockServer::start().await;
    mount_resend_accepts(&server, "re_abc").await;
    let ctx = TestContext::new(resend_sender(&server));

    let body = json!({
        "clientEmail": "sarah@techcorp.test",
        "clientName": "Sarah Johnson",
        "emailSubject": "Hello",
        "emailBody": "<p>Hi</p>",
    });
    let response = ctx
        .app
        .clone()
        .oneshot(json_request("POST", "/api/v1/notifications/send", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["messageId"], "re_abc");
}

#[tokio::test]
async fn test_send_surfaces_provider_rejection() {
    let server = MockServer::start().await;
    mount_resend_rejects(&server, 422, "Invalid `to` field. The email address needs to follow the `email@example.com` format.").await;
    let ctx = TestContext::new(resend_sender(&server));

    let body = json!({
        "clientEmail": "sarah@techcorp",
        "clientName": "Sarah Johnson",
        "emailSubject": "Hello",
        "emailBody": "<p>Hi</p>",
    });
    let response = ctx
        .app
        .clone()
        .oneshot(json_request("POST", "/api/v1/notifications/send", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = read_json(response).await;
    assert_eq!(error["code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(
        error["message"],
        "Invalid `to` field. The email address needs to follow the `email@example.com` format."
    );
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::without_delivery();

    let response = ctx.app.clone().oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "healthy");
}
