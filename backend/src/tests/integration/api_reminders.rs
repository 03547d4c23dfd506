use axum::http::StatusCode;
use chrono::Duration;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::tests::helpers::*;
use crate::tests::{fixtures::*, TestContext};

#[tokio::test]
async fn test_preview_renders_next_meeting() {
    let ctx = TestContext::without_delivery();
    let client = ClientFixture::named("Sarah Johnson", "sarah@techcorp.test")
        .insert(&ctx.store)
        .await;
    MeetingFixture::new_for_client(client.id, test_now() + Duration::days(5))
        .titled("Quarterly Review")
        .insert(&ctx.store)
        .await;
    MeetingFixture::new_for_client(client.id, test_now() + Duration::days(2))
        .titled("Product Strategy Review")
        .insert(&ctx.store)
        .await;

    let uri = format!("/api/v1/clients/{}/reminder?{}", client.id, now_query());
    let response = ctx.app.clone().oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(
        payload["subject"],
        "Meeting Reminder: Product Strategy Review - 2 Days to Go!"
    );
    assert_eq!(payload["urgency_tier"], "soon");
    assert_eq!(payload["days_until"], 2);

    let body = payload["body"].as_str().unwrap();
    assert!(body.contains("Sarah Johnson"));
    assert!(!body.contains("Quarterly Review"));
}

#[tokio::test]
async fn test_preview_without_meetings_reports_no_upcoming_meeting() {
    let ctx = TestContext::without_delivery();
    let client = ClientFixture::default().insert(&ctx.store).await;
    MeetingFixture::new_for_client(client.id, test_now() - Duration::hours(2))
        .insert(&ctx.store)
        .await;

    let uri = format!("/api/v1/clients/{}/reminder?{}", client.id, now_query());
    let response = ctx.app.clone().oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "NO_UPCOMING_MEETING");
}

#[tokio::test]
async fn test_reminder_for_unknown_client_is_not_found() {
    let ctx = TestContext::without_delivery();

    let uri = format!("/api/v1/clients/{}/reminder", Uuid::new_v4());
    let response = ctx.app.clone().oneshot(empty_post(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_send_delivers_through_resend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(serde_json::json!({
            "from": TEST_FROM,
            "to": ["sarah@techcorp.test"],
            "subject": "Meeting Reminder: Kickoff - 1 Day to Go!",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "re_msg_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::new(resend_sender(&server));
    let client = ClientFixture::named("Sarah Johnson", "sarah@techcorp.test")
        .insert(&ctx.store)
        .await;
    MeetingFixture::new_for_client(client.id, test_now() + Duration::hours(20))
        .titled("Kickoff")
        .insert(&ctx.store)
        .await;

    let uri = format!("/api/v1/clients/{}/reminder?{}", client.id, now_query());
    let response = ctx.app.clone().oneshot(empty_post(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let delivery = read_json(response).await;
    assert_eq!(delivery["message_id"], "re_msg_1");
    assert_eq!(delivery["payload"]["urgency_tier"], "urgent");
}

#[tokio::test]
async fn test_provider_rejection_is_surfaced() {
    let server = MockServer::start().await;
    mount_resend_rejects(&server, 403, "The techcorp.test domain is not verified").await;

    let ctx = TestContext::new(resend_sender(&server));
    let client = ClientFixture::default().insert(&ctx.store).await;
    MeetingFixture::new_for_client(client.id, test_now() + Duration::days(7))
        .insert(&ctx.store)
        .await;

    let uri = format!("/api/v1/clients/{}/reminder?{}", client.id, now_query());
    let response = ctx.app.clone().oneshot(empty_post(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = read_json(response).await;
    assert_eq!(error["code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(error["message"], "The techcorp.test domain is not verified");
}
