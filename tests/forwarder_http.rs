use hevy_gateway::{
    Error,
    gateway::{Forwarder, ReqwestTransport, UPSTREAM_TIMEOUT, WebhookRoute, sign_payload},
    models::{Routine, RoutineRequest, UserContext},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

mod common;

use common::test_utils::webhook_config;

fn forwarder(url: &str, secret: &str, timeout: Duration) -> Forwarder {
    let transport = ReqwestTransport::with_timeout(timeout).unwrap();
    Forwarder::new(webhook_config(Some(url), secret, ""), Arc::new(transport))
}

fn routine_request() -> RoutineRequest {
    RoutineRequest {
        context: UserContext {
            user_id: "u1".to_string(),
            equipment: None,
            goals: Some("Fuerza y resistencia".to_string()),
            constraints: Some("rodilla izquierda".to_string()),
        },
        routine: Routine {
            day: "Lunes".to_string(),
            exercises: vec![
                json!({"name": "Sentadilla", "sets": 5})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ],
            notes: None,
        },
    }
}

#[test]
fn test_default_timeout_is_twenty_seconds() {
    assert_eq!(UPSTREAM_TIMEOUT, Duration::from_secs(20));
}

#[tokio::test]
async fn test_signature_matches_body_bytes() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/hevy/routines/new"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"workflow_run_id": "r1", "status": "ok"})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let fwd = forwarder(&upstream.uri(), "secret", Duration::from_secs(5));
    let response = fwd
        .forward(WebhookRoute::NewRoutine, &routine_request())
        .await
        .unwrap();
    assert_eq!(response.workflow_run_id, "r1");

    let received = upstream.received_requests().await.unwrap();
    let body = &received[0].body;
    let text = std::str::from_utf8(body).unwrap();
    assert!(text.contains("Fuerza y resistencia"));
    assert!(!text.contains("\\u"));

    let presented = received[0].headers.get("x-signature").unwrap().to_str().unwrap();
    assert_eq!(presented, sign_payload("secret", body).unwrap());
}

#[tokio::test]
async fn test_timeout_is_upstream_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"workflow_run_id": "r1", "status": "ok"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&upstream)
        .await;

    let fwd = forwarder(&upstream.uri(), "", Duration::from_millis(50));
    let err = fwd
        .forward(WebhookRoute::Recommendations, &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
    assert_eq!(err.detail(), "Workflow request timed out");
}

#[tokio::test]
async fn test_unreachable_upstream_is_upstream_error() {
    // Nothing listens on the discard port.
    let fwd = forwarder("http://127.0.0.1:9", "", Duration::from_secs(2));
    let err = fwd
        .forward(WebhookRoute::Recommendations, &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
}

#[tokio::test]
async fn test_client_error_status_passes_raw_text() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("webhook not registered"))
        .mount(&upstream)
        .await;

    let fwd = forwarder(&upstream.uri(), "", Duration::from_secs(5));
    let err = fwd
        .forward(WebhookRoute::UpdateRoutine, &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.detail(), "webhook not registered");
}
