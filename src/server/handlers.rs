use super::types::HealthResponse;
use crate::{
    Error, Result,
    gateway::{CallbackVerifier, Forwarder, SIGNATURE_HEADER, WebhookRoute},
    models::{
        RecommendationRequest, RoutineRequest, RoutineUpdateRequest, Validate, WebhookResponse,
    },
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub verifier: Arc<CallbackVerifier>,
}

/// Turns a JSON extraction result into a validated body. Every rejection,
/// including malformed JSON, is reported as a validation error.
fn validated<T: Validate>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(value) = body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        Error::validation(rejection.body_text())
    })?;
    value.validate()?;
    Ok(value)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn recommend(
    State(state): State<AppState>,
    body: std::result::Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>> {
    let request = validated(body)?;
    info!(
        "Received recommendation request for user: {}",
        request.context.user_id
    );

    let response = state
        .forwarder
        .forward(WebhookRoute::Recommendations, &request)
        .await?;
    Ok(Json(response))
}

pub async fn create_routine(
    State(state): State<AppState>,
    body: std::result::Result<Json<RoutineRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>> {
    let request = validated(body)?;
    info!(
        "Received new routine request for user: {}",
        request.context.user_id
    );

    let response = state
        .forwarder
        .forward(WebhookRoute::NewRoutine, &request)
        .await?;
    Ok(Json(response))
}

pub async fn update_routine(
    State(state): State<AppState>,
    body: std::result::Result<Json<RoutineUpdateRequest>, JsonRejection>,
) -> Result<Json<WebhookResponse>> {
    let request = validated(body)?;
    info!(
        "Received update for routine {} from user: {}",
        request.routine_id, request.context.user_id
    );

    let response = state
        .forwarder
        .forward(WebhookRoute::UpdateRoutine, &request)
        .await?;
    Ok(Json(response))
}

pub async fn workflow_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<WebhookResponse>, JsonRejection>,
) -> Result<Json<WebhookResponse>> {
    let payload = validated(body)?;
    // A header that isn't valid UTF-8 can't match a hex digest.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|value| value.to_str().unwrap_or_default());

    state.verifier.verify(&payload, signature)?;
    info!(
        "Accepted callback for workflow run {} with status {}",
        payload.workflow_run_id, payload.status
    );

    Ok(Json(payload))
}
