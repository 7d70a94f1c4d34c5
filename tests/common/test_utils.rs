use axum::{Router, body::Body, http::Request, response::Response};
use hevy_gateway::{
    config::WebhookConfig,
    gateway::{CallbackVerifier, Forwarder, ReqwestTransport, Transport},
    server::{self, AppState},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

/// Create a webhook configuration for tests
pub fn webhook_config(url: Option<&str>, secret: &str, callback_secret: &str) -> WebhookConfig {
    WebhookConfig {
        url: url.map(str::to_string),
        secret: secret.to_string(),
        callback_secret: callback_secret.to_string(),
    }
}

/// Build the full router on top of an injected transport
pub fn app_with_transport(config: WebhookConfig, transport: Arc<dyn Transport>) -> Router {
    let state = AppState {
        verifier: Arc::new(CallbackVerifier::new(config.callback_secret.clone())),
        forwarder: Arc::new(Forwarder::new(config, transport)),
    };
    server::router(state)
}

/// Build the full router talking to a real upstream (usually a wiremock server)
pub fn app_for_upstream(config: WebhookConfig) -> Router {
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
    app_with_transport(config, Arc::new(transport))
}

/// JSON POST request to the gateway
pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body as JSON
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
