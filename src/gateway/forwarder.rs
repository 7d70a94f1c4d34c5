use super::{
    signer::{SIGNATURE_HEADER, canonical_json, sign_payload},
    transport::Transport,
};
use crate::{Error, Result, config::WebhookConfig, models::WebhookResponse};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const INVALID_RESPONSE: &str = "Invalid response from workflow";

/// Upstream webhook paths, one per forwarding route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookRoute {
    Recommendations,
    NewRoutine,
    UpdateRoutine,
}

impl WebhookRoute {
    pub fn path(self) -> &'static str {
        match self {
            Self::Recommendations => "webhook/hevy/recommendations",
            Self::NewRoutine => "webhook/hevy/routines/new",
            Self::UpdateRoutine => "webhook/hevy/routines/update",
        }
    }
}

/// Joins base and path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub struct Forwarder {
    config: WebhookConfig,
    transport: Arc<dyn Transport>,
}

impl Forwarder {
    pub fn new(config: WebhookConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Signs and posts `payload` to the workflow system. One attempt, no retry.
    pub async fn forward<T: Serialize + ?Sized>(
        &self,
        route: WebhookRoute,
        payload: &T,
    ) -> Result<WebhookResponse> {
        let base = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| Error::config("Environment variable N8N_WEBHOOK_URL is required"))?;

        let body = canonical_json(payload)?;
        let mut headers = Vec::new();
        if !self.config.secret.is_empty() {
            headers.push((SIGNATURE_HEADER, sign_payload(&self.config.secret, &body)?));
        }

        let url = join_url(base, route.path());
        debug!("Forwarding {:?} request to {}", route, url);

        let response = self.transport.post(&url, &headers, body).await?;
        if response.status >= 400 {
            warn!(
                "Workflow returned status {} for {:?}",
                response.status, route
            );
            return Err(Error::upstream(response.body));
        }

        let data: serde_json::Value = serde_json::from_str(&response.body).map_err(|_| {
            warn!("Workflow returned a non-JSON body for {:?}", route);
            Error::upstream(INVALID_RESPONSE)
        })?;

        serde_json::from_value(data).map_err(|e| {
            warn!("Workflow response for {:?} has unexpected shape: {}", route, e);
            Error::upstream(response.body)
        })
    }
}
