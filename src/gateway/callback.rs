use super::signer::{canonical_json, sign_payload, signatures_match};
use crate::{Error, Result, models::WebhookResponse};
use tracing::warn;

/// Authenticates callbacks posted by the workflow system.
///
/// The signature covers the canonical serialization of the parsed payload,
/// so fields outside [`WebhookResponse`] are not part of the signed bytes.
/// An empty secret accepts every callback.
pub struct CallbackVerifier {
    secret: String,
}

impl CallbackVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.secret.is_empty()
    }

    pub fn verify(&self, payload: &WebhookResponse, signature: Option<&str>) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let body = canonical_json(payload)?;
        let expected = sign_payload(&self.secret, &body)?;
        if !signatures_match(&expected, signature.unwrap_or("")) {
            warn!(
                "Rejected callback for workflow run {}",
                payload.workflow_run_id
            );
            return Err(Error::unauthorized("Invalid signature"));
        }

        Ok(())
    }
}
