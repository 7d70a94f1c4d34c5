use async_trait::async_trait;
use hevy_gateway::{
    Result,
    gateway::{Transport, TransportResponse},
};
use std::sync::{Arc, Mutex};

/// A request captured by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Mock transport that records outbound calls and replies with a canned response
#[derive(Debug)]
pub struct MockTransport {
    pub response: TransportResponse,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_response(200, r#"{"workflow_run_id":"mock-run","status":"ok"}"#)
    }

    pub fn with_response(status: u16, body: &str) -> Self {
        Self {
            response: TransportResponse {
                status,
                body: body.to_string(),
            },
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: Vec<u8>,
    ) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            body,
        });
        Ok(self.response.clone())
    }
}
