use crate::error::{CbamError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory transport for tests: replays queued responses in order, falls
/// back to a default response when the queue is empty, and records every
/// request it receives.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    default_response: Option<HttpResponse>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(response: HttpResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Default::default()
        }
    }

    pub fn push_response(&self, response: HttpResponse) -> &Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.push_response(HttpResponse::json_body(status, &body))
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        queued
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                CbamError::config_error(format!(
                    "no mock response for url {}",
                    url
                ))
            })
    }
}
