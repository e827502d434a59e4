//! In-memory [`HttpTransport`] for exercising service clients offline.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use map_common::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Replays queued responses in order and records every request it sees.
///
/// When the queue runs dry the transport answers with a
/// [`TransportError::Request`], so a test that issues an unexpected request
/// fails loudly instead of hanging.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    /// Queue a 200 response.
    pub fn respond_ok(self, body: &str) -> Self {
        self.respond(200, body)
    }

    /// Queue a transport-level failure.
    pub fn fail_with(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: Result<HttpResponse, TransportError>) {
        self.responses
            .lock()
            .expect("mock transport lock poisoned")
            .push_back(response);
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .expect("mock transport lock poisoned")
            .push(request.clone());

        self.responses
            .lock()
            .expect("mock transport lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: request.url.clone(),
                    message: "no mock response queued".to_string(),
                })
            })
    }
}
