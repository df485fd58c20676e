//! Mock transport for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::sources::SourceError;
use crate::utils::Transport;

/// A transport that serves canned bodies by exact URL and records every request.
///
/// Unknown URLs fail with [`SourceError::Api`], like a 404 would.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a new mock transport with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn set_response(&self, url: impl Into<String>, body: impl Into<String>) {
        let mut guard = self.responses.lock().unwrap();
        guard.insert(url.into(), body.into());
    }

    /// URLs fetched so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        self.requests.lock().unwrap().push(url.to_string());

        let guard = self.responses.lock().unwrap();
        guard
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::Api(format!("{} returned status: 404 Not Found", url)))
    }
}
