//! Mock port adapters for integration tests.
//!
//! Records every fetch and restart request so tests can assert on the full
//! interaction history without touching the network or the reset line.

use std::collections::HashMap;

use ledlink::app::ports::{FetchError, FetchPort, FetchResponse, RestartPort};

// ── Fetch mock ────────────────────────────────────────────────

pub struct MockFetch {
    responses: HashMap<String, FetchResponse>,
    pub calls: Vec<String>,
    pub offline: bool,
}

#[allow(dead_code)]
impl MockFetch {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Vec::new(),
            offline: false,
        }
    }

    pub fn serve(mut self, url: &str, status: u16, body: &[u8]) -> Self {
        self.responses.insert(
            url.to_owned(),
            FetchResponse {
                status,
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }
}

impl FetchPort for MockFetch {
    fn fetch(&mut self, url: &str) -> Result<FetchResponse, FetchError> {
        self.calls.push(url.to_owned());
        if self.offline {
            return Err(FetchError::Timeout);
        }
        match self.responses.get(url) {
            Some(response) => Ok(response.clone()),
            None => Ok(FetchResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

// ── Restart mock ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockRestart {
    pub requests: u32,
}

impl MockRestart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RestartPort for MockRestart {
    fn request_restart(&mut self) {
        self.requests += 1;
    }
}
