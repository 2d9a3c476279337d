mod client;

pub use client::ReqwestTransport;

use anyhow::Result;

/// Concrete outbound probe produced by the request builder. Header keys are
/// unique; later inserts replace earlier ones case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ProbeRequest {
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            slot.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }
}

/// Minimal response surface the classifier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
}

/// Boundary to the host environment that actually dispatches requests.
/// Production uses [`ReqwestTransport`]; tests inject mocks.
pub trait HttpTransport {
    fn send(&self, request: &ProbeRequest) -> impl Future<Output = Result<ProbeResponse>> + Send;
}
