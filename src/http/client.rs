use anyhow::{Context, Result};
use reqwest::{Client, Method};

use super::{HttpTransport, ProbeRequest, ProbeResponse};

/// Production transport. The per-probe deadline is enforced by the executor,
/// so the client itself carries no timeout.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(false)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .with_context(|| format!("Invalid HTTP method token: {}", request.method))?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        Ok(ProbeResponse {
            status: response.status().as_u16(),
        })
    }
}
