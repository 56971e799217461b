use crate::config::ReporterConfig;
use crate::domain::errors::TransportError;
use crate::domain::ports::{ReportRequest, ReportTransport};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Report transport over reqwest. One attempt per report, no retries.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        // Reports are hours apart and ask for `Connection: close`
        let mut builder = Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub fn from_config(config: &ReporterConfig) -> Self {
        Self::new(config.request_timeout())
    }
}

#[async_trait]
impl ReportTransport for HttpTransport {
    async fn post(&self, request: ReportRequest) -> Result<u16, TransportError> {
        let endpoint = request.endpoint.to_string();
        let mut builder = self.client.post(request.endpoint);
        for (name, value) in &request.headers {
            // Derived from the body by the client; setting it twice breaks framing
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            builder = builder.header(*name, value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| classify(e, &endpoint))?;

        let status = response.status().as_u16();
        debug!("HttpTransport: {} answered {}", endpoint, status);
        Ok(status)
    }
}

fn classify(error: reqwest::Error, endpoint: &str) -> TransportError {
    if error.is_builder() {
        TransportError::InvalidRequest {
            reason: error.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Connect {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        }
    } else {
        TransportError::Io {
            reason: error.to_string(),
        }
    }
}
