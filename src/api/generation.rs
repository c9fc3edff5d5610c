use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{RelayError, RelayResult};
use crate::models::generation::{GenerationRequest, GenerationResponse};

/// Upper bound for a single call to the generation endpoint.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the `/generate` route of the text generation endpoint. Built once per process
/// and shared by every invocation.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    client: Client,
    generate_url: String,
}

impl GenerationClient {
    pub fn new(endpoint: &str) -> RelayResult<Self> {
        Self::with_timeout(endpoint, GENERATION_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            generate_url: format!("{}/generate", endpoint),
        })
    }

    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }

    /// Sends one generation request. There is no retry; any failure is returned to the caller.
    #[tracing::instrument(level = "info", skip_all, fields(url = %self.generate_url))]
    pub async fn generate(&self, request: &GenerationRequest) -> RelayResult<GenerationResponse> {
        let response = self
            .client
            .post(&self.generate_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::http_status(status));
        }

        let body = response.text().await?;
        let generation: GenerationResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::UpstreamProtocol(e.to_string()))?;
        debug!(
            response_time = ?generation.response_time,
            "Generation endpoint answered"
        );

        Ok(generation)
    }
}
