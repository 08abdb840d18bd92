//! HTTP verdict oracle.
//!
//! `POST {endpoint}` with a JSON [`VerdictRequest`]; expects
//! `{"verdict": "<text>"}` back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::generator::{GeneratorError, VerdictGenerator, VerdictRequest};

#[derive(Debug, Clone)]
pub struct HttpVerdictGeneratorConfig {
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
}

impl HttpVerdictGeneratorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct VerdictResponse {
    verdict: String,
}

pub struct HttpVerdictGenerator {
    config: HttpVerdictGeneratorConfig,
    client: Client,
}

impl HttpVerdictGenerator {
    pub fn new(config: HttpVerdictGeneratorConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GeneratorError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl VerdictGenerator for HttpVerdictGenerator {
    async fn generate(&self, request: &VerdictRequest) -> Result<String, GeneratorError> {
        let mut builder = self.client.post(&self.config.endpoint).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GeneratorError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Unavailable(format!(
                "oracle responded with {status}: {body}"
            )));
        }

        let body: VerdictResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        Ok(body.verdict)
    }
}
