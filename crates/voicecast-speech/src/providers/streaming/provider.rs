//! Streaming provider implementation
//!
//! Implements [`SynthesisProvider`] over the JSON/HTTP protocol in [`super::wire`].

use super::config::StreamingConfig;
use super::wire;
use crate::error::{SynthesisError, SynthesisResult};
use crate::{ProviderKind, SynthesisOutcome, SynthesisProvider, SynthesisRequest};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

const PROVIDER_NAME: &str = "streaming";

/// Byte-producing provider: one POST per call, base64 WAV in the response
pub struct StreamingProvider {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    config: StreamingConfig,
}

impl StreamingProvider {
    /// Create a new streaming provider
    pub fn new(config: StreamingConfig) -> SynthesisResult<Self> {
        let endpoint = reqwest::Url::parse(&config.endpoint).map_err(|e| {
            SynthesisError::ConfigurationError(format!(
                "invalid streaming endpoint '{}': {e}",
                config.endpoint
            ))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SynthesisError::ConfigurationError(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    async fn execute(&self, request: &SynthesisRequest) -> SynthesisResult<Vec<u8>> {
        let credentials = &request.credentials;
        if credentials.key.trim().is_empty() || credentials.secret.trim().is_empty() {
            return Err(SynthesisError::ConfigurationError(
                "streaming provider requires an application id and an access token".to_string(),
            ));
        }

        let body = wire::build_request(&self.config, request);
        let payload = serde_json::to_vec(&body).map_err(|e| {
            SynthesisError::SerializationError(e.to_string(), PROVIDER_NAME.to_string())
        })?;

        log::info!(
            "Streaming synthesis request {} ({} chars, text_type={}, voice={})",
            body.request.reqid,
            request.text.chars().count(),
            body.request.text_type,
            body.audio.voice_type
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer;{}", credentials.secret))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| SynthesisError::NetworkError(e.to_string(), PROVIDER_NAME.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::NetworkError(e.to_string(), PROVIDER_NAME.to_string()))?;
        if !status.is_success() {
            log::warn!(
                "Streaming request {} returned HTTP {status}",
                body.request.reqid
            );
        }

        let audio = wire::decode_response(&bytes)?;
        log::debug!(
            "Streaming request {} decoded {} audio bytes",
            body.request.reqid,
            audio.len()
        );
        Ok(audio)
    }
}

#[async_trait]
impl SynthesisProvider for StreamingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Streaming
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn synthesize(&self, request: SynthesisRequest) -> SynthesisOutcome {
        // Live playback is not offered; audio is always returned as bytes
        self.execute(&request).await.into()
    }
}
