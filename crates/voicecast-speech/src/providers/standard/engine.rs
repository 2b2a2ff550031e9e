//! Speech engine client, constructed per call from the request credentials

use super::config::StandardConfig;
use crate::error::{SynthesisError, SynthesisResult};
use crate::types::Credentials;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

const ENGINE_NAME: &str = "standard";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

fn engine_error(msg: impl Into<String>) -> SynthesisError {
    SynthesisError::EngineError(msg.into(), ENGINE_NAME.to_string())
}

/// Region-scoped engine that turns a markup document into WAV bytes
pub struct SpeechEngine {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    subscription_key: String,
    output_format: String,
}

impl SpeechEngine {
    /// Build an engine from a subscription key and region.
    ///
    /// Fails with an engine error when the credentials are malformed.
    pub fn new(credentials: &Credentials, config: &StandardConfig) -> SynthesisResult<Self> {
        let subscription_key = credentials.key.trim();
        if subscription_key.is_empty() {
            return Err(engine_error("Subscription key is empty"));
        }

        let region = credentials.secret.trim();
        if region.is_empty()
            || !region
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(engine_error(format!("Invalid region '{region}'")));
        }

        let url = config.endpoint_template.replace("{region}", region);
        let endpoint = reqwest::Url::parse(&url)
            .map_err(|e| engine_error(format!("Invalid engine endpoint '{url}': {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| engine_error(format!("Failed to build engine client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            subscription_key: subscription_key.to_string(),
            output_format: config.output_format.clone(),
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// Synthesize a markup document
    pub async fn speak_ssml(&self, ssml: &str) -> SynthesisResult<Vec<u8>> {
        log::debug!(
            "Standard engine request to {} ({} bytes of markup)",
            self.endpoint,
            ssml.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, &self.output_format)
            .header(USER_AGENT, "voicecast")
            .body(ssml.to_string())
            .send()
            .await
            .map_err(|e| SynthesisError::NetworkError(e.to_string(), ENGINE_NAME.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(engine_error(format!(
                "Synthesis failed with HTTP {status}: {body}"
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::NetworkError(e.to_string(), ENGINE_NAME.to_string()))?;
        if audio.is_empty() {
            return Err(engine_error("Synthesis returned no audio"));
        }
        Ok(audio.to_vec())
    }
}
