//! Standard provider implementation
//!
//! Implements [`SynthesisProvider`] for the region-scoped engine, in capture or playback mode

use super::config::StandardConfig;
use super::conversion::wrap_plain_text;
use super::engine::SpeechEngine;
use crate::error::{SynthesisError, SynthesisResult};
use crate::playback::AudioOutput;
use crate::{
    DocumentKind, ProviderKind, SynthesisMode, SynthesisOutcome, SynthesisProvider,
    SynthesisRequest,
};
use async_trait::async_trait;
use std::sync::Arc;

const PROVIDER_NAME: &str = "standard";

/// Standard provider
pub struct StandardProvider {
    config: StandardConfig,
    output: Option<Arc<dyn AudioOutput>>,
}

impl StandardProvider {
    /// Create a new standard provider. With the `playback` feature the system audio
    /// output is used for playback mode.
    pub fn new(config: StandardConfig) -> Self {
        Self {
            config,
            output: default_output(),
        }
    }

    /// Use a specific audio output for playback mode
    pub fn with_output(mut self, output: Arc<dyn AudioOutput>) -> Self {
        self.output = Some(output);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &StandardConfig {
        &self.config
    }

    /// Document sent to the engine: markup as-is, plain text wrapped with the parameters
    pub fn build_document(&self, request: &SynthesisRequest) -> String {
        match request.document {
            DocumentKind::Markup => request.text.clone(),
            DocumentKind::Plain => {
                wrap_plain_text(&request.text, &request.parameters, &self.config.language)
            }
        }
    }

    async fn execute(&self, request: &SynthesisRequest) -> SynthesisResult<SynthesisOutcome> {
        let engine = SpeechEngine::new(&request.credentials, &self.config)?;
        let document = self.build_document(request);

        log::info!(
            "Standard synthesis ({:?}, {:?}, voice={})",
            request.document,
            request.mode,
            request.parameters.voice_id()
        );

        match request.mode {
            SynthesisMode::Capture => {
                let audio = engine.speak_ssml(&document).await?;
                Ok(SynthesisOutcome::Bytes(audio))
            }
            SynthesisMode::Playback => {
                let output = self.output.as_ref().ok_or_else(|| {
                    SynthesisError::EngineError(
                        "No audio output available for playback".to_string(),
                        PROVIDER_NAME.to_string(),
                    )
                })?;
                let audio = engine.speak_ssml(&document).await?;
                Ok(SynthesisOutcome::Handle(output.play(audio)?))
            }
        }
    }
}

#[cfg(feature = "playback")]
fn default_output() -> Option<Arc<dyn AudioOutput>> {
    Some(Arc::new(crate::playback::RodioOutput))
}

#[cfg(not(feature = "playback"))]
fn default_output() -> Option<Arc<dyn AudioOutput>> {
    None
}

#[async_trait]
impl SynthesisProvider for StandardProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Standard
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supports_playback(&self) -> bool {
        self.output.is_some()
    }

    async fn synthesize(&self, request: SynthesisRequest) -> SynthesisOutcome {
        self.execute(&request)
            .await
            .unwrap_or_else(SynthesisOutcome::Failure)
    }
}
