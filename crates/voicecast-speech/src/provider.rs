use crate::{ProviderKind, SynthesisOutcome, SynthesisRequest};
use async_trait::async_trait;

/// Speech synthesis back end.
///
/// Each provider converts the unified parameters into its native scale, builds its own
/// request payload and decodes its own response. Every call is a single attempt; failures
/// are reported through [`SynthesisOutcome::Failure`] and never retried.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Name used in logs and error context
    fn provider_name(&self) -> &str;

    /// Whether [`crate::SynthesisMode::Playback`] requests can be served
    fn supports_playback(&self) -> bool {
        false
    }

    /// Synthesize the request's text
    ///
    /// # Arguments
    /// * `request` - Text or markup, unified parameters, credentials and output mode
    ///
    /// # Returns
    /// Audio bytes, a playback handle, or the specific failure
    async fn synthesize(&self, request: SynthesisRequest) -> SynthesisOutcome;
}
