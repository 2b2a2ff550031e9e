//! Orchestrates segmentation, markup assembly and provider dispatch.

use crate::error::{SynthesisError, SynthesisResult};
use crate::markup::{MarkupAssembler, MarkupDocument};
use crate::params::SynthesisParameters;
use crate::playback::PlaybackHandle;
use crate::provider::SynthesisProvider;
use crate::segmenter::DialogueSegmenter;
use crate::sink::{AudioSink, suggested_name};
use crate::types::{Credentials, DocumentKind, SynthesisMode, SynthesisOutcome, SynthesisRequest};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// How the input text should be treated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Plain text, wrapped by the provider with the given parameters
    Plain,
    /// Pre-authored markup carrying its own prosody
    Markup,
    /// Narrative text to be segmented into a multi-voice markup document
    Narrative,
}

/// A user-initiated synthesis
#[derive(Clone, Debug)]
pub struct SynthesisInput {
    pub text: String,
    pub source: InputSource,
    pub parameters: SynthesisParameters,
    pub mode: SynthesisMode,
}

impl SynthesisInput {
    pub fn new(text: impl Into<String>, source: InputSource, parameters: SynthesisParameters) -> Self {
        Self {
            text: text.into(),
            source,
            parameters,
            mode: SynthesisMode::Capture,
        }
    }

    pub fn plain(text: impl Into<String>, parameters: SynthesisParameters) -> Self {
        Self::new(text, InputSource::Plain, parameters)
    }

    pub fn markup(text: impl Into<String>, parameters: SynthesisParameters) -> Self {
        Self::new(text, InputSource::Markup, parameters)
    }

    pub fn narrative(text: impl Into<String>, parameters: SynthesisParameters) -> Self {
        Self::new(text, InputSource::Narrative, parameters)
    }

    pub fn with_mode(mut self, mode: SynthesisMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Entry point of the pipeline: text in, audio bytes or playback out.
///
/// Holds no per-call state besides the most recent playback handle; each call builds its
/// own request.
pub struct SynthesisCoordinator {
    provider: Arc<dyn SynthesisProvider>,
    segmenter: DialogueSegmenter,
    assembler: MarkupAssembler,
    credentials: Credentials,
    current: Mutex<Option<PlaybackHandle>>,
    stop: Notify,
    // Bumped by every stop(); a call that observes a change discards its result
    stops: AtomicU64,
}

impl SynthesisCoordinator {
    pub fn new(provider: Arc<dyn SynthesisProvider>, credentials: Credentials) -> Self {
        Self {
            provider,
            segmenter: DialogueSegmenter::default(),
            assembler: MarkupAssembler::default(),
            credentials,
            current: Mutex::new(None),
            stop: Notify::new(),
            stops: AtomicU64::new(0),
        }
    }

    pub fn with_segmenter(mut self, segmenter: DialogueSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_assembler(mut self, assembler: MarkupAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn provider(&self) -> &dyn SynthesisProvider {
        self.provider.as_ref()
    }

    pub fn segmenter(&self) -> &DialogueSegmenter {
        &self.segmenter
    }

    /// Segment narrative text and assemble it into a markup document
    pub fn build_markup(&self, text: &str) -> MarkupDocument {
        let segments = self.segmenter.segment(text);
        let document = self.assembler.assemble(&segments);
        log::info!(
            "Built markup document with {} voice blocks",
            document.block_count()
        );
        document
    }

    /// Turn an input into the provider request for this call
    pub fn prepare(&self, input: SynthesisInput) -> SynthesisRequest {
        let SynthesisInput {
            text,
            source,
            mut parameters,
            mode,
        } = input;

        let (text, document) = match source {
            InputSource::Plain => (text, DocumentKind::Plain),
            InputSource::Markup => (text, DocumentKind::Markup),
            InputSource::Narrative => (self.build_markup(&text).into_string(), DocumentKind::Markup),
        };
        if document.is_markup() {
            parameters.reset_for_preauthored_markup();
        }
        if mode == SynthesisMode::Playback && !self.provider.supports_playback() {
            log::debug!(
                "Provider {} does not play audio; result will be returned as bytes",
                self.provider.provider_name()
            );
        }

        SynthesisRequest {
            text,
            document,
            parameters,
            credentials: self.credentials.clone(),
            mode,
        }
    }

    /// Run one synthesis. [`Self::stop`] aborts it with [`SynthesisError::Cancelled`].
    ///
    /// A new playback handle replaces (and stops) the previous one; a failure leaves the
    /// previous playback untouched.
    ///
    /// A stop that lands while the provider is already returning still wins: the fresh
    /// playback is cancelled and the call reports [`SynthesisError::Cancelled`].
    pub async fn synthesize(&self, input: SynthesisInput) -> SynthesisOutcome {
        let request = self.prepare(input);
        let generation = self.stops.load(Ordering::SeqCst);
        let stopped = self.stop.notified();

        let outcome = tokio::select! {
            outcome = self.provider.synthesize(request) => outcome,
            _ = stopped => {
                log::info!("Synthesis cancelled by caller");
                return SynthesisOutcome::Failure(SynthesisError::Cancelled);
            }
        };

        match &outcome {
            SynthesisOutcome::Handle(handle) => {
                let mut slot = self.current_slot();
                // stop() bumps the counter before taking the slot, so checking under the
                // lock either sees the bump or leaves the handle for stop() to take
                if self.stops.load(Ordering::SeqCst) != generation {
                    drop(slot);
                    handle.cancel();
                    log::info!("Playback stopped as it started");
                    return SynthesisOutcome::Failure(SynthesisError::Cancelled);
                }
                if let Some(previous) = slot.replace(handle.clone()) {
                    previous.cancel();
                }
            }
            SynthesisOutcome::Bytes(_) if self.stops.load(Ordering::SeqCst) != generation => {
                log::info!("Synthesis cancelled by caller");
                return SynthesisOutcome::Failure(SynthesisError::Cancelled);
            }
            SynthesisOutcome::Failure(err) => {
                log::warn!(
                    "Synthesis via {} failed ({:?}): {err}",
                    self.provider.provider_name(),
                    err.kind()
                );
            }
            SynthesisOutcome::Bytes(audio) => {
                log::debug!("Synthesis produced {} bytes", audio.len());
            }
        }
        outcome
    }

    /// Synthesize and persist byte results through the sink.
    ///
    /// Returns the written path, or `None` when the outcome was live playback.
    pub async fn synthesize_to_sink(
        &self,
        input: SynthesisInput,
        sink: &dyn AudioSink,
    ) -> SynthesisResult<Option<PathBuf>> {
        let name = suggested_name(&input.parameters);
        match self.synthesize(input).await {
            SynthesisOutcome::Bytes(audio) => sink.persist(&audio, &name).map(Some),
            SynthesisOutcome::Handle(_) => Ok(None),
            SynthesisOutcome::Failure(err) => Err(err),
        }
    }

    /// Stop current playback and abort any in-flight synthesis. Safe to call at any time.
    pub fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.stop.notify_waiters();
        if let Some(handle) = self.current_slot().take() {
            handle.cancel();
        }
    }

    pub fn current_playback(&self) -> Option<PlaybackHandle> {
        self.current_slot().clone()
    }

    fn current_slot(&self) -> MutexGuard<'_, Option<PlaybackHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackControl;
    use crate::roles::{Role, RoleRegistry};
    use crate::types::ProviderKind;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;

    /// Records the last request and answers with fixed bytes
    #[derive(Default)]
    struct RecordingProvider {
        last: Mutex<Option<SynthesisRequest>>,
    }

    #[async_trait]
    impl SynthesisProvider for RecordingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Streaming
        }

        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn synthesize(&self, request: SynthesisRequest) -> SynthesisOutcome {
            *self.last.lock().unwrap() = Some(request);
            SynthesisOutcome::Bytes(vec![0; 4])
        }
    }

    fn coordinator(provider: Arc<RecordingProvider>) -> SynthesisCoordinator {
        let registry = RoleRegistry::new(vec![Role::new("张三", "V1", "张三")]).unwrap();
        SynthesisCoordinator::new(provider, Credentials::new("app", "token"))
            .with_segmenter(DialogueSegmenter::new(Arc::new(registry)))
    }

    fn params() -> SynthesisParameters {
        SynthesisParameters::new("V0", "chat")
            .with_rate(1.5)
            .with_volume(40.0)
            .with_style_intensity(1.8)
    }

    #[test]
    fn test_plain_input_keeps_parameters() {
        let c = coordinator(Arc::new(RecordingProvider::default()));
        let request = c.prepare(SynthesisInput::plain("你好", params()));
        assert_eq!(request.document, DocumentKind::Plain);
        assert_eq!(request.parameters, params());
        assert_eq!(request.credentials, Credentials::new("app", "token"));
    }

    #[test]
    fn test_markup_input_resets_parameters() {
        let c = coordinator(Arc::new(RecordingProvider::default()));
        let request = c.prepare(SynthesisInput::markup("<speak/>", params()));
        assert_eq!(request.document, DocumentKind::Markup);
        assert_eq!(request.text, "<speak/>");
        assert!(request.parameters.is_identity());
        assert_eq!(request.parameters.voice_id(), "V0");
    }

    #[test]
    fn test_narrative_input_becomes_markup() {
        let c = coordinator(Arc::new(RecordingProvider::default()));
        let request = c.prepare(SynthesisInput::narrative("张三：“你好”\n天黑了", params()));
        assert_eq!(request.document, DocumentKind::Markup);
        assert!(request.parameters.is_identity());
        assert_eq!(request.text.matches("<voice name=").count(), 3);
        assert!(request.text.contains(r#"<voice name="V1">"#));
    }

    #[tokio::test]
    async fn test_synthesize_dispatches_to_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let c = coordinator(Arc::clone(&provider));

        let outcome = c.synthesize(SynthesisInput::plain("你好", params())).await;
        assert!(matches!(outcome, SynthesisOutcome::Bytes(ref b) if b.len() == 4));

        let last = provider.last.lock().unwrap().take().unwrap();
        assert_eq!(last.text, "你好");
        assert!(c.current_playback().is_none());
    }

    #[tokio::test]
    async fn test_synthesize_to_sink_persists_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let sink = crate::sink::DirectorySink::new(dir.path());
        let c = coordinator(Arc::new(RecordingProvider::default()));

        let path = c
            .synthesize_to_sink(SynthesisInput::plain("你好", params()), &sink)
            .await
            .unwrap()
            .unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("V0_chat_"));
        assert_eq!(std::fs::read(path).unwrap(), vec![0; 4]);
    }

    struct Endless {
        finished: AtomicBool,
    }

    impl PlaybackControl for Endless {
        fn stop(&self) {
            self.finished.store(true, Ordering::SeqCst);
        }

        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::SeqCst)
        }
    }

    /// Starts a new playback on every call
    struct PlayingProvider;

    #[async_trait]
    impl SynthesisProvider for PlayingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Standard
        }

        fn provider_name(&self) -> &str {
            "playing"
        }

        fn supports_playback(&self) -> bool {
            true
        }

        async fn synthesize(&self, _request: SynthesisRequest) -> SynthesisOutcome {
            SynthesisOutcome::Handle(PlaybackHandle::new(Endless {
                finished: AtomicBool::new(false),
            }))
        }
    }

    /// Never answers until cancelled
    #[derive(Default)]
    struct HangingProvider {
        started: Notify,
    }

    #[async_trait]
    impl SynthesisProvider for HangingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Streaming
        }

        fn provider_name(&self) -> &str {
            "hanging"
        }

        async fn synthesize(&self, _request: SynthesisRequest) -> SynthesisOutcome {
            self.started.notify_one();
            std::future::pending::<SynthesisOutcome>().await
        }
    }

    /// Always fails with an engine error
    struct FailingProvider;

    #[async_trait]
    impl SynthesisProvider for FailingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Standard
        }

        fn provider_name(&self) -> &str {
            "failing"
        }

        async fn synthesize(&self, _request: SynthesisRequest) -> SynthesisOutcome {
            SynthesisOutcome::Failure(SynthesisError::EngineError(
                "boom".to_string(),
                "failing".to_string(),
            ))
        }
    }

    fn playback_input() -> SynthesisInput {
        SynthesisInput::plain("你好", params()).with_mode(SynthesisMode::Playback)
    }

    #[tokio::test]
    async fn test_new_playback_replaces_previous() {
        let c = SynthesisCoordinator::new(Arc::new(PlayingProvider), Credentials::default());

        let first = match c.synthesize(playback_input()).await {
            SynthesisOutcome::Handle(h) => h,
            other => panic!("expected handle, got {other:?}"),
        };
        assert!(first.is_playing());

        let second = match c.synthesize(playback_input()).await {
            SynthesisOutcome::Handle(h) => h,
            other => panic!("expected handle, got {other:?}"),
        };
        assert!(first.is_cancelled());
        assert!(!first.is_playing());
        assert!(second.is_playing());

        c.stop();
        assert!(second.is_cancelled());
        assert!(c.current_playback().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_current_playback() {
        let playing = SynthesisCoordinator::new(Arc::new(PlayingProvider), Credentials::default());
        let handle = match playing.synthesize(playback_input()).await {
            SynthesisOutcome::Handle(h) => h,
            other => panic!("expected handle, got {other:?}"),
        };

        // Same slot, failing provider
        let failing = SynthesisCoordinator {
            provider: Arc::new(FailingProvider),
            ..playing
        };
        let outcome = failing.synthesize(playback_input()).await;
        assert_eq!(outcome.error_kind(), Some(crate::error::ErrorKind::Engine));
        assert!(handle.is_playing());
        assert!(failing.current_playback().is_some());
    }

    #[tokio::test]
    async fn test_stop_cancels_in_flight_synthesis() {
        let provider = Arc::new(HangingProvider::default());
        let c = Arc::new(SynthesisCoordinator::new(
            Arc::clone(&provider) as Arc<dyn SynthesisProvider>,
            Credentials::default(),
        ));

        let task = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.synthesize(SynthesisInput::plain("你好", params())).await })
        };
        provider.started.notified().await;
        c.stop();

        let outcome = task.await.unwrap();
        assert_eq!(outcome.error_kind(), Some(crate::error::ErrorKind::Cancelled));
    }

    /// Calls stop() on its coordinator while producing a playback handle
    #[derive(Default)]
    struct StopDuringStartProvider {
        coordinator: std::sync::OnceLock<std::sync::Weak<SynthesisCoordinator>>,
        started: Mutex<Option<PlaybackHandle>>,
    }

    #[async_trait]
    impl SynthesisProvider for StopDuringStartProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Standard
        }

        fn provider_name(&self) -> &str {
            "stop-during-start"
        }

        fn supports_playback(&self) -> bool {
            true
        }

        async fn synthesize(&self, _request: SynthesisRequest) -> SynthesisOutcome {
            if let Some(coordinator) = self.coordinator.get().and_then(|c| c.upgrade()) {
                coordinator.stop();
            }
            let handle = PlaybackHandle::new(Endless {
                finished: AtomicBool::new(false),
            });
            *self.started.lock().unwrap() = Some(handle.clone());
            SynthesisOutcome::Handle(handle)
        }
    }

    #[tokio::test]
    async fn test_stop_racing_playback_start_stops_playback() {
        let provider = Arc::new(StopDuringStartProvider::default());
        let c = Arc::new(SynthesisCoordinator::new(
            Arc::clone(&provider) as Arc<dyn SynthesisProvider>,
            Credentials::default(),
        ));
        provider.coordinator.set(Arc::downgrade(&c)).unwrap();

        let outcome = c.synthesize(playback_input()).await;
        assert_eq!(outcome.error_kind(), Some(crate::error::ErrorKind::Cancelled));
        assert!(c.current_playback().is_none());

        let started = provider.started.lock().unwrap().take().unwrap();
        assert!(started.is_cancelled());
        assert!(!started.is_playing());
    }

    #[tokio::test]
    async fn test_synthesis_after_stop_is_not_cancelled() {
        let c = SynthesisCoordinator::new(Arc::new(PlayingProvider), Credentials::default());
        c.stop();
        let outcome = c.synthesize(playback_input()).await;
        assert!(matches!(outcome, SynthesisOutcome::Handle(ref h) if h.is_playing()));
    }

    #[test]
    fn test_stop_without_activity_is_noop() {
        let c = coordinator(Arc::new(RecordingProvider::default()));
        c.stop();
        c.stop();
        assert!(c.current_playback().is_none());
    }
}
