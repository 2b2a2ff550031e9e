//! # Voicecast Speech
//!
//! Dialogue-aware speech synthesis pipeline.
//!
//! Narrative text is split into per-character segments, assembled into a multi-voice
//! markup document and dispatched to one of two interchangeable synthesis providers.
//!
//! ## Features
//!
//! - **Dialogue Segmentation**: Attribute quoted and colon-introduced speech to known roles
//! - **Markup Assembly**: Build `<speak>` documents with per-segment voice, bookmark and pause
//! - **Unified Parameters**: One rate/volume/intensity scale, normalized per provider
//! - **Provider Abstraction**: Standard (region-scoped engine) and streaming (JSON over HTTP)
//! - **Playback or Capture**: Live playback handles or raw WAV bytes persisted through a sink
//!
//! ## Architecture
//!
//! - `RoleRegistry`: Ordered role catalog (built-in or TOML)
//! - `DialogueSegmenter`: Narrative text to `Segment`s
//! - `MarkupAssembler`: `Segment`s to a `MarkupDocument`
//! - `SynthesisProvider`: Trait implemented by the providers in the `providers` module
//! - `SynthesisCoordinator`: Chooses the path for each input, dispatches and tracks playback
//!
//! ## Providers
//!
//! - `standard`: subscription key and region, playback (with the `playback` feature) or capture
//! - `streaming`: application id and token, capture only
//!
//! ## Example
//!
//! ```rust
//! use voicecast_speech::{DialogueSegmenter, MarkupAssembler};
//!
//! let segmenter = DialogueSegmenter::default();
//! let segments = segmenter.segment("玄德：“二弟何在？”\n夜深了。");
//! let document = MarkupAssembler::default().assemble(&segments);
//!
//! assert!(document.as_str().starts_with("<speak"));
//! assert_eq!(document.block_count(), segments.len());
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod markup;
pub mod params;
pub mod playback;
mod provider;
pub mod roles;
pub mod segmenter;
pub mod sink;
pub mod types;

// Provider implementations
pub mod providers;

// Re-export main pipeline types
pub use config::PipelineConfig;
pub use coordinator::{InputSource, SynthesisCoordinator, SynthesisInput};
pub use error::{ErrorKind, SynthesisError, SynthesisResult};
pub use markup::{MarkupAssembler, MarkupDocument};
pub use params::{StandardProsody, StreamingProsody, SynthesisParameters};
pub use playback::{AudioOutput, PlaybackControl, PlaybackHandle};
pub use provider::SynthesisProvider;
pub use roles::{MatchPolicy, Role, RoleRegistry};
pub use segmenter::{DialogueMarkers, DialogueSegmenter};
pub use sink::{AudioSink, DirectorySink};
pub use types::{
    Credentials, DocumentKind, Emphasis, ProviderKind, Segment, SynthesisMode, SynthesisOutcome,
    SynthesisRequest,
};

#[cfg(feature = "playback")]
pub use playback::RodioOutput;
