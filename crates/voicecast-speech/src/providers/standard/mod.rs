//! Standard provider for the Voicecast speech pipeline
//!
//! Builds an engine from a subscription key and region on every call, wraps plain text
//! in a single-voice document (pre-authored markup is sent unmodified) and returns either
//! the captured WAV bytes or a handle to live playback.
//!
//! # Examples
//!
//! ```no_run
//! use voicecast_speech::providers::standard::{StandardConfig, StandardProvider};
//! use voicecast_speech::{
//!     Credentials, DocumentKind, SynthesisMode, SynthesisParameters, SynthesisProvider,
//!     SynthesisRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = StandardProvider::new(StandardConfig::default());
//!
//!     let request = SynthesisRequest {
//!         text: "近日养伤，深感人生之艰难。".to_string(),
//!         document: DocumentKind::Plain,
//!         parameters: SynthesisParameters::new("zh-CN-YunxiNeural", "sad").with_rate(0.8),
//!         credentials: Credentials::new("subscription-key", "eastasia"),
//!         mode: SynthesisMode::Capture,
//!     };
//!
//!     let outcome = provider.synthesize(request).await;
//!     println!("failed: {}", outcome.is_failure());
//! }
//! ```

pub mod config;
pub mod conversion;
pub mod engine;

mod provider;

// Re-exports
pub use config::StandardConfig;
pub use engine::SpeechEngine;
pub use provider::StandardProvider;
