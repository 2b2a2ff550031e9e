//! Streaming provider: JSON request, base64 WAV response
//!
//! # Examples
//!
//! ```no_run
//! use voicecast_speech::providers::streaming::{StreamingConfig, StreamingProvider};
//! use voicecast_speech::{
//!     Credentials, DocumentKind, SynthesisMode, SynthesisOutcome, SynthesisParameters,
//!     SynthesisProvider, SynthesisRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = StreamingProvider::new(StreamingConfig::default())?;
//!
//!     let request = SynthesisRequest {
//!         text: "你好".to_string(),
//!         document: DocumentKind::Plain,
//!         parameters: SynthesisParameters::new("BV701_V2_streaming", "").with_volume(50.0),
//!         credentials: Credentials::new("appid", "access-token"),
//!         mode: SynthesisMode::Capture,
//!     };
//!
//!     if let SynthesisOutcome::Bytes(wav) = provider.synthesize(request).await {
//!         std::fs::write("out.wav", wav)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod wire;

mod provider;

// Re-exports
pub use config::StreamingConfig;
pub use provider::StreamingProvider;
