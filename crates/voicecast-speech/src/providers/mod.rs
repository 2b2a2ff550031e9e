//! Speech provider implementations
//!
//! - `standard`: region-scoped native engine reached over its REST endpoint, with optional
//!   live playback
//! - `streaming`: JSON-over-HTTP service returning base64-encoded WAV

pub mod standard;
pub mod streaming;
