use crate::error::{ErrorKind, SynthesisError, SynthesisResult};
use crate::params::SynthesisParameters;
use crate::playback::PlaybackHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emphasis applied to a segment's text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    None,
    Strong,
}

/// One attributed unit of speech
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub voice_id: String,
    pub bookmark: String,
    pub text: String,
    /// Pause after the text, in milliseconds (0 = none)
    pub trailing_pause_ms: u32,
    pub emphasis: Emphasis,
}

impl Segment {
    pub fn new(
        voice_id: impl Into<String>,
        bookmark: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            voice_id: voice_id.into(),
            bookmark: bookmark.into(),
            text: text.into(),
            trailing_pause_ms: 0,
            emphasis: Emphasis::None,
        }
    }

    pub fn with_pause(mut self, pause_ms: u32) -> Self {
        self.trailing_pause_ms = pause_ms;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }
}

/// Speech synthesis back end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Native engine: subscription key + region, playback or byte capture
    #[default]
    Standard,
    /// JSON-over-HTTP service returning base64 audio
    Streaming,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Standard => write!(f, "standard"),
            ProviderKind::Streaming => write!(f, "streaming"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "microsoft" => Ok(ProviderKind::Standard),
            "streaming" | "bytedance" => Ok(ProviderKind::Streaming),
            other => Err(SynthesisError::ConfigurationError(format!(
                "unknown provider '{other}', expected 'standard' or 'streaming'"
            ))),
        }
    }
}

/// Whether the text is plain or already synthesis markup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Plain,
    Markup,
}

impl DocumentKind {
    pub fn is_markup(self) -> bool {
        matches!(self, DocumentKind::Markup)
    }
}

/// Live playback through the engine's audio output, or byte capture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SynthesisMode {
    Playback,
    #[default]
    Capture,
}

/// Two opaque credential strings.
///
/// The standard provider reads them as subscription key and region; the streaming
/// provider as application id and access token.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

// Never print credential values
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &if self.key.is_empty() { "<empty>" } else { "<redacted>" })
            .field("secret", &if self.secret.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

/// A single synthesis call. Built fresh per invocation and never reused.
#[derive(Clone, Debug)]
pub struct SynthesisRequest {
    pub text: String,
    pub document: DocumentKind,
    pub parameters: SynthesisParameters,
    pub credentials: Credentials,
    pub mode: SynthesisMode,
}

/// Result of a synthesis call
#[derive(Debug)]
pub enum SynthesisOutcome {
    /// Raw audio (WAV)
    Bytes(Vec<u8>),
    /// Live playback that can be cancelled
    Handle(PlaybackHandle),
    Failure(SynthesisError),
}

impl SynthesisOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SynthesisOutcome::Failure(_))
    }

    pub fn error(&self) -> Option<&SynthesisError> {
        match self {
            SynthesisOutcome::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(SynthesisError::kind)
    }

    pub fn into_result(self) -> SynthesisResult<Self> {
        match self {
            SynthesisOutcome::Failure(err) => Err(err),
            other => Ok(other),
        }
    }
}

impl From<SynthesisResult<Vec<u8>>> for SynthesisOutcome {
    fn from(result: SynthesisResult<Vec<u8>>) -> Self {
        match result {
            Ok(bytes) => SynthesisOutcome::Bytes(bytes),
            Err(err) => SynthesisOutcome::Failure(err),
        }
    }
}

impl From<SynthesisResult<PlaybackHandle>> for SynthesisOutcome {
    fn from(result: SynthesisResult<PlaybackHandle>) -> Self {
        match result {
            Ok(handle) => SynthesisOutcome::Handle(handle),
            Err(err) => SynthesisOutcome::Failure(err),
        }
    }
}
