use thiserror::Error;

/// Coarse classification of a [`SynthesisError`], stable across message changes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Serialization,
    Network,
    InvalidResponse,
    Engine,
    Cancelled,
    Io,
}

/// Synthesis pipeline errors
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Malformed endpoint, credentials or configuration file
    #[error(
        "Configuration error: {0}\nSuggestion: Check the provider endpoint, credentials and role catalog"
    )]
    ConfigurationError(String),

    /// Request body could not be encoded
    #[error("Request serialization failed: {0}\nProvider: {1}")]
    SerializationError(String, String),

    /// Transport-level failure
    #[error(
        "Network error: {0}\nProvider: {1}\nSuggestion: Check connectivity to the synthesis endpoint"
    )]
    NetworkError(String, String),

    /// Response undecodable or missing the expected success field
    #[error("Invalid provider response: {message}\nProvider code: {}", display_code(.code))]
    InvalidResponse { message: String, code: Option<i64> },

    /// Speech engine construction or synthesis failure
    #[error("Speech engine error: {0}\nProvider: {1}")]
    EngineError(String, String),

    /// User-initiated stop
    #[error("Synthesis cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}\nOperation: {1}\nPath: {2}")]
    IoError(std::io::Error, String, String),
}

fn display_code(code: &Option<i64>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl SynthesisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthesisError::ConfigurationError(_) => ErrorKind::Configuration,
            SynthesisError::SerializationError(..) => ErrorKind::Serialization,
            SynthesisError::NetworkError(..) => ErrorKind::Network,
            SynthesisError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            SynthesisError::EngineError(..) => ErrorKind::Engine,
            SynthesisError::Cancelled => ErrorKind::Cancelled,
            SynthesisError::IoError(..) => ErrorKind::Io,
        }
    }

    /// Provider error code carried by an [`SynthesisError::InvalidResponse`]
    pub fn provider_code(&self) -> Option<i64> {
        match self {
            SynthesisError::InvalidResponse { code, .. } => *code,
            _ => None,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            code: None,
        }
    }

    pub fn io_error(
        err: std::io::Error,
        operation: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::IoError(err, operation.into(), path.into())
    }
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;
