//! Configuration for the streaming provider

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://openspeech.bytedance.com/api/v1/tts";
pub const DEFAULT_VOICE: &str = "BV701_V2_streaming";

/// Configuration for the streaming provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Synthesis endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service cluster sent in the application group
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Anonymous user id sent with every request
    #[serde(default = "default_uid")]
    pub uid: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_cluster() -> String {
    "volcano_tts".to_string()
}

fn default_uid() -> String {
    "388808087185088".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            cluster: default_cluster(),
            uid: default_uid(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StreamingConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamingConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.cluster, "volcano_tts");
        assert_eq!(config.uid, "388808087185088");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StreamingConfig = toml::from_str(r#"endpoint = "http://localhost:9000/tts""#).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/tts");
        assert_eq!(config.cluster, "volcano_tts");
        assert_eq!(config.timeout_secs, 60);
    }
}
