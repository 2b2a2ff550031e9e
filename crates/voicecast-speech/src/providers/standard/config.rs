//! Configuration for the standard provider

use serde::{Deserialize, Serialize};

pub const DEFAULT_VOICE: &str = "zh-CN-YunxiNeural";
pub const DEFAULT_STYLE: &str = "advertisement_upbeat";

/// Configuration for the standard provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardConfig {
    /// Engine endpoint; `{region}` is replaced by the credential region
    #[serde(default = "default_endpoint_template")]
    pub endpoint_template: String,

    /// Audio encoding requested from the engine
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Language of the single-voice document wrapped around plain text
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_endpoint_template() -> String {
    "https://{region}.tts.speech.microsoft.com/cognitiveservices/v1".to_string()
}

fn default_output_format() -> String {
    "riff-24khz-16bit-mono-pcm".to_string()
}

fn default_language() -> String {
    crate::markup::DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for StandardConfig {
    fn default() -> Self {
        Self {
            endpoint_template: default_endpoint_template(),
            output_format: default_output_format(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StandardConfig {
    pub fn with_endpoint_template(mut self, template: impl Into<String>) -> Self {
        self.endpoint_template = template.into();
        self
    }
}
