//! Pipeline configuration loaded from TOML with environment overrides

use crate::coordinator::SynthesisCoordinator;
use crate::error::{SynthesisError, SynthesisResult};
use crate::markup::{DEFAULT_LANGUAGE, MarkupAssembler};
use crate::params::{MAX_VOLUME, SynthesisParameters};
use crate::provider::SynthesisProvider;
use crate::providers::standard::{self, StandardConfig, StandardProvider};
use crate::providers::streaming::{self, StreamingConfig, StreamingProvider};
use crate::roles::{MatchPolicy, Role, RoleRegistry};
use crate::segmenter::{DEFAULT_PAUSE_MS, DialogueSegmenter};
use crate::types::{Credentials, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ENV_KEY: &str = "VOICECAST_KEY";
pub const ENV_SECRET: &str = "VOICECAST_SECRET";
pub const ENV_PROVIDER: &str = "VOICECAST_PROVIDER";

/// Default voice and prosody on the unified scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Provider voice; the provider's default voice when unset
    #[serde(default)]
    pub voice_id: Option<String>,

    /// Expressive style (emotion for the streaming provider)
    #[serde(default)]
    pub style: Option<String>,

    #[serde(default = "default_ratio")]
    pub rate: f64,

    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default = "default_ratio")]
    pub style_intensity: f64,
}

/// Markup assembly options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupSettings {
    #[serde(default = "default_language")]
    pub language: String,

    /// Escape XML special characters in segment text
    #[serde(default = "default_true")]
    pub escape_text: bool,

    /// Pause appended after dialogue and narration lines, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u32,
}

/// Role catalog selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSettings {
    /// Overrides the policy of the selected catalog
    #[serde(default)]
    pub match_policy: Option<MatchPolicy>,

    /// Overrides the narrator of the selected catalog
    #[serde(default)]
    pub narrator: Option<Role>,

    /// External TOML catalog; the built-in catalog when unset
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Inline cast, used when no external catalog is given
    #[serde(default)]
    pub cast: Vec<Role>,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub credentials: Credentials,

    #[serde(default)]
    pub voice: VoiceSettings,

    #[serde(default)]
    pub markup: MarkupSettings,

    #[serde(default)]
    pub standard: StandardConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,

    #[serde(default)]
    pub roles: RoleSettings,
}

// Default value functions
fn default_ratio() -> f64 {
    1.0
}

fn default_volume() -> f64 {
    MAX_VOLUME
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_pause_ms() -> u32 {
    DEFAULT_PAUSE_MS
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: None,
            style: None,
            rate: default_ratio(),
            volume: default_volume(),
            style_intensity: default_ratio(),
        }
    }
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            escape_text: default_true(),
            pause_ms: default_pause_ms(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> SynthesisResult<Self> {
        toml::from_str(content)
            .map_err(|e| SynthesisError::ConfigurationError(format!("pipeline config: {e}")))
    }

    /// Read a TOML file and apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> SynthesisResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SynthesisError::io_error(e, "read pipeline config", path.display().to_string())
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env()?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Apply `VOICECAST_KEY`, `VOICECAST_SECRET` and `VOICECAST_PROVIDER`
    pub fn apply_env(&mut self) -> SynthesisResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> SynthesisResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_KEY) {
            self.credentials.key = key;
        }
        if let Some(secret) = lookup(ENV_SECRET) {
            self.credentials.secret = secret;
        }
        if let Some(provider) = lookup(ENV_PROVIDER) {
            self.provider = provider.parse()?;
        }
        Ok(())
    }

    /// Default parameters, filling the voice and style from the selected provider
    pub fn parameters(&self) -> SynthesisParameters {
        let (voice, style) = match self.provider {
            ProviderKind::Standard => (
                standard::config::DEFAULT_VOICE,
                standard::config::DEFAULT_STYLE,
            ),
            ProviderKind::Streaming => (streaming::config::DEFAULT_VOICE, ""),
        };
        SynthesisParameters::new(
            self.voice.voice_id.as_deref().unwrap_or(voice),
            self.voice.style.as_deref().unwrap_or(style),
        )
        .with_rate(self.voice.rate)
        .with_volume(self.voice.volume)
        .with_style_intensity(self.voice.style_intensity)
    }

    /// Role registry from the external catalog, the inline cast or the built-in catalog
    pub fn registry(&self) -> SynthesisResult<RoleRegistry> {
        let mut registry = match (&self.roles.catalog, self.roles.cast.is_empty()) {
            (Some(path), _) => RoleRegistry::from_path(path)?,
            (None, false) => RoleRegistry::new(self.roles.cast.clone())?,
            (None, true) => RoleRegistry::default(),
        };
        if let Some(policy) = self.roles.match_policy {
            registry = registry.with_policy(policy);
        }
        if let Some(narrator) = &self.roles.narrator {
            registry = registry.with_narrator(narrator.clone());
        }
        Ok(registry)
    }

    pub fn build_provider(&self) -> SynthesisResult<Arc<dyn SynthesisProvider>> {
        Ok(match self.provider {
            ProviderKind::Standard => {
                let mut config = self.standard.clone();
                config.language = self.markup.language.clone();
                Arc::new(StandardProvider::new(config))
            }
            ProviderKind::Streaming => Arc::new(StreamingProvider::new(self.streaming.clone())?),
        })
    }

    /// Validate and wire registry, segmenter, assembler and provider together
    pub fn build_coordinator(&self) -> SynthesisResult<SynthesisCoordinator> {
        if self.markup.language.trim().is_empty() {
            return Err(SynthesisError::ConfigurationError(
                "markup language must not be empty".to_string(),
            ));
        }
        let registry = Arc::new(self.registry()?);
        let segmenter = DialogueSegmenter::new(registry).with_pause_ms(self.markup.pause_ms);
        let assembler =
            MarkupAssembler::new(&self.markup.language).with_escaping(self.markup.escape_text);
        let provider = self.build_provider()?;

        log::info!(
            "Pipeline ready: provider={}, {} roles",
            self.provider,
            segmenter.registry().len()
        );
        Ok(SynthesisCoordinator::new(provider, self.credentials.clone())
            .with_segmenter(segmenter)
            .with_assembler(assembler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
provider = "streaming"

[credentials]
key = "app-1"
secret = "tok-1"

[voice]
style = "happy"
rate = 3.0
volume = 50.0

[markup]
escape_text = false

[streaming]
cluster = "volcano_test"

[roles]
match_policy = "exact"

[[roles.cast]]
name = "张三"
voice = "V1"
bookmark = "张三"
"#;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.provider, ProviderKind::Standard);

        let params = config.parameters();
        assert_eq!(params.voice_id(), "zh-CN-YunxiNeural");
        assert_eq!(params.style(), "advertisement_upbeat");
        assert!(params.is_identity());
    }

    #[test]
    fn test_parse_sample() {
        let config = PipelineConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.provider, ProviderKind::Streaming);
        assert_eq!(config.credentials, Credentials::new("app-1", "tok-1"));
        assert_eq!(config.streaming.cluster, "volcano_test");
        assert_eq!(config.streaming.uid, "388808087185088");
        assert!(!config.markup.escape_text);

        let params = config.parameters();
        assert_eq!(params.voice_id(), "BV701_V2_streaming");
        assert_eq!(params.style(), "happy");
        assert_eq!(params.rate(), 2.0);
        assert_eq!(params.volume(), 50.0);
    }

    #[test]
    fn test_inline_cast_and_policy() {
        let config = PipelineConfig::from_toml_str(SAMPLE).unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.policy(), MatchPolicy::Exact);
        assert_eq!(registry.lookup("张三").unwrap().voice, "V1");
        assert!(registry.lookup("张三丰").is_none());
    }

    #[test]
    fn test_builtin_catalog_when_no_cast() {
        let registry = PipelineConfig::default().registry().unwrap();
        assert_eq!(registry.len(), RoleRegistry::default().len());
    }

    #[test]
    fn test_external_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cast.toml");
        std::fs::write(
            &path,
            "[[roles]]\nname = \"李四\"\nvoice = \"V2\"\nbookmark = \"李四\"\n",
        )
        .unwrap();

        let mut config = PipelineConfig::default();
        config.roles.catalog = Some(path);
        config.roles.narrator = Some(Role::new("旁白", "N1", "旁白"));
        let registry = config.registry().unwrap();
        assert_eq!(registry.lookup("李四说").unwrap().voice, "V2");
        assert_eq!(registry.narrator().voice, "N1");
    }

    #[test]
    fn test_missing_catalog_is_io_error() {
        let mut config = PipelineConfig::default();
        config.roles.catalog = Some(PathBuf::from("/nonexistent/cast.toml"));
        let err = config.registry().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_KEY, "env-key"),
            (ENV_SECRET, "env-secret"),
            (ENV_PROVIDER, "bytedance"),
        ]
        .into_iter()
        .collect();

        let mut config = PipelineConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.credentials, Credentials::new("env-key", "env-secret"));
        assert_eq!(config.provider, ProviderKind::Streaming);
    }

    #[test]
    fn test_unknown_provider_override() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_overrides(|name| (name == ENV_PROVIDER).then(|| "carrier-pigeon".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_toml() {
        let err = PipelineConfig::from_toml_str("provider = [").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_build_coordinator() {
        let config = PipelineConfig::from_toml_str(SAMPLE).unwrap();
        let coordinator = config.build_coordinator().unwrap();
        assert_eq!(coordinator.provider().kind(), ProviderKind::Streaming);
        assert_eq!(coordinator.segmenter().registry().len(), 1);
    }

    #[test]
    fn test_build_coordinator_rejects_bad_endpoint() {
        let mut config = PipelineConfig::default();
        config.provider = ProviderKind::Streaming;
        config.streaming.endpoint = "not a url".to_string();
        let err = config.build_coordinator().err().unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }
}
