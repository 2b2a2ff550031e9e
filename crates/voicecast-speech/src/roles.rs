//! Character catalog used to attribute dialogue to synthesis voices.

use crate::error::{SynthesisError, SynthesisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A known character: display name, synthesis voice and bookmark label
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Name as it appears in narrative text
    pub name: String,
    /// Provider voice identifier
    pub voice: String,
    /// Label written into the bookmark marker of each voice block
    pub bookmark: String,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        voice: impl Into<String>,
        bookmark: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            voice: voice.into(),
            bookmark: bookmark.into(),
        }
    }

    /// Default narrator voice used for unattributed text
    pub fn narrator() -> Self {
        Self::new("旁白", "zh-CN-YunxiNeural", "旁白（云希）")
    }
}

/// How a speaker prefix is compared against role names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The role name appears anywhere in the prefix
    #[default]
    Substring,
    /// The prefix, trimmed of whitespace and trailing punctuation, equals the role name
    Exact,
}

impl MatchPolicy {
    fn matches(self, prefix: &str, name: &str) -> bool {
        match self {
            MatchPolicy::Substring => prefix.contains(name),
            MatchPolicy::Exact => {
                let trimmed = prefix
                    .trim()
                    .trim_end_matches(|c: char| c.is_whitespace() || is_speaker_punctuation(c));
                trimmed == name
            }
        }
    }
}

fn is_speaker_punctuation(c: char) -> bool {
    matches!(c, '：' | ':' | '，' | ',' | '“' | '”' | '"' | '。')
}

/// Ordered role catalog. Earlier entries shadow later ones.
#[derive(Clone, Debug)]
pub struct RoleRegistry {
    roles: Vec<Role>,
    narrator: Role,
    policy: MatchPolicy,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    narrator: Option<Role>,
    #[serde(default)]
    match_policy: MatchPolicy,
    #[serde(default)]
    roles: Vec<Role>,
}

impl RoleRegistry {
    /// Create a registry from an ordered list of roles
    pub fn new(roles: Vec<Role>) -> SynthesisResult<Self> {
        if let Some(role) = roles.iter().find(|r| r.name.trim().is_empty()) {
            return Err(SynthesisError::ConfigurationError(format!(
                "role with voice '{}' has an empty name",
                role.voice
            )));
        }
        Ok(Self {
            roles,
            narrator: Role::narrator(),
            policy: MatchPolicy::default(),
        })
    }

    pub fn with_narrator(mut self, narrator: Role) -> Self {
        self.narrator = narrator;
        self
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse a TOML catalog (`[[roles]]` tables with `name`, `voice`, `bookmark`)
    pub fn from_toml_str(content: &str) -> SynthesisResult<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| SynthesisError::ConfigurationError(format!("role catalog: {e}")))?;
        let registry = Self::new(file.roles)?.with_policy(file.match_policy);
        Ok(match file.narrator {
            Some(narrator) => registry.with_narrator(narrator),
            None => registry,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> SynthesisResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SynthesisError::io_error(e, "read role catalog", path.display().to_string())
        })?;
        Self::from_toml_str(&content)
    }

    /// First role, in declaration order, whose name matches the prefix
    pub fn lookup(&self, prefix: &str) -> Option<&Role> {
        self.roles
            .iter()
            .find(|role| self.policy.matches(prefix, &role.name))
    }

    pub fn narrator(&self) -> &Role {
        &self.narrator
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self {
            roles: builtin_catalog(),
            narrator: Role::narrator(),
            policy: MatchPolicy::default(),
        }
    }
}

fn builtin_catalog() -> Vec<Role> {
    vec![
        Role::narrator(),
        Role::new("左小龙", "zh-CN-YunhaoNeural", "左小龙（云皓）"),
        Role::new("泥巴", "zh-CN-XiaoyiNeural", "泥巴（晓伊）"),
        Role::new("大帅", "zh-CN-liaoning-YunbiaoNeural", "大帅（云彪 辽宁）"),
        Role::new("警察", "zh-CN-YunzeNeural", "警察（云泽）"),
        Role::new("镇长", "zh-CN-YunyeNeural", "镇长（云野）"),
        Role::new("书记", "zh-CN-YunyeNeural", "书记（云野）"),
        Role::new("盲店主", "zh-CN-YunyeNeural", "盲店主（云野）"),
        Role::new("刘必芒", "zh-CN-YunyeNeural", "盲店主（云野）"),
        Role::new("黄莹", "zh-CN-XiaoxiaoNeural", "黄莹（晓晓）"),
        Role::new(
            "摄制组",
            "en-GB-OllieMultilingualNeural",
            "外国记者（Ollie Multilingual）",
        ),
    ]
}
