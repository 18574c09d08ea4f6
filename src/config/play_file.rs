use super::ConfigError;
use crate::shared::ids::PlayId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ConfigProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            _ => Err("provider must be one of: anthropic, openai".to_string()),
        }
    }
}

impl std::fmt::Display for ConfigProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One prompt step of a play: a system/user template pair plus optional
/// model selection. Steps are addressed by 0-based position; step `i`
/// publishes its generated text as the `prompt_{i+1}` variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub user_template: String,
    pub system_template: String,
    #[serde(default)]
    pub model_provider: Option<ConfigProviderKind>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayConfig {
    pub id: PlayId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<StepConfig>,
}

impl PlayConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Play(format!(
                "play `{}` must declare a name",
                self.id
            )));
        }
        if self.steps.is_empty() {
            return Err(ConfigError::Play(format!(
                "play `{}` must declare at least one step",
                self.id
            )));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if step.user_template.trim().is_empty() {
                return Err(ConfigError::Play(format!(
                    "step {} of play `{}` has an empty user template",
                    index + 1,
                    self.id
                )));
            }
            if step.system_template.trim().is_empty() {
                return Err(ConfigError::Play(format!(
                    "step {} of play `{}` has an empty system template",
                    index + 1,
                    self.id
                )));
            }
            if step.model_name.is_some() && step.model_provider.is_none() {
                return Err(ConfigError::Play(format!(
                    "step {} of play `{}` sets a model name without a provider",
                    index + 1,
                    self.id
                )));
            }
        }
        Ok(())
    }
}
