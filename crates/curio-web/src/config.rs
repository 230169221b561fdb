use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use curio_agents::{LlmConfig, PersonaOverride, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Prefix for environment overrides, e.g. `CURIO_LLM__MODEL`.
pub const ENV_PREFIX: &str = "CURIO_";

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Keys whose environment values are always taken verbatim. Env values are
/// otherwise parsed, so an all-digit API key would arrive as an integer.
const TEXT_KEYS: &[&str] = &[
    "server.bind",
    "llm.model",
    "llm.api_key",
    "llm.base_url",
    "agent.role",
    "agent.goal",
    "agent.backstory",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmSection,

    /// Persona text overrides
    #[serde(default)]
    pub agent: PersonaOverride,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the web UI listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// The `[llm]` section: model settings plus how to reach the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// `provider/model` identifier
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Request `response_format = json_object` from the endpoint
    #[serde(default = "default_true")]
    pub json_mode: bool,

    /// Falls back to `<PROVIDER>_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Overrides the provider's known base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Whole-request timeout; reqwest defaults when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            json_mode: true,
            api_key: None,
            base_url: None,
            request_timeout_secs: None,
        }
    }
}

impl LlmSection {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            json_mode: self.json_mode,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file, then `CURIO_*`
    /// environment variables.
    ///
    /// A missing default config file is fine; a missing explicit one is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::config_path().ok().filter(|p| p.exists()),
        };

        Self::extract(Self::with_env(Self::figment(path.as_deref())))
    }

    /// Merge `CURIO_*` environment variables on top of `figment`.
    pub fn with_env(figment: Figment) -> Figment {
        let env = Env::prefixed(ENV_PREFIX).split("__");
        let mut figment = figment.merge(env.clone().ignore(TEXT_KEYS));
        for (key, value) in env.iter() {
            if let Some(text_key) = TEXT_KEYS.iter().find(|k| key.as_str().eq_ignore_ascii_case(k)) {
                figment = figment.merge(Serialized::default(text_key, value));
            }
        }
        figment
    }

    /// Defaults merged with an optional TOML file, without environment.
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment,
        }
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().context("Invalid configuration")?;
        config
            .llm
            .llm_config()
            .validate()
            .context("Invalid [llm] settings")?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("curio"))
    }
}

/// Show only the first and last few characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
