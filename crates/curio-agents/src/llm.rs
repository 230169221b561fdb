//! Model-client settings carried by an agent persona.

use serde::{Deserialize, Serialize};

use curio_core::{Error, Result};

pub const DEFAULT_MODEL: &str = "groq/llama3-70b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

/// Which hosted model to call and how.
///
/// The model identifier is not checked here; an unknown or unreachable model
/// only surfaces when a request is made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `provider/model` identifier, e.g. `groq/llama3-70b-8192`
    #[serde(default = "default_model")]
    pub model: String,

    /// Output randomness, 0.0 to 1.0
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (endpoint default when unset)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Ask the endpoint for a JSON object reply
    #[serde(default = "default_true")]
    pub json_mode: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            json_mode: true,
        }
    }
}

impl LlmConfig {
    pub fn new(model: impl Into<String>, temperature: f32) -> Result<Self> {
        let config = Self {
            model: model.into(),
            temperature,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature must be between 0 and 1, got {}",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::config("model identifier is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "groq/llama3-70b-8192");
        assert_eq!(config.temperature, 0.2);
        assert!(config.json_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_temperature_range() {
        assert!(LlmConfig::new("groq/llama3-8b-8192", 0.0).is_ok());
        assert!(LlmConfig::new("groq/llama3-8b-8192", 1.0).is_ok());
        assert!(matches!(
            LlmConfig::new("groq/llama3-8b-8192", 1.5),
            Err(Error::Config(_))
        ));
        assert!(LlmConfig::new("groq/llama3-8b-8192", -0.1).is_err());
    }

    #[test]
    fn test_unknown_model_is_accepted() {
        // Only the remote endpoint can tell whether a model exists.
        assert!(LlmConfig::new("nowhere/not-a-model", 0.5).is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: LlmConfig = toml::from_str("temperature = 0.7").unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
    }
}
