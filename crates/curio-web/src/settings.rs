//! Turns configuration into a ready-to-run `Crew`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use curio_agents::{AgentPersona, Crew, TaskDefinition};
use curio_core::Provider;
use curio_providers::{route_model, OpenAIProvider};

use crate::config::{Config, LlmSection};

/// Endpoints that run locally and need no key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama"];

/// Everything needed to build the model client.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

/// Resolve the endpoint, model name and API key for the `[llm]` section.
///
/// API key priority: config > `<PROVIDER>_API_KEY`. A custom base URL or a
/// local provider may run without one.
pub fn resolve_provider_settings(llm: &LlmSection) -> Result<ProviderSettings> {
    let route = route_model(&llm.model);

    let base_url = llm
        .base_url
        .clone()
        .or_else(|| route.base_url.map(str::to_string))
        .with_context(|| format!("No base URL known for provider '{}'", route.provider))?;

    let api_key = llm
        .api_key
        .clone()
        .or_else(|| std::env::var(route.api_key_env()).ok())
        .or_else(|| {
            let keyless = llm.base_url.is_some() || KEYLESS_PROVIDERS.contains(&route.provider.as_str());
            keyless.then(|| "none".to_string())
        })
        .with_context(|| {
            format!(
                "API key not found for provider '{}'. Set {} or [llm] api_key in the config file",
                route.provider,
                route.api_key_env()
            )
        })?;

    Ok(ProviderSettings {
        provider_name: route.provider,
        api_key,
        base_url,
        model: route.model,
        timeout: llm.request_timeout_secs.map(Duration::from_secs),
    })
}

pub fn create_provider(settings: &ProviderSettings) -> Arc<dyn Provider> {
    let mut provider = OpenAIProvider::new(&settings.api_key)
        .with_name(&settings.provider_name)
        .with_base_url(&settings.base_url)
        .with_default_model(&settings.model);
    if let Some(timeout) = settings.timeout {
        provider = provider.with_timeout(timeout);
    }
    Arc::new(provider)
}

/// Build the research crew around an existing provider.
pub fn crew_with_provider(config: &Config, provider: Arc<dyn Provider>) -> Crew {
    let persona = AgentPersona::researcher(config.llm.llm_config()).with_overrides(&config.agent);
    Crew::new(persona, TaskDefinition::research(), provider)
}

/// Build the research crew from configuration.
pub fn build_crew(config: &Config) -> Result<Crew> {
    let settings = resolve_provider_settings(&config.llm)?;
    tracing::info!(
        provider = %settings.provider_name,
        model = %settings.model,
        base_url = %settings.base_url,
        "Configured model client"
    );
    let provider = create_provider(&settings);
    Ok(crew_with_provider(config, provider).with_model(settings.model))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(model: &str) -> LlmSection {
        LlmSection {
            model: model.to_string(),
            ..LlmSection::default()
        }
    }

    #[test]
    fn test_resolve_with_config_key() {
        let llm = LlmSection {
            api_key: Some("gsk-test".to_string()),
            request_timeout_secs: Some(30),
            ..section("groq/llama3-70b-8192")
        };
        let settings = resolve_provider_settings(&llm).unwrap();
        assert_eq!(settings.provider_name, "groq");
        assert_eq!(settings.model, "llama3-70b-8192");
        assert_eq!(settings.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(settings.api_key, "gsk-test");
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let settings = resolve_provider_settings(&section("ollama/llama3")).unwrap();
        assert_eq!(settings.api_key, "none");
        assert_eq!(settings.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_custom_base_url_wins() {
        let llm = LlmSection {
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..section("mistral-7b")
        };
        let settings = resolve_provider_settings(&llm).unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.model, "mistral-7b");
        assert_eq!(settings.api_key, "none");
    }

    #[test]
    fn test_missing_key_is_reported() {
        // Only meaningful when the environment does not supply the key.
        let llm = section("together/some-model");
        if std::env::var("TOGETHER_API_KEY").is_err() {
            let err = resolve_provider_settings(&llm).unwrap_err();
            assert!(err.to_string().contains("TOGETHER_API_KEY"));
        }
    }

    #[test]
    fn test_crew_sends_bare_model() {
        let mut config = Config::default();
        config.llm.model = "ollama/llama3".to_string();
        let crew = build_crew(&config).unwrap();
        assert_eq!(crew.model(), "llama3");
        assert_eq!(crew.persona().llm.model, "ollama/llama3");
    }

    #[test]
    fn test_crew_uses_persona_overrides() {
        let mut config = Config::default();
        config.agent.role = Some("Gadget Analyst".to_string());
        let crew = crew_with_provider(
            &config,
            Arc::new(curio_core::testing::MockProvider::new()),
        );
        assert_eq!(crew.persona().role, "Gadget Analyst");
        assert_eq!(crew.persona().llm.temperature, 0.2);
    }
}
