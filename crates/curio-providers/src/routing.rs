/// A model identifier resolved to the endpoint that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    /// Provider name, lowercased (e.g. `groq`).
    pub provider: String,
    /// Model name as the endpoint expects it, without the provider prefix.
    pub model: String,
    /// Known base URL for the provider, if any.
    pub base_url: Option<&'static str>,
}

impl ModelRoute {
    /// Environment variable consulted for this provider's API key.
    pub fn api_key_env(&self) -> String {
        format!("{}_API_KEY", self.provider.to_uppercase())
    }
}

/// Look up the OpenAI-compatible base URL for a provider by name.
///
/// Returns `None` for unknown providers.
pub fn known_base_url(provider: &str) -> Option<&'static str> {
    match provider.to_lowercase().as_str() {
        "groq" => Some("https://api.groq.com/openai/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "together" | "together_ai" => Some("https://api.together.xyz/v1"),
        "mistral" => Some("https://api.mistral.ai/v1"),
        _ => None,
    }
}

/// Split a `provider/model` identifier.
///
/// Only the first `/` separates the provider, so `openrouter/meta-llama/x`
/// keeps `meta-llama/x` as the model. A prefix that is not a known provider
/// is treated as part of the model name and routed to OpenAI.
pub fn route_model(identifier: &str) -> ModelRoute {
    let identifier = identifier.trim();

    if let Some((prefix, model)) = identifier.split_once('/') {
        if let Some(base_url) = known_base_url(prefix) {
            return ModelRoute {
                provider: prefix.to_lowercase(),
                model: model.to_string(),
                base_url: Some(base_url),
            };
        }
    }

    ModelRoute {
        provider: "openai".to_string(),
        model: identifier.to_string(),
        base_url: known_base_url("openai"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_route() {
        let route = route_model("groq/llama3-70b-8192");
        assert_eq!(route.provider, "groq");
        assert_eq!(route.model, "llama3-70b-8192");
        assert_eq!(route.base_url, Some("https://api.groq.com/openai/v1"));
        assert_eq!(route.api_key_env(), "GROQ_API_KEY");
    }

    #[test]
    fn test_bare_model_defaults_to_openai() {
        let route = route_model("gpt-4o-mini");
        assert_eq!(route.provider, "openai");
        assert_eq!(route.model, "gpt-4o-mini");
        assert_eq!(route.base_url, Some("https://api.openai.com/v1"));
    }

    #[test]
    fn test_nested_model_name() {
        let route = route_model("openrouter/meta-llama/llama-3-70b-instruct");
        assert_eq!(route.provider, "openrouter");
        assert_eq!(route.model, "meta-llama/llama-3-70b-instruct");
    }

    #[test]
    fn test_unknown_prefix_is_part_of_model() {
        let route = route_model("meta-llama/Llama-3-8B");
        assert_eq!(route.provider, "openai");
        assert_eq!(route.model, "meta-llama/Llama-3-8B");
    }

    #[test]
    fn test_case_insensitive_provider() {
        let route = route_model("Groq/llama3-8b-8192");
        assert_eq!(route.provider, "groq");
        assert_eq!(known_base_url("OLLAMA"), Some("http://localhost:11434/v1"));
    }

    #[test]
    fn test_unknown_provider() {
        assert_eq!(known_base_url("custom"), None);
    }
}
