//! Runs the research task against the persona's model.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use curio_core::{CompletionRequest, Error, Message, PersonalizedContent, Provider, Result};

use crate::persona::AgentPersona;
use crate::task::{TaskDefinition, TaskInputs};

/// How tasks are scheduled. Only one agent and one task exist, so the
/// pipeline is always sequential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Process {
    #[default]
    Sequential,
}

/// One persona bound to one task and a model client.
///
/// Built once at startup and shared read-only.
pub struct Crew {
    persona: AgentPersona,
    task: TaskDefinition,
    provider: Arc<dyn Provider>,
    model: String,
    process: Process,
}

impl Crew {
    pub fn new(persona: AgentPersona, task: TaskDefinition, provider: Arc<dyn Provider>) -> Self {
        let model = persona.llm.model.clone();
        Self {
            persona,
            task,
            provider,
            model,
            process: Process::Sequential,
        }
    }

    /// Model name sent on the wire, when it differs from the configured
    /// `provider/model` form.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona(&self) -> &AgentPersona {
        &self.persona
    }

    pub fn task(&self) -> &TaskDefinition {
        &self.task
    }

    pub fn process(&self) -> Process {
        self.process
    }

    /// Build the request `run` would send for these inputs.
    pub fn build_request(&self, inputs: &TaskInputs) -> Result<CompletionRequest> {
        let query = inputs.get("query").map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(Error::invalid_request("a non-empty `query` input is required"));
        }

        let prompt = self.task.render(inputs)?;
        let llm = &self.persona.llm;

        let mut request = CompletionRequest::new(vec![
            Message::system(self.persona.system_prompt()),
            Message::user(prompt),
        ])
        .with_model(&self.model)
        .with_temperature(llm.temperature)
        .with_json_output(llm.json_mode);
        if let Some(max_tokens) = llm.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        Ok(request)
    }

    /// Send the filled task to the model once and parse the reply.
    ///
    /// A blank reply is `Error::EmptyResult`; every other failure (transport,
    /// remote error, unparseable reply) is returned as-is.
    pub async fn run(&self, inputs: &TaskInputs) -> Result<PersonalizedContent> {
        let request = self.build_request(inputs)?;
        let query = inputs.get("query").unwrap_or_default();

        info!(
            query = %query,
            model = %self.model,
            provider = %self.provider.name(),
            "Running research task"
        );
        let started = Instant::now();

        let response = self.provider.complete(request).await.inspect_err(|e| {
            warn!(query = %query, error = %e, "Model call failed");
        })?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Model replied"
        );

        if response.message.is_blank() {
            return Err(Error::EmptyResult);
        }

        let content = PersonalizedContent::from_reply(&response.message.content).inspect_err(|e| {
            warn!(error = %e, "Model reply did not match the expected shape");
            debug!(reply = %response.message.content, "Unparsed reply");
        })?;

        debug!(words = content.word_count(), "Parsed personalized content");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;
    use curio_core::testing::MockProvider;
    use curio_core::Role;

    const TRAVEL_REPLY: &str = r#"{
        "topic_overview": "Europe rewards travellers who plan around seasons.",
        "key_considerations": {"Budget": "Nordic cities cost more."},
        "recent_trends": {"2024 trend": "Night trains are back."},
        "how_to_choose": {"Step 1": "Pick a region."},
        "additional_resources": {"Site A": "https://example.com"},
        "conclusion": "Book early and travel off-peak."
    }"#;

    fn crew_with(mock: Arc<MockProvider>) -> Crew {
        Crew::new(
            AgentPersona::researcher(LlmConfig::default()),
            TaskDefinition::research(),
            mock,
        )
    }

    #[tokio::test]
    async fn test_run_returns_content() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response(TRAVEL_REPLY);
        let crew = crew_with(Arc::clone(&mock));

        let content = crew
            .run(&TaskInputs::query("best travel destinations in europe"))
            .await
            .unwrap();

        assert_eq!(content.key_considerations["Budget"], "Nordic cities cost more.");
        assert_eq!(mock.request_count(), 1);

        let request = mock.last_request().unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("Personalized Content Researcher"));
        assert!(request.messages[1]
            .content
            .contains("best travel destinations in europe"));
        assert_eq!(request.model.as_deref(), Some("groq/llama3-70b-8192"));
        assert_eq!(request.temperature, Some(0.2));
        assert!(request.json_output);
    }

    #[test]
    fn test_wire_model_override() {
        let crew = crew_with(Arc::new(MockProvider::new())).with_model("llama3-70b-8192");
        let request = crew.build_request(&TaskInputs::query("ssd")).unwrap();
        assert_eq!(request.model.as_deref(), Some("llama3-70b-8192"));
        assert_eq!(crew.persona().llm.model, "groq/llama3-70b-8192");
    }

    #[tokio::test]
    async fn test_blank_query_never_calls_model() {
        let mock = Arc::new(MockProvider::new());
        let crew = crew_with(Arc::clone(&mock));

        let err = crew.run(&TaskInputs::query("   ")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));

        let err = crew.run(&TaskInputs::new()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_error(Error::network("connection refused"));
        let crew = crew_with(mock);

        let err = crew.run(&TaskInputs::query("ssd")).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty_result() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response("  ");
        let crew = crew_with(mock);

        let err = crew.run(&TaskInputs::query("ssd")).await.unwrap_err();
        assert!(err.is_empty_result());
    }

    #[tokio::test]
    async fn test_incomplete_reply_fails() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response(r#"{"topic_overview": "only this"}"#);
        let crew = crew_with(mock);

        let err = crew.run(&TaskInputs::query("ssd")).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_run_is_idempotent_with_deterministic_model() {
        let mock = Arc::new(MockProvider::new());
        mock.queue_response(TRAVEL_REPLY);
        mock.queue_response(TRAVEL_REPLY);
        let crew = crew_with(Arc::clone(&mock));
        let inputs = TaskInputs::query("best travel destinations in europe");

        let first = crew.run(&inputs).await.unwrap();
        let second = crew.run(&inputs).await.unwrap();
        assert_eq!(first, second);

        let requests = mock.captured_requests.lock().unwrap();
        assert_eq!(requests[0].messages, requests[1].messages);
    }

    #[test]
    fn test_max_tokens_forwarded() {
        let llm = LlmConfig {
            max_tokens: Some(4096),
            ..LlmConfig::default()
        };
        let crew = Crew::new(
            AgentPersona::researcher(llm),
            TaskDefinition::research(),
            Arc::new(MockProvider::new()),
        );
        let request = crew.build_request(&TaskInputs::query("ssd")).unwrap();
        assert_eq!(request.max_tokens, Some(4096));
        assert_eq!(crew.process(), Process::Sequential);
    }
}
