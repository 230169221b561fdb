//! Prompt template for the research task.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use curio_core::{Error, PersonalizedContent, Result};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

const RESEARCH_DESCRIPTION: &str = "Research and generate personalized content based on \
comma-separated user search queries from the past 10 days. Prioritize recent searches and avoid \
duplicates. Format the output according to the provided template. {query}";

const RESEARCH_EXPECTED_OUTPUT: &str = "The output should be a structured dictionary containing \
personalized content based on the user's search history, following the PersonalizedContent \
structure below. Each section should have about 200 words. Consider the recency of searches, \
giving more weight to recent queries. Avoid repeating information derived from duplicate queries.";

/// Named values substituted into a task template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInputs(BTreeMap<String, String>);

impl TaskInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs holding just `query`.
    pub fn query(query: impl Into<String>) -> Self {
        Self::new().with("query", query)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// A prompt template plus the description of the output it should produce.
///
/// The reply is always parsed as `PersonalizedContent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub description: String,
    pub expected_output: String,
}

impl TaskDefinition {
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// The personalized-content research task.
    pub fn research() -> Self {
        Self::new(RESEARCH_DESCRIPTION, RESEARCH_EXPECTED_OUTPUT)
    }

    /// Placeholder names used by the description, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.description)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Fill every `{name}` placeholder in the description.
    pub fn interpolate(&self, inputs: &TaskInputs) -> Result<String> {
        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| inputs.get(name).is_none())
        {
            return Err(Error::invalid_request(format!(
                "task template references `{{{}}}` but no such input was given",
                missing
            )));
        }

        let filled = PLACEHOLDER.replace_all(&self.description, |caps: &regex::Captures| {
            inputs.get(&caps[1]).unwrap_or_default().to_string()
        });
        Ok(filled.into_owned())
    }

    /// The complete user prompt: filled description, expected output and the
    /// JSON shape the reply must take.
    pub fn render(&self, inputs: &TaskInputs) -> Result<String> {
        let description = self.interpolate(inputs)?;
        Ok(format!(
            "{}\n\nExpected output:\n{}\n\nReply with a single JSON object and nothing else, \
             using exactly these keys:\n{}",
            description,
            self.expected_output,
            PersonalizedContent::schema_hint()
        ))
    }
}
