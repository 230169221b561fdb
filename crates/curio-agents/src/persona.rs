//! Researcher persona sent to the model as the system message.

use crate::config::PersonaOverride;
use crate::llm::LlmConfig;

const ROLE: &str = "Personalized Content Researcher";

const GOAL: &str = "Research and compile personalized content based on a list of user search \
queries from the past 10 days, prioritizing recent context and avoiding duplicate queries. \
Deliver the output in a structured format. The overall output should be between 1000 and 1500 words.";

const BACKSTORY: &str = "You are an experienced researcher specializing in personalized content \
creation. You are adept at extracting relevant information from various sources and synthesizing \
it into a structured and engaging format. You prioritize recent information and avoid redundancy.";

/// Who the model should act as, and which model plays the part.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPersona {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub llm: LlmConfig,
}

impl AgentPersona {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: LlmConfig,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            llm,
        }
    }

    /// The built-in content researcher.
    pub fn researcher(llm: LlmConfig) -> Self {
        Self::new(ROLE, GOAL, BACKSTORY, llm)
    }

    /// Replace any persona text the override sets.
    pub fn with_overrides(mut self, overrides: &PersonaOverride) -> Self {
        if let Some(role) = &overrides.role {
            self.role = role.clone();
        }
        if let Some(goal) = &overrides.goal {
            self.goal = goal.clone();
        }
        if let Some(backstory) = &overrides.backstory {
            self.backstory = backstory.clone();
        }
        self
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\n\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}
