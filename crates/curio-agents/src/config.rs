//! Configuration types for agents.

use serde::{Deserialize, Serialize};

/// Persona text overrides, read from the `[agent]` config section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PersonaOverride {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub goal: Option<String>,

    #[serde(default)]
    pub backstory: Option<String>,
}

impl PersonaOverride {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.goal.is_none() && self.backstory.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        let toml = r#"
            role = "Gadget Analyst"
            goal = "Compare consumer electronics."
        "#;

        let config: PersonaOverride = toml::from_str(toml).unwrap();
        assert_eq!(config.role.as_deref(), Some("Gadget Analyst"));
        assert_eq!(config.goal.as_deref(), Some("Compare consumer electronics."));
        assert!(config.backstory.is_none());
        assert!(!config.is_empty());
    }

    #[test]
    fn test_empty_override() {
        let config: PersonaOverride = toml::from_str("").unwrap();
        assert!(config.is_empty());
    }
}
