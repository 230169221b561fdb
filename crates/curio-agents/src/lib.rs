//! Agent definitions for curio.
//!
//! This crate provides:
//! - `LlmConfig`, the model settings an agent runs with
//! - `AgentPersona`, the researcher persona sent as the system prompt
//! - `TaskDefinition`, the research prompt template
//! - `Crew`, which runs the task against a `Provider` and parses the reply

mod config;
mod crew;
mod llm;
mod persona;
mod task;

pub use config::PersonaOverride;
pub use crew::{Crew, Process};
pub use llm::{LlmConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use persona::AgentPersona;
pub use task::{TaskDefinition, TaskInputs};
