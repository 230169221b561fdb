//! curio-providers: LLM provider implementations for curio
//!
//! This crate provides an OpenAI-compatible implementation of the Provider
//! trait and the routing table that maps `provider/model` identifiers to
//! endpoints.

pub mod openai;
pub mod routing;

pub use openai::OpenAIProvider;
pub use routing::{known_base_url, route_model, ModelRoute};
