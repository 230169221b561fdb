//! curio-core: Core types and traits for curio
//!
//! This crate provides the foundational types shared by the curio crates:
//! the error type, chat messages, the `Provider` trait and the output schema
//! the model is asked to fill in.

pub mod error;
pub mod message;
pub mod provider;
pub mod schema;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::Error;
pub use message::{Message, Role, Usage};
pub use provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
pub use schema::{
    FieldKind, FieldSpec, PersonalizedContent, SearchRecord, Section, SectionBody,
    TIMESTAMP_FORMAT,
};

pub type Result<T> = std::result::Result<T, Error>;
