//! curio-web: the personalized content generator's web page and the
//! plumbing that builds its research crew from configuration.

pub mod config;
pub mod queries;
pub mod render;
pub mod server;
pub mod settings;

pub use config::Config;
pub use server::{router, serve, AppState};
