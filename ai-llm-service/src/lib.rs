//! Shared LLM service for OpenAI-compatible providers.
//!
//! - [`OpenAiService`]: non-streaming chat completions and batched embeddings.
//! - [`ChatCompletion`] / [`EmbeddingsProvider`]: the seams other crates
//!   depend on, so tests can swap in fakes.
//! - [`config::default_config`]: env-driven configs for the chat and
//!   embedding roles.
//! - [`telemetry`]: stderr tracing setup for binaries.

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use services::open_ai_service::OpenAiService;
pub use services::{BoxFuture, ChatCompletion, EmbeddingsProvider};
