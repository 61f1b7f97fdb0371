//! Typed error for the site-context crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Written to stdout when no question was supplied.
pub const MSG_NO_QUESTION: &str = "⚠️ Error: No question provided.";
/// Written to stdout when the content file cannot be read.
pub const MSG_CONTENT_UNAVAILABLE: &str = "⚠️ Error: Unable to load content.";
/// Written to stdout when any provider stage fails.
pub const MSG_GENERATION_FAILED: &str = "⚠️ Error: Unable to generate response.";

#[derive(Debug, Error)]
pub enum SiteContextError {
    /// Question argument absent or blank.
    #[error("no question provided")]
    MissingQuestion,

    /// Content file missing, unreadable, or not UTF-8.
    #[error("failed to read content file {path}: {source}")]
    ContentLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid runtime configuration (env or CLI overrides).
    #[error("config error: {0}")]
    Config(#[source] AiLlmError),

    /// Unknown scoring strategy name.
    #[error("unknown relevance strategy `{0}` (expected `lexical` or `semantic`)")]
    UnknownStrategy(String),

    /// Embedding call failed (network, auth, quota, decode).
    #[error("embedding failed: {0}")]
    Embedding(#[source] AiLlmError),

    /// Embedding provider returned a different number of vectors than inputs.
    #[error("embedding provider returned {got} vectors for {expected} inputs")]
    EmbeddingCount { expected: usize, got: usize },

    /// Chat completion call failed.
    #[error("completion failed: {0}")]
    Completion(#[source] AiLlmError),

    /// Writing the answer to the output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl SiteContextError {
    /// Fixed user-facing marker written to stdout in place of an answer.
    pub fn marker(&self) -> &'static str {
        match self {
            SiteContextError::MissingQuestion => MSG_NO_QUESTION,
            SiteContextError::ContentLoad { .. } => MSG_CONTENT_UNAVAILABLE,
            SiteContextError::Config(_)
            | SiteContextError::UnknownStrategy(_)
            | SiteContextError::Embedding(_)
            | SiteContextError::EmbeddingCount { .. }
            | SiteContextError::Completion(_)
            | SiteContextError::Output(_) => MSG_GENERATION_FAILED,
        }
    }

    /// Process exit status for this failure. Every failure exits non-zero,
    /// provider failures included.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
