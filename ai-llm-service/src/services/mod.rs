//! Provider clients and the traits the rest of the workspace programs against.

use std::{future::Future, pin::Pin};

use crate::error_handler::AiLlmError;

pub mod open_ai_service;

/// Boxed, sendable future returned by the provider traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A chat model that answers a `(system, user)` prompt pair.
pub trait ChatCompletion: Send + Sync {
    /// Returns the text of the first choice, or `None` when the provider
    /// answered without any content.
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, AiLlmError>>;
}

/// Batched text embeddings.
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces one vector per input, in input order.
    fn embed_batch<'a>(
        &'a self,
        inputs: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, AiLlmError>>;
}
