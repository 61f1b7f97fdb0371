//! Default LLM configs loaded from environment variables.
//!
//! Two roles are provided, both targeting an OpenAI-compatible API:
//!
//! - **Chat** → answers the user's question from a system prompt
//! - **Embedding** → turns content lines and the question into vectors
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_API_KEY`  = bearer token (read here, enforced by the service)
//! - `OPENAI_BASE_URL` = API base (default `https://api.openai.com`)
//! - `LLM_TIMEOUT_SECS` = per-request timeout (default 60)
//!
//! Chat:
//! - `OPENAI_CHAT_MODEL` = chat model (default `gpt-4o-mini`)
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32)
//! - `LLM_TEMPERATURE`   = optional temperature (0.0..=2.0)
//!
//! Embedding:
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (default `text-embedding-3-small`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, env_opt, env_opt_num, env_or, validate_http_endpoint, validate_range_f32,
    },
};

/// Public OpenAI API base.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
/// Chat model used when `OPENAI_CHAT_MODEL` is unset.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
/// Embedding model used when `OPENAI_EMBEDDING_MODEL` is unset.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Request timeout used when `LLM_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolves the API base from `OPENAI_BASE_URL`.
///
/// A trailing `/v1` is accepted and stripped, since the service appends it.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::InvalidFormat`] if the URL is not http/https
fn openai_endpoint() -> Result<String, AiLlmError> {
    let raw = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_ENDPOINT);
    validate_http_endpoint("OPENAI_BASE_URL", raw.trim())?;
    Ok(normalize_endpoint(&raw))
}

/// Strips whitespace, trailing slashes and a trailing `/v1`.
pub fn normalize_endpoint(raw: &str) -> String {
    let base = raw.trim().trim_end_matches('/');
    base.strip_suffix("/v1").unwrap_or(base).to_string()
}

fn timeout_secs() -> Result<Option<u64>, AiLlmError> {
    Ok(Some(
        env_opt_num::<u64>("LLM_TIMEOUT_SECS", "expected u64 seconds")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    ))
}

/// Constructs a config for the **chat** model.
///
/// # Env
/// - `OPENAI_CHAT_MODEL`, `LLM_MAX_TOKENS`, `LLM_TEMPERATURE` (all optional)
///
/// # Errors
/// Malformed numbers, out-of-range temperature, or a non-http base URL.
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = openai_endpoint()?;
    let model = env_or("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL);
    let max_tokens = env_opt_num::<u32>("LLM_MAX_TOKENS", "expected u32")?;
    let temperature = env_opt_num::<f32>("LLM_TEMPERATURE", "expected a float")?;
    if let Some(t) = temperature {
        validate_range_f32("LLM_TEMPERATURE", t, 0.0, 2.0, "expected 0.0..=2.0")?;
    }

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: env_opt("OPENAI_API_KEY"),
        max_tokens,
        temperature,
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

/// Constructs a config for the **embedding** model.
///
/// # Env
/// - `OPENAI_EMBEDDING_MODEL` (optional)
///
/// # Defaults
/// - no sampling knobs (`temperature`, `top_p`, `max_tokens` are `None`)
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = openai_endpoint()?;
    let model = env_or("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: env_opt("OPENAI_API_KEY"),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: timeout_secs()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalization() {
        assert_eq!(
            normalize_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com"
        );
        assert_eq!(
            normalize_endpoint(" http://127.0.0.1:8080 "),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            normalize_endpoint("https://proxy.local/openai"),
            "https://proxy.local/openai"
        );
    }
}
