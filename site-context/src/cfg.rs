//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use ai_llm_service::config::default_config::{config_openai_chat, config_openai_embedding};
use ai_llm_service::error_handler::{env_opt, env_opt_bool, env_opt_num, env_or};
use ai_llm_service::{ConfigError, LlmModelConfig};

use crate::error::SiteContextError;
use crate::prompt::{DEFAULT_SITE_NAME, PromptTemplate};
use crate::score::{DEFAULT_FALLBACK_LINES, DEFAULT_TOP_K, ScoringStrategy};

/// Content file read when neither `--content` nor `DEVBAY_CONTENT_PATH` is set.
pub const DEFAULT_CONTENT_PATH: &str = "api/data/devbay_content.txt";

/// Config bag for one question/answer run.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteContextConfig {
    pub content_path: PathBuf,
    pub strategy: ScoringStrategy,
    pub top_k: usize,
    /// Lines the semantic scorer uses when ranking yields nothing.
    pub fallback_lines: usize,
    pub template: PromptTemplate,

    pub chat: LlmModelConfig,
    pub embedding: LlmModelConfig,
}

impl SiteContextConfig {
    /// Defaults for everything except the two model configs.
    pub fn with_defaults(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            content_path: PathBuf::from(DEFAULT_CONTENT_PATH),
            strategy: ScoringStrategy::Semantic,
            top_k: DEFAULT_TOP_K,
            fallback_lines: DEFAULT_FALLBACK_LINES,
            template: PromptTemplate::default(),
            chat,
            embedding,
        }
    }

    /// Build from environment variables, falling back to defaults for unset ones.
    ///
    /// # Env
    /// - `DEVBAY_CONTENT_PATH`, `RELEVANCE_STRATEGY`, `CONTEXT_TOP_K`,
    ///   `SEMANTIC_FALLBACK_LINES`, `PROMPT_GENERAL_KNOWLEDGE`,
    ///   `ASSISTANT_SITE_NAME`
    /// - plus the `OPENAI_*` / `LLM_*` variables read by
    ///   [`ai_llm_service::config::default_config`]
    ///
    /// # Errors
    /// [`SiteContextError::Config`] for malformed numbers or booleans and
    /// [`SiteContextError::UnknownStrategy`] for an unrecognized strategy name.
    pub fn from_env() -> Result<Self, SiteContextError> {
        let chat = config_openai_chat().map_err(SiteContextError::Config)?;
        let embedding = config_openai_embedding().map_err(SiteContextError::Config)?;
        let mut cfg = Self::with_defaults(chat, embedding);

        if let Some(path) = env_opt("DEVBAY_CONTENT_PATH") {
            cfg.content_path = PathBuf::from(path.trim());
        }
        if let Some(name) = env_opt("RELEVANCE_STRATEGY") {
            cfg.strategy = name.parse()?;
        }
        if let Some(k) = env_opt_num::<usize>("CONTEXT_TOP_K", "expected a positive integer")
            .map_err(SiteContextError::Config)?
        {
            cfg.top_k = k;
        }
        if let Some(n) = env_opt_num::<usize>("SEMANTIC_FALLBACK_LINES", "expected an integer")
            .map_err(SiteContextError::Config)?
        {
            cfg.fallback_lines = n;
        }
        if let Some(on) =
            env_opt_bool("PROMPT_GENERAL_KNOWLEDGE").map_err(SiteContextError::Config)?
        {
            cfg.template.general_knowledge_fallback = on;
        }
        cfg.template.site_name = env_or("ASSISTANT_SITE_NAME", DEFAULT_SITE_NAME)
            .trim()
            .to_string();

        Ok(cfg)
    }

    /// Rejects values no run can work with.
    ///
    /// # Errors
    /// [`SiteContextError::Config`] when `top_k` is zero.
    pub fn validate(self) -> Result<Self, SiteContextError> {
        if self.top_k == 0 {
            return Err(SiteContextError::Config(
                ConfigError::OutOfRange {
                    field: "top_k",
                    detail: "expected at least 1",
                }
                .into(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: name.into(),
            endpoint: "http://127.0.0.1:1".into(),
            api_key: Some("test-key".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SiteContextConfig::with_defaults(model("chat"), model("embed"));
        assert_eq!(cfg.content_path, PathBuf::from("api/data/devbay_content.txt"));
        assert_eq!(cfg.strategy, ScoringStrategy::Semantic);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.fallback_lines, 3);
        assert_eq!(cfg.template.site_name, "Devbay");
        assert!(cfg.template.general_knowledge_fallback);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut cfg = SiteContextConfig::with_defaults(model("chat"), model("embed"));
        cfg.top_k = 0;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SiteContextError::Config(_)));
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn api_key_stays_out_of_debug_output() {
        let cfg = SiteContextConfig::with_defaults(model("chat"), model("embed"));
        assert!(!format!("{cfg:?}").contains("test-key"));
    }
}
