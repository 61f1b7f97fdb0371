//! Public API types re-used by the binary.

use std::path::PathBuf;

use crate::cfg::SiteContextConfig;
use crate::score::{Context, ScoringStrategy};

/// Per-run overrides layered on top of the env-driven config.
///
/// `None` (or `false` for `strict`) keeps the value from env.
///
/// # Example
/// ```
/// use site_context::{AskOptions, ScoringStrategy};
/// let opts = AskOptions { strategy: Some(ScoringStrategy::Lexical), ..Default::default() };
/// assert!(opts.top_k.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    pub content_path: Option<PathBuf>,
    pub strategy: Option<ScoringStrategy>,
    /// Drop the general-knowledge clause from the relevant-content prompt.
    pub strict: bool,
    pub top_k: Option<usize>,
}

impl AskOptions {
    /// Applies the overrides to `cfg`.
    pub fn apply(self, mut cfg: SiteContextConfig) -> SiteContextConfig {
        if let Some(path) = self.content_path {
            cfg.content_path = path;
        }
        if let Some(strategy) = self.strategy {
            cfg.strategy = strategy;
        }
        if self.strict {
            cfg.template.general_knowledge_fallback = false;
        }
        if let Some(k) = self.top_k {
            cfg.top_k = k;
        }
        cfg
    }
}

/// Final answer together with the exact context passed to the model.
#[derive(Clone, Debug, PartialEq)]
pub struct QaAnswer {
    /// Text written to stdout.
    pub answer: String,
    pub context: Context,
    pub system_prompt: String,
    pub strategy: ScoringStrategy,
}
