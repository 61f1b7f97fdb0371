//! Website-content question answering.
//!
//! Loads the site content file as a [`Corpus`], picks the lines relevant to a
//! question with a [`RelevanceScorer`] (lexical overlap or embedding
//! similarity), builds a system prompt around them and asks a chat model.
//! [`run`] drives one question end to end and writes either the answer or a
//! fixed error marker.

pub mod cfg;
mod corpus;
mod error;
mod prompt;
mod runner;
pub mod score;

mod api_types;

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::{ChatCompletion, OpenAiService};
use tracing::{debug, info};

pub use api_types::{AskOptions, QaAnswer};
pub use cfg::SiteContextConfig;
pub use corpus::Corpus;
pub use error::{MSG_CONTENT_UNAVAILABLE, MSG_GENERATION_FAILED, MSG_NO_QUESTION, SiteContextError};
pub use prompt::{NO_RESPONSE, PromptTemplate, complete};
pub use runner::{RunOutcome, run};
pub use score::{Context, LexicalScorer, RelevanceScorer, ScoringStrategy, SemanticScorer};

/// Scores `corpus` against `question`, composes the prompt and asks `chat`.
///
/// # Errors
/// Propagates scorer failures ([`SiteContextError::Embedding`],
/// [`SiteContextError::EmbeddingCount`]) and [`SiteContextError::Completion`].
pub async fn answer_question(
    question: &str,
    corpus: &Corpus,
    scorer: &dyn RelevanceScorer,
    template: &PromptTemplate,
    chat: &dyn ChatCompletion,
) -> Result<QaAnswer, SiteContextError> {
    let started = Instant::now();
    let context = scorer.select(question, corpus).await?;
    info!(
        strategy = %scorer.strategy(),
        lines = context.lines().len(),
        no_relevant_data = context.is_no_relevant_data(),
        latency_ms = started.elapsed().as_millis(),
        "context selected"
    );

    let system_prompt = template.compose(&context);
    debug!(prompt_len = system_prompt.len(), "system prompt composed");

    let answer = complete(chat, &system_prompt, question).await?;

    Ok(QaAnswer {
        answer,
        context,
        system_prompt,
        strategy: scorer.strategy(),
    })
}

/// Builds the scorer selected by `cfg.strategy`.
///
/// The semantic scorer gets its own embeddings client from `cfg.embedding`.
///
/// # Errors
/// [`SiteContextError::Embedding`] if that client cannot be constructed
/// (missing API key, bad endpoint).
pub fn build_scorer(cfg: &SiteContextConfig) -> Result<Box<dyn RelevanceScorer>, SiteContextError> {
    match cfg.strategy {
        ScoringStrategy::Lexical => Ok(Box::new(LexicalScorer::new(cfg.top_k))),
        ScoringStrategy::Semantic => {
            let embedder =
                OpenAiService::new(cfg.embedding.clone()).map_err(SiteContextError::Embedding)?;
            Ok(Box::new(
                SemanticScorer::new(Arc::new(embedder))
                    .with_top_k(cfg.top_k)
                    .with_fallback_lines(cfg.fallback_lines),
            ))
        }
    }
}
