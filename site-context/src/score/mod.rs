//! Relevance scoring: pick the content lines worth putting in the prompt.
//!
//! Two interchangeable strategies implement [`RelevanceScorer`]:
//! - [`LexicalScorer`]: question-word substring overlap, may report
//!   [`Context::NoRelevantData`];
//! - [`SemanticScorer`]: embedding cosine similarity, always yields lines
//!   when the corpus has any.

use std::fmt;
use std::str::FromStr;

use ai_llm_service::BoxFuture;

use crate::corpus::Corpus;
use crate::error::SiteContextError;

mod lexical;
mod semantic;

pub use lexical::{LexicalScorer, lexical_score};
pub use semantic::{COSINE_EPSILON, SemanticScorer, cosine_similarity};

/// Default number of lines kept as context.
pub const DEFAULT_TOP_K: usize = 5;
/// Lines the semantic strategy falls back to when ranking yields nothing.
pub const DEFAULT_FALLBACK_LINES: usize = 3;

/// Which scorer a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoringStrategy {
    Lexical,
    Semantic,
}

impl FromStr for ScoringStrategy {
    type Err = SiteContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" | "keyword" => Ok(Self::Lexical),
            "semantic" | "embedding" => Ok(Self::Semantic),
            other => Err(SiteContextError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
        })
    }
}

/// A corpus line with its relevance score and original position.
///
/// Lexical scores are whole match counts; semantic scores are cosine
/// similarities.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredLine<'a> {
    pub index: usize,
    pub line: &'a str,
    pub score: f32,
}

/// Lines selected for the prompt, or the explicit "nothing relevant" marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Context {
    /// Relevant lines, best first.
    Relevant(Vec<String>),
    /// No line met the relevance threshold.
    NoRelevantData,
}

impl Context {
    /// Selected lines (empty for [`Context::NoRelevantData`]).
    pub fn lines(&self) -> &[String] {
        match self {
            Context::Relevant(lines) => lines,
            Context::NoRelevantData => &[],
        }
    }

    pub fn is_no_relevant_data(&self) -> bool {
        matches!(self, Context::NoRelevantData)
    }

    /// Lines joined by `\n`, or `None` for the sentinel.
    pub fn block(&self) -> Option<String> {
        match self {
            Context::Relevant(lines) => Some(lines.join("\n")),
            Context::NoRelevantData => None,
        }
    }
}

/// Strategy interface: rank the corpus against a question and return the context.
pub trait RelevanceScorer: Send + Sync {
    fn strategy(&self) -> ScoringStrategy;

    fn select<'a>(
        &'a self,
        question: &'a str,
        corpus: &'a Corpus,
    ) -> BoxFuture<'a, Result<Context, SiteContextError>>;
}

/// Sorts by score, highest first, and keeps at most `k` lines.
///
/// The sort is stable, so equal scores keep corpus order.
pub fn rank_top_k<'a>(mut scored: Vec<ScoredLine<'a>>, k: usize) -> Vec<ScoredLine<'a>> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(k);
    scored
}
