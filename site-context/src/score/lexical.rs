//! Keyword-overlap scoring.

use tracing::debug;

use ai_llm_service::BoxFuture;

use super::{Context, DEFAULT_TOP_K, RelevanceScorer, ScoredLine, ScoringStrategy, rank_top_k};
use crate::corpus::Corpus;
use crate::error::SiteContextError;

/// Counts question words that occur anywhere inside `line`.
///
/// Both sides are lowercased and the question is split on single spaces.
/// Punctuation is kept and words are not deduplicated, so a repeated word
/// counts once per repetition. Matching is by substring: `cat` matches
/// `category`. Empty fragments from doubled spaces are skipped.
///
/// # Example
/// ```
/// use site_context::score::lexical_score;
/// assert_eq!(lexical_score("Devbay pricing", "Pricing starts at $5."), 1);
/// assert_eq!(lexical_score("cat cat", "Category list"), 2);
/// ```
pub fn lexical_score(question: &str, line: &str) -> u32 {
    let question = question.to_lowercase();
    let line = line.to_lowercase();
    question
        .split(' ')
        .filter(|word| !word.is_empty() && line.contains(word))
        .count() as u32
}

/// Keeps the top-K lines with a positive overlap score.
#[derive(Clone, Debug)]
pub struct LexicalScorer {
    top_k: usize,
}

impl LexicalScorer {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Synchronous core of [`RelevanceScorer::select`].
    ///
    /// Returns [`Context::NoRelevantData`] when no line scores above zero.
    pub fn select_now(&self, question: &str, corpus: &Corpus) -> Context {
        let scored = corpus
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| ScoredLine {
                index,
                line: line.as_str(),
                score: lexical_score(question, line) as f32,
            })
            .collect();

        let top: Vec<String> = rank_top_k(scored, self.top_k)
            .into_iter()
            .filter(|s| s.score > 0.0)
            .map(|s| s.line.to_string())
            .collect();

        debug!(
            corpus = corpus.len(),
            selected = top.len(),
            top_k = self.top_k,
            "lexical scoring done"
        );

        if top.is_empty() {
            Context::NoRelevantData
        } else {
            Context::Relevant(top)
        }
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl RelevanceScorer for LexicalScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Lexical
    }

    fn select<'a>(
        &'a self,
        question: &'a str,
        corpus: &'a Corpus,
    ) -> BoxFuture<'a, Result<Context, SiteContextError>> {
        Box::pin(async move { Ok(self.select_now(question, corpus)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devbay() -> Corpus {
        Corpus::from_text(
            "Devbay offers web hosting.\nDevbay support is 24/7.\nPricing starts at $5.",
        )
    }

    #[test]
    fn score_counts_substring_matches() {
        assert_eq!(lexical_score("web hosting", "Devbay offers web hosting."), 2);
        assert_eq!(lexical_score("HOST", "Devbay offers web hosting."), 1);
        assert_eq!(lexical_score("email", "Devbay offers web hosting."), 0);
    }

    #[test]
    fn repeated_word_counts_each_time() {
        let line = "Devbay support is 24/7.";
        let once = lexical_score("support", line);
        let twice = lexical_score("support support", line);
        assert_eq!(twice, once + 1);
    }

    #[test]
    fn score_grows_with_matching_words() {
        let line = "Devbay offers web hosting.";
        let a = lexical_score("devbay", line);
        let b = lexical_score("devbay web", line);
        let c = lexical_score("devbay web unrelated", line);
        assert!(a <= b && b <= c);
        assert_eq!(b, c);
    }

    #[test]
    fn punctuation_is_not_stripped() {
        assert_eq!(lexical_score("pricing?", "Pricing starts at $5."), 0);
        assert_eq!(lexical_score("pricing", "Pricing starts at $5."), 1);
    }

    #[test]
    fn doubled_spaces_do_not_match_everything() {
        assert_eq!(lexical_score("zebra  zebra", "Devbay offers web hosting."), 0);
    }

    #[test]
    fn question_mark_drops_the_pricing_line() {
        let ctx = LexicalScorer::default().select_now("What is Devbay pricing?", &devbay());
        assert_eq!(
            ctx,
            Context::Relevant(vec![
                "Devbay support is 24/7.".into(),
                "Devbay offers web hosting.".into(),
            ])
        );
    }

    #[test]
    fn shared_word_selects_the_line() {
        let ctx = LexicalScorer::default().select_now("What is Devbay pricing", &devbay());
        assert!(ctx.lines().iter().any(|l| l == "Pricing starts at $5."));
        assert_eq!(ctx.lines()[0], "Devbay support is 24/7.");
    }

    #[test]
    fn unrelated_question_is_no_relevant_data() {
        let ctx = LexicalScorer::default().select_now("zebra quantum", &devbay());
        assert!(ctx.is_no_relevant_data());
    }

    #[test]
    fn empty_corpus_is_no_relevant_data() {
        let ctx = LexicalScorer::default().select_now("devbay", &Corpus::default());
        assert_eq!(ctx, Context::NoRelevantData);
    }

    #[test]
    fn at_most_top_k_lines() {
        let corpus: Corpus = (0..12).map(|i| format!("devbay line {i}")).collect();
        let ctx = LexicalScorer::new(5).select_now("devbay", &corpus);
        assert_eq!(ctx.lines().len(), 5);
        assert_eq!(ctx.lines()[0], "devbay line 0");
        assert_eq!(ctx.lines()[4], "devbay line 4");
    }

    #[tokio::test]
    async fn trait_select_matches_sync_core() {
        let scorer = LexicalScorer::default();
        let corpus = devbay();
        let via_trait = scorer.select("hosting", &corpus).await.unwrap();
        assert_eq!(via_trait, scorer.select_now("hosting", &corpus));
        assert_eq!(scorer.strategy(), ScoringStrategy::Lexical);
    }
}
