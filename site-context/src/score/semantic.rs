//! Embedding-based scoring.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::{BoxFuture, EmbeddingsProvider};
use tracing::{debug, info};

use super::{
    Context, DEFAULT_FALLBACK_LINES, DEFAULT_TOP_K, RelevanceScorer, ScoredLine, ScoringStrategy,
    rank_top_k,
};
use crate::corpus::Corpus;
use crate::error::SiteContextError;

/// Added to the norm product so zero vectors score 0 instead of NaN.
pub const COSINE_EPSILON: f32 = 1e-10;

/// `dot(a, b) / (|a| * |b| + 1e-10)`.
///
/// Vectors of different length are compared over their common prefix.
///
/// # Example
/// ```
/// use site_context::score::cosine_similarity;
/// let s = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
/// assert!((s - 1.0).abs() < 1e-6);
/// assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    dot / (na.sqrt() * nb.sqrt() + COSINE_EPSILON)
}

/// Ranks lines by cosine similarity between their embedding and the question's.
///
/// Never reports [`Context::NoRelevantData`]: when ranking yields nothing the
/// first `fallback_lines` corpus lines are used.
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn EmbeddingsProvider>,
    top_k: usize,
    fallback_lines: usize,
}

impl SemanticScorer {
    pub fn new(embedder: Arc<dyn EmbeddingsProvider>) -> Self {
        Self {
            embedder,
            top_k: DEFAULT_TOP_K,
            fallback_lines: DEFAULT_FALLBACK_LINES,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_fallback_lines(mut self, n: usize) -> Self {
        self.fallback_lines = n;
        self
    }

    /// Embeds the corpus (one batched call) and then the question.
    ///
    /// # Errors
    /// [`SiteContextError::Embedding`] when a provider call fails and
    /// [`SiteContextError::EmbeddingCount`] when it returns the wrong number
    /// of vectors.
    async fn select_inner(
        &self,
        question: &str,
        corpus: &Corpus,
    ) -> Result<Context, SiteContextError> {
        let started = Instant::now();
        let lines = corpus.lines();

        // Nothing to embed for an empty corpus.
        let line_vecs = if lines.is_empty() {
            Vec::new()
        } else {
            self.embed_checked(lines).await?
        };

        let question_input = [question.to_string()];
        let question_vec = self
            .embed_checked(&question_input)
            .await?
            .pop()
            .unwrap_or_default();

        let scored = lines
            .iter()
            .zip(&line_vecs)
            .enumerate()
            .map(|(index, (line, vec))| ScoredLine {
                index,
                line: line.as_str(),
                score: cosine_similarity(&question_vec, vec),
            })
            .collect();

        let ranked = rank_top_k(scored, self.top_k);
        if let Some(best) = ranked.first() {
            debug!(best_index = best.index, best_score = best.score, "semantic best match");
        }

        let mut selected: Vec<String> = ranked.into_iter().map(|s| s.line.to_string()).collect();
        if selected.is_empty() {
            selected = corpus.head(self.fallback_lines).to_vec();
        }

        info!(
            corpus = corpus.len(),
            selected = selected.len(),
            latency_ms = started.elapsed().as_millis(),
            "semantic scoring done"
        );

        Ok(Context::Relevant(selected))
    }

    /// Any [`EmbeddingsProvider`] can sit behind the scorer, so the vector
    /// count is checked here before zipping with the lines.
    async fn embed_checked(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, SiteContextError> {
        let vecs = self
            .embedder
            .embed_batch(inputs)
            .await
            .map_err(SiteContextError::Embedding)?;
        if vecs.len() != inputs.len() {
            return Err(SiteContextError::EmbeddingCount {
                expected: inputs.len(),
                got: vecs.len(),
            });
        }
        Ok(vecs)
    }
}

impl RelevanceScorer for SemanticScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Semantic
    }

    fn select<'a>(
        &'a self,
        question: &'a str,
        corpus: &'a Corpus,
    ) -> BoxFuture<'a, Result<Context, SiteContextError>> {
        Box::pin(self.select_inner(question, corpus))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::{
        AiLlmError, ProviderError, ProviderErrorKind, error_handler::Operation,
    };

    use super::*;

    /// Toy embedder: one dimension per keyword.
    struct KeywordEmbedder {
        keywords: Vec<&'static str>,
        calls: Mutex<Vec<usize>>,
    }

    impl KeywordEmbedder {
        fn new(keywords: &[&'static str]) -> Self {
            Self {
                keywords: keywords.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn embed_one(&self, text: &str) -> Vec<f32> {
            let text = text.to_lowercase();
            self.keywords
                .iter()
                .map(|k| if text.contains(k) { 1.0 } else { 0.0 })
                .collect()
        }
    }

    impl EmbeddingsProvider for KeywordEmbedder {
        fn embed_batch<'a>(
            &'a self,
            inputs: &'a [String],
        ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, AiLlmError>> {
            self.calls.lock().unwrap().push(inputs.len());
            let out: Vec<Vec<f32>> = inputs.iter().map(|t| self.embed_one(t)).collect();
            Box::pin(async move { Ok(out) })
        }
    }

    struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed_batch<'a>(
            &'a self,
            _inputs: &'a [String],
        ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, AiLlmError>> {
            Box::pin(async {
                Err(AiLlmError::from(ProviderError::new(
                    Operation::Embeddings,
                    ProviderErrorKind::Decode("boom".into()),
                )))
            })
        }
    }

    struct ShortEmbedder;

    impl EmbeddingsProvider for ShortEmbedder {
        fn embed_batch<'a>(
            &'a self,
            _inputs: &'a [String],
        ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, AiLlmError>> {
            Box::pin(async { Ok(vec![vec![1.0]]) })
        }
    }

    fn devbay() -> Corpus {
        Corpus::from_text(
            "Devbay offers web hosting.\nDevbay support is 24/7.\nPricing starts at $5.",
        )
    }

    #[test]
    fn cosine_is_symmetric() {
        let u = [0.3, -1.2, 4.0, 0.5];
        let v = [1.1, 0.4, -0.7, 2.0];
        assert_eq!(cosine_similarity(&u, &v), cosine_similarity(&v, &u));
    }

    #[test]
    fn cosine_of_self_is_one() {
        for u in [[1.0, 2.0, 3.0], [0.1, 0.0, 0.0], [-5.0, 4.0, 1e3]] {
            let s = cosine_similarity(&u, &u);
            assert!((s - 1.0).abs() < 1e-5, "sim(u,u) = {s}");
        }
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[tokio::test]
    async fn best_embedding_match_comes_first() {
        let embedder = Arc::new(KeywordEmbedder::new(&["pric", "support", "host"]));
        let scorer = SemanticScorer::new(embedder.clone());

        let ctx = scorer.select("How much is the pricing?", &devbay()).await.unwrap();
        assert_eq!(ctx.lines()[0], "Pricing starts at $5.");
        assert_eq!(ctx.lines().len(), 3);

        // Corpus batch first, then the question on its own.
        assert_eq!(*embedder.calls.lock().unwrap(), vec![3, 1]);
    }

    #[tokio::test]
    async fn keeps_top_k_without_zero_filter() {
        let embedder = Arc::new(KeywordEmbedder::new(&["zebra"]));
        let corpus: Corpus = (0..8).map(|i| format!("line {i}")).collect();
        let ctx = SemanticScorer::new(embedder)
            .with_top_k(5)
            .select("zebra", &corpus)
            .await
            .unwrap();
        assert!(!ctx.is_no_relevant_data());
        assert_eq!(ctx.lines().len(), 5);
        assert_eq!(ctx.lines()[0], "line 0");
    }

    #[tokio::test]
    async fn empty_corpus_skips_corpus_embedding() {
        let embedder = Arc::new(KeywordEmbedder::new(&["x"]));
        let ctx = SemanticScorer::new(embedder.clone())
            .select("anything", &Corpus::default())
            .await
            .unwrap();
        assert_eq!(ctx, Context::Relevant(Vec::new()));
        assert_eq!(*embedder.calls.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn top_k_zero_falls_back_to_first_lines() {
        let embedder = Arc::new(KeywordEmbedder::new(&["pric"]));
        let ctx = SemanticScorer::new(embedder)
            .with_top_k(0)
            .with_fallback_lines(2)
            .select("pricing", &devbay())
            .await
            .unwrap();
        assert_eq!(
            ctx.lines(),
            ["Devbay offers web hosting.", "Devbay support is 24/7."]
        );
    }

    #[tokio::test]
    async fn provider_failure_is_embedding_error() {
        let err = SemanticScorer::new(Arc::new(FailingEmbedder))
            .select("pricing", &devbay())
            .await
            .unwrap_err();
        assert!(matches!(err, SiteContextError::Embedding(_)));
    }

    #[tokio::test]
    async fn wrong_vector_count_is_rejected() {
        let err = SemanticScorer::new(Arc::new(ShortEmbedder))
            .select("pricing", &devbay())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SiteContextError::EmbeddingCount {
                expected: 3,
                got: 1
            }
        ));
    }
}
