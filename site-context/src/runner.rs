//! One full run: question in, answer or fixed marker out.

use std::io::Write;
use std::time::Instant;

use ai_llm_service::OpenAiService;
use tracing::{debug, error, info, warn};

use crate::api_types::QaAnswer;
use crate::cfg::SiteContextConfig;
use crate::corpus::Corpus;
use crate::error::SiteContextError;
use crate::{answer_question, build_scorer};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Answered(QaAnswer),
    Failed(SiteContextError),
}

impl RunOutcome {
    /// `0` for an answer, otherwise the failure's exit status.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Answered(_) => 0,
            RunOutcome::Failed(e) => e.exit_code(),
        }
    }
}

/// Runs the pipeline and writes exactly one thing to `out`: the answer text
/// or the marker of the stage that failed, with no trailing newline.
///
/// Stages run in order and stop at the first failure:
/// question check, config, content load, scoring, completion.
/// `load_cfg` is only called once a question is present.
pub async fn run<W, F>(question: Option<&str>, load_cfg: F, out: &mut W) -> RunOutcome
where
    W: Write,
    F: FnOnce() -> Result<SiteContextConfig, SiteContextError>,
{
    let started = Instant::now();
    match pipeline(question, load_cfg).await {
        Ok(qa) => match write_all(out, &qa.answer) {
            Ok(()) => {
                info!(
                    strategy = %qa.strategy,
                    context_lines = qa.context.lines().len(),
                    latency_ms = started.elapsed().as_millis(),
                    "answered"
                );
                RunOutcome::Answered(qa)
            }
            Err(e) => {
                error!(error = %e, "failed to write answer");
                RunOutcome::Failed(e)
            }
        },
        Err(e) => {
            error!(error = %e, "run failed");
            if let Err(w) = write_all(out, e.marker()) {
                warn!(error = %w, "failed to write error marker");
            }
            RunOutcome::Failed(e)
        }
    }
}

async fn pipeline<F>(question: Option<&str>, load_cfg: F) -> Result<QaAnswer, SiteContextError>
where
    F: FnOnce() -> Result<SiteContextConfig, SiteContextError>,
{
    // Blank counts as missing.
    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or(SiteContextError::MissingQuestion)?;

    let cfg = load_cfg()?;
    let corpus = Corpus::load(&cfg.content_path)?;
    let scorer = build_scorer(&cfg)?;
    let chat = OpenAiService::new(cfg.chat.clone()).map_err(SiteContextError::Completion)?;
    debug!(
        strategy = %cfg.strategy,
        chat_model = chat.model(),
        corpus = corpus.len(),
        "pipeline ready"
    );

    answer_question(question, &corpus, scorer.as_ref(), &cfg.template, &chat).await
}

fn write_all<W: Write>(out: &mut W, text: &str) -> Result<(), SiteContextError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(SiteContextError::Output)
}
