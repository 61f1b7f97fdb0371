use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use ai_llm_service::telemetry;
use clap::Parser;
use site_context::{AskOptions, ScoringStrategy, SiteContextConfig, SiteContextError, run};
use tracing::warn;

/// Answer one question about the Devbay website content.
///
/// Prints the answer (or a fixed error marker) to stdout; diagnostics go to
/// stderr and are filtered by `RUST_LOG`.
#[derive(Debug, Parser)]
#[command(name = "devbay-assistant", version, about)]
struct Cli {
    /// Question to answer. Missing or blank prints the "no question" marker.
    #[arg(allow_hyphen_values = true)]
    question: Option<String>,

    /// Words after the question when it arrives unquoted; ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<String>,

    /// Content file (overrides `DEVBAY_CONTENT_PATH`).
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    /// `lexical` or `semantic` (overrides `RELEVANCE_STRATEGY`).
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<String>,

    /// Answer from the content only, without the general-knowledge clause.
    #[arg(long)]
    strict: bool,

    /// Number of content lines to put in the prompt (overrides `CONTEXT_TOP_K`).
    #[arg(long, value_name = "N")]
    top_k: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env is fine; anything else is worth a warning.
    let dotenv = dotenvy::dotenv();
    telemetry::init("warn");
    match dotenv {
        Err(e) if !e.not_found() => warn!(error = %e, "failed to load .env"),
        _ => {}
    }

    let Cli {
        question,
        content,
        strategy,
        strict,
        top_k,
        _rest: _,
    } = Cli::parse();

    let load_cfg = move || -> Result<SiteContextConfig, SiteContextError> {
        let strategy = strategy.as_deref().map(str::parse::<ScoringStrategy>).transpose()?;
        let opts = AskOptions {
            content_path: content,
            strategy,
            strict,
            top_k,
        };
        opts.apply(SiteContextConfig::from_env()?).validate()
    };

    let mut stdout = io::stdout().lock();
    let outcome = run(question.as_deref(), load_cfg, &mut stdout).await;
    ExitCode::from(outcome.exit_code())
}
