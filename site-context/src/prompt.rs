//! Prompt builder and the single completion call.

use std::time::Instant;

use ai_llm_service::ChatCompletion;
use tracing::{debug, info};

use crate::error::SiteContextError;
use crate::score::Context;

/// Returned verbatim when the model answers without any text.
pub const NO_RESPONSE: &str = "No response generated.";

/// Site name used in the assistant persona when none is configured.
pub const DEFAULT_SITE_NAME: &str = "Devbay";

/// System prompt template options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Site/brand name used in the persona and content label.
    pub site_name: String,
    /// Allow general knowledge when the content does not cover the question.
    /// `false` gives the strict variant that only ever cites the content.
    pub general_knowledge_fallback: bool,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            general_knowledge_fallback: true,
        }
    }
}

impl PromptTemplate {
    /// Builds the system prompt for `context`.
    ///
    /// # Example
    /// ```
    /// use site_context::{Context, PromptTemplate};
    /// let tpl = PromptTemplate::default();
    /// let p = tpl.compose(&Context::Relevant(vec!["Pricing starts at $5.".into()]));
    /// assert!(p.contains("Answer using ONLY this Devbay official website content:"));
    /// assert!(p.contains("\nPricing starts at $5.\n"));
    /// ```
    pub fn compose(&self, context: &Context) -> String {
        let name = &self.site_name;
        match context.block() {
            None => format!(
                "\nYou are {name} AI Assistant.\n\
                 The user's question is not related to the {name} official website content.\n\
                 Answer politely using general knowledge.\n"
            ),
            Some(block) => {
                let mut out = format!(
                    "\nYou are {name} AI Assistant.\n\
                     Answer using ONLY this {name} official website content:\n\n\
                     {block}\n\n"
                );
                if self.general_knowledge_fallback {
                    out.push_str(
                        "If the user asks something not clearly in content, \
                         answer politely using general knowledge.\n",
                    );
                }
                out
            }
        }
    }
}

/// Sends `(system_prompt, question)` as one chat request and returns the text.
///
/// An absent or empty reply becomes [`NO_RESPONSE`].
///
/// # Errors
/// [`SiteContextError::Completion`] if the provider call fails.
pub async fn complete(
    chat: &dyn ChatCompletion,
    system_prompt: &str,
    question: &str,
) -> Result<String, SiteContextError> {
    let started = Instant::now();
    debug!(
        system_len = system_prompt.len(),
        question_len = question.len(),
        "requesting completion"
    );

    let reply = chat
        .complete(system_prompt, question)
        .await
        .map_err(SiteContextError::Completion)?;

    let answer = match reply {
        Some(text) if !text.is_empty() => text,
        _ => NO_RESPONSE.to_string(),
    };

    info!(
        answer_len = answer.len(),
        latency_ms = started.elapsed().as_millis(),
        "completion received"
    );
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ai_llm_service::{AiLlmError, BoxFuture, ProviderError, ProviderErrorKind};
    use ai_llm_service::error_handler::Operation;

    use super::*;

    struct RecordingChat {
        reply: Option<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl RecordingChat {
        fn replying(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatCompletion for RecordingChat {
        fn complete<'a>(
            &'a self,
            system: &'a str,
            user: &'a str,
        ) -> BoxFuture<'a, Result<Option<String>, AiLlmError>> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }
    }

    struct DownChat;

    impl ChatCompletion for DownChat {
        fn complete<'a>(
            &'a self,
            _system: &'a str,
            _user: &'a str,
        ) -> BoxFuture<'a, Result<Option<String>, AiLlmError>> {
            Box::pin(async {
                Err(AiLlmError::from(ProviderError::new(
                    Operation::ChatCompletion,
                    ProviderErrorKind::Decode("connection reset".into()),
                )))
            })
        }
    }

    fn ctx() -> Context {
        Context::Relevant(vec![
            "Devbay support is 24/7.".into(),
            "Devbay offers web hosting.".into(),
        ])
    }

    #[test]
    fn relevant_prompt_embeds_lines_verbatim() {
        let p = PromptTemplate::default().compose(&ctx());
        assert_eq!(
            p,
            "\nYou are Devbay AI Assistant.\n\
             Answer using ONLY this Devbay official website content:\n\n\
             Devbay support is 24/7.\nDevbay offers web hosting.\n\n\
             If the user asks something not clearly in content, answer politely using general knowledge.\n"
        );
    }

    #[test]
    fn strict_prompt_has_no_general_knowledge_clause() {
        let tpl = PromptTemplate {
            general_knowledge_fallback: false,
            ..PromptTemplate::default()
        };
        let p = tpl.compose(&ctx());
        assert!(p.contains("Answer using ONLY"));
        assert!(p.contains("Devbay support is 24/7.\nDevbay offers web hosting."));
        assert!(!p.contains("general knowledge"));
    }

    #[test]
    fn no_relevant_data_prompt_says_unrelated() {
        let p = PromptTemplate::default().compose(&Context::NoRelevantData);
        assert!(p.contains("not related to the Devbay official website content"));
        assert!(p.contains("general knowledge"));
        assert!(!p.contains("ONLY"));
    }

    #[test]
    fn site_name_is_configurable() {
        let tpl = PromptTemplate {
            site_name: "Acme".into(),
            ..PromptTemplate::default()
        };
        let p = tpl.compose(&Context::NoRelevantData);
        assert!(p.contains("You are Acme AI Assistant."));
        assert!(!p.contains("Devbay"));
    }

    #[tokio::test]
    async fn complete_sends_prompt_and_raw_question() {
        let chat = RecordingChat::replying(Some("We offer hosting."));
        let answer = complete(&chat, "SYSTEM", "What is Devbay pricing?").await.unwrap();
        assert_eq!(answer, "We offer hosting.");

        let seen = chat.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ("SYSTEM".to_string(), "What is Devbay pricing?".to_string()));
    }

    #[tokio::test]
    async fn missing_or_empty_reply_is_no_response() {
        let none = complete(&RecordingChat::replying(None), "s", "q").await.unwrap();
        assert_eq!(none, NO_RESPONSE);

        let empty = complete(&RecordingChat::replying(Some("")), "s", "q").await.unwrap();
        assert_eq!(empty, NO_RESPONSE);
    }

    #[tokio::test]
    async fn provider_failure_is_completion_error() {
        let err = complete(&DownChat, "s", "q").await.unwrap_err();
        assert!(matches!(err, SiteContextError::Completion(_)));
    }
}
