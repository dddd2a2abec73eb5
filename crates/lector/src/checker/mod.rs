//! Consistency checkers for drafted chapters.
//!
//! Two independent review flows share one shape: render a fixed prompt from
//! typed context, send it through an [`LlmBackend`], fold the reply into a
//! [`Verdict`].

pub mod blueprint;
pub mod narrative;
pub mod prompts;

use tracing::{debug, warn};

use crate::llm::{BackendError, LlmBackend};

/// Fixed notice standing in for a narrative review when the backend returned
/// nothing.
pub const NARRATIVE_NO_REPLY_NOTICE: &str = "审校Agent无回复";

/// Fixed notice standing in for a blueprint review when the backend returned
/// nothing.
pub const BLUEPRINT_NO_REPLY_NOTICE: &str = "目录一致性检查Agent无回复";

/// Which review flow produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checker {
    Narrative,
    Blueprint,
}

impl Checker {
    /// The fixed notice this flow substitutes for a missing reply. The two
    /// notices are distinct so stored results stay attributable to a flow.
    pub fn no_reply_notice(&self) -> &'static str {
        match self {
            Checker::Narrative => NARRATIVE_NO_REPLY_NOTICE,
            Checker::Blueprint => BLUEPRINT_NO_REPLY_NOTICE,
        }
    }
}

/// Outcome of one review call.
///
/// `NoReply` is a degraded-but-valid outcome, not an error: the backend was
/// reachable and simply produced no text. Transport and API failures never
/// become a `Verdict`; they surface as [`BackendError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The backend's free-text judgment, byte-for-byte as returned.
    Judgment(String),
    /// The backend answered with an empty string.
    NoReply(Checker),
}

impl Verdict {
    /// The judgment text, if there was one.
    pub fn judgment(&self) -> Option<&str> {
        match self {
            Verdict::Judgment(text) => Some(text),
            Verdict::NoReply(_) => None,
        }
    }

    pub fn is_no_reply(&self) -> bool {
        matches!(self, Verdict::NoReply(_))
    }

    /// Collapses to the storable review text: the judgment itself, or the
    /// originating flow's fixed no-reply notice.
    pub fn into_text(self) -> String {
        match self {
            Verdict::Judgment(text) => text,
            Verdict::NoReply(checker) => checker.no_reply_notice().to_string(),
        }
    }
}

/// Sends one rendered prompt through the backend and folds the reply.
///
/// Only `reply.is_empty()` counts as no reply; whitespace-only replies are
/// real judgments and nothing is ever trimmed or truncated.
pub(crate) async fn run_review(
    backend: &dyn LlmBackend,
    checker: Checker,
    prompt: &str,
) -> Result<Verdict, BackendError> {
    debug!("{:?} checker prompt >>>\n{}", checker, prompt);

    let reply = backend.invoke(prompt).await?;

    if reply.is_empty() {
        warn!(
            "{:?} checker got an empty reply from the {} backend",
            checker,
            backend.name()
        );
        return Ok(Verdict::NoReply(checker));
    }

    debug!("{:?} checker reply <<<\n{}", checker, reply);
    Ok(Verdict::Judgment(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedBackend;

    #[test]
    fn test_no_reply_notices_are_flow_specific() {
        assert_eq!(Checker::Narrative.no_reply_notice(), "审校Agent无回复");
        assert_eq!(
            Checker::Blueprint.no_reply_notice(),
            "目录一致性检查Agent无回复"
        );
        assert_ne!(
            Checker::Narrative.no_reply_notice(),
            Checker::Blueprint.no_reply_notice()
        );
    }

    #[test]
    fn test_into_text_keeps_judgment_verbatim() {
        let text = "  第90章的结尾与设定冲突。\n".to_string();
        assert_eq!(Verdict::Judgment(text.clone()).into_text(), text);
    }

    #[test]
    fn test_into_text_substitutes_notice_for_no_reply() {
        assert_eq!(
            Verdict::NoReply(Checker::Narrative).into_text(),
            NARRATIVE_NO_REPLY_NOTICE
        );
        assert_eq!(
            Verdict::NoReply(Checker::Blueprint).into_text(),
            BLUEPRINT_NO_REPLY_NOTICE
        );
    }

    #[test]
    fn test_judgment_accessor_and_no_reply_flag() {
        let judged = Verdict::Judgment("无明显冲突".to_string());
        assert_eq!(judged.judgment(), Some("无明显冲突"));
        assert!(!judged.is_no_reply());

        let silent = Verdict::NoReply(Checker::Blueprint);
        assert_eq!(silent.judgment(), None);
        assert!(silent.is_no_reply());
    }

    #[tokio::test]
    async fn test_run_review_folds_empty_reply() {
        let backend = ScriptedBackend::silent();
        let verdict = run_review(&backend, Checker::Narrative, "prompt")
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::NoReply(Checker::Narrative));
    }

    #[tokio::test]
    async fn test_run_review_treats_whitespace_as_a_real_reply() {
        let backend = ScriptedBackend::replying("   \n");
        let verdict = run_review(&backend, Checker::Blueprint, "prompt")
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Judgment("   \n".to_string()));
    }
}
