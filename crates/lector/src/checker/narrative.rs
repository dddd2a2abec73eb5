//! Narrative consistency review: compares a drafted chapter against the
//! accumulated story state (setting, characters, rolling summary, open plot
//! arcs).

use serde::{Deserialize, Serialize};

use crate::checker::prompts::narrative_review_prompt;
use crate::checker::{run_review, Checker, Verdict};
use crate::config::BackendProfile;
use crate::llm::{create_backend, BackendError, LlmBackend};

/// Story state a chapter is reviewed against. Every field is free text and
/// may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeContext {
    /// Worldbuilding and premise notes.
    pub novel_setting: String,
    /// Per-character status as of the previous chapter.
    pub character_state: String,
    /// Rolling summary of everything written so far.
    pub global_summary: String,
    /// Recorded unresolved conflicts and open plot threads.
    pub plot_arcs: String,
    /// The freshly drafted chapter under review.
    pub chapter_text: String,
}

/// Reviews a chapter against the story state using the backend described by
/// `profile`.
///
/// Returns the backend's judgment verbatim, or [`Verdict::NoReply`] when the
/// backend answered with an empty string. Backend failures propagate
/// unchanged; there is no retry.
pub async fn check_consistency(
    ctx: &NarrativeContext,
    profile: &BackendProfile,
) -> Result<Verdict, BackendError> {
    let backend = create_backend(profile)?;
    check_consistency_with(backend.as_ref(), ctx).await
}

/// Same review against an already-constructed backend. This is the seam for
/// hosts bringing their own [`LlmBackend`] implementation.
pub async fn check_consistency_with(
    backend: &dyn LlmBackend,
    ctx: &NarrativeContext,
) -> Result<Verdict, BackendError> {
    let prompt = narrative_review_prompt(ctx);
    run_review(backend, Checker::Narrative, &prompt).await
}
