//! Blueprint consistency review: compares a drafted chapter against its own
//! outline entry and checks whether next-chapter material leaked in early.

use serde::{Deserialize, Serialize};

use crate::checker::prompts::{blueprint_review_prompt, MISSING_OUTLINE_PLACEHOLDER};
use crate::checker::{run_review, Checker, Verdict};
use crate::config::BackendProfile;
use crate::llm::{create_backend, BackendError, LlmBackend};

/// One chapter's row in the authoring outline.
///
/// Deserializes from the planning tool's JSON mappings; absent keys default
/// per field (number 0, text empty) and are never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineEntry {
    pub chapter_number: u32,
    pub chapter_title: String,
    /// Where the chapter sits in the arc, e.g. setup or payoff.
    pub chapter_role: String,
    /// What the chapter must accomplish.
    pub chapter_purpose: String,
    pub chapter_summary: String,
}

/// Resolves the next-chapter entry the review prompt will describe.
///
/// An entry with an empty title counts as missing (the outline usually runs
/// out right after the chapter being drafted). In that case the entire field
/// set is synthesized: the number follows the current chapter and every text
/// field carries the fixed placeholder. A non-empty title keeps the entry
/// verbatim; whitespace-only titles count as present.
pub fn resolve_next_outline(current: &OutlineEntry, next: &OutlineEntry) -> OutlineEntry {
    if !next.chapter_title.is_empty() {
        return next.clone();
    }

    OutlineEntry {
        chapter_number: current.chapter_number.saturating_add(1),
        chapter_title: MISSING_OUTLINE_PLACEHOLDER.to_string(),
        chapter_role: MISSING_OUTLINE_PLACEHOLDER.to_string(),
        chapter_purpose: MISSING_OUTLINE_PLACEHOLDER.to_string(),
        chapter_summary: MISSING_OUTLINE_PLACEHOLDER.to_string(),
    }
}

/// Reviews a chapter against the outline using the backend described by
/// `profile`.
///
/// `next` may be [`OutlineEntry::default`] when the outline has no further
/// rows; the prompt then describes a synthesized placeholder entry. Result
/// semantics match [`check_consistency`](crate::check_consistency), with
/// this flow's own no-reply notice.
pub async fn check_blueprint_consistency(
    current: &OutlineEntry,
    next: &OutlineEntry,
    chapter_text: &str,
    profile: &BackendProfile,
) -> Result<Verdict, BackendError> {
    let backend = create_backend(profile)?;
    check_blueprint_consistency_with(backend.as_ref(), current, next, chapter_text).await
}

/// Same review against an already-constructed backend.
pub async fn check_blueprint_consistency_with(
    backend: &dyn LlmBackend,
    current: &OutlineEntry,
    next: &OutlineEntry,
    chapter_text: &str,
) -> Result<Verdict, BackendError> {
    let prompt = blueprint_review_prompt(current, next, chapter_text);
    run_review(backend, Checker::Blueprint, &prompt).await
}
