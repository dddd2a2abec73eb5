//! lector: consistency review for machine-drafted long-form fiction.
//!
//! A drafted chapter can contradict the story so far (narrative drift) or
//! spend material the outline reserved for a later chapter (plan violation).
//! lector renders each concern into a fixed review prompt, sends it through
//! a pluggable LLM backend, and folds the reply into a [`Verdict`].
//!
//! Two flows, independently callable:
//! - [`check_consistency`]: chapter vs. setting, character state, rolling
//!   summary and open plot arcs.
//! - [`check_blueprint_consistency`]: chapter vs. its own and the next
//!   chapter's outline entry.
//!
//! Backends are selected by [`InterfaceFormat`] (OpenAI-compatible, Ollama,
//! Anthropic) and built by [`create_backend`]; hosts with their own
//! transport implement [`LlmBackend`] and use the `*_with` flow variants.
//!
//! Review prompts and raw replies are logged at debug level through
//! `tracing`; install a subscriber in the host to see or redirect them.

pub mod checker;
pub mod config;
pub mod llm;

pub use checker::blueprint::{
    check_blueprint_consistency, check_blueprint_consistency_with, resolve_next_outline,
    OutlineEntry,
};
pub use checker::narrative::{check_consistency, check_consistency_with, NarrativeContext};
pub use checker::prompts::{
    blueprint_review_prompt, narrative_review_prompt, MISSING_OUTLINE_PLACEHOLDER,
    NO_CONFLICT_PHRASE, NO_EARLY_CONTENT_PHRASE,
};
pub use checker::{Checker, Verdict, BLUEPRINT_NO_REPLY_NOTICE, NARRATIVE_NO_REPLY_NOTICE};
pub use config::{BackendProfile, ConfigError, InterfaceFormat};
pub use llm::{
    create_backend, AnthropicBackend, BackendError, LlmBackend, OllamaBackend, OpenAiBackend,
};
