//! Three-level hint generation.
//!
//! Turns a learner's code and task description into conceptual, implementation,
//! and fill-in-the-blank hints, one LLM round per level, then merges the rounds
//! into a single numbered document.
//!
//! # Architecture
//!
//! - **provider**: `LlmProvider` trait with Anthropic and OpenAI implementations
//! - **context**: Project / active-file / user-code context block
//! - **prompts**: Level-specific prompt templates
//! - **orchestrator**: Runs the levels a requested depth needs, then merges
//! - **cost**: Token usage and cost tracking

pub mod context;
pub mod cost;
pub mod orchestrator;
pub mod prompts;
pub mod provider;

pub use cost::{UsageSummary, UsageTracker};
pub use orchestrator::{HintOrchestrator, HintRequest, HintResponse, LevelResult};
pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, ProviderError, available_providers,
    create_provider, provider_from_config,
};
