//! Level orchestration: generate the rounds a depth needs, then merge them.
//!
//! Level 1 always runs; Level 2 runs for `level2` and `level3`; Level 3 only for
//! `level3`. A failed round never aborts the request. Its error message stands in
//! as that level's text and later rounds still run on top of it.

use crate::context::{active_file_context, assemble_context, project_context};
use crate::cost::{UsageSummary, UsageTracker};
use crate::prompts::{PromptInputs, level1_prompt, level2_prompt, level3_prompt};
use crate::provider::{CompletionRequest, LlmProvider, LlmResponse, ProviderError};
use learnsor_core::config::{GenerationConfig, ScanConfig};
use learnsor_core::document::{HintItem, collect_items};
use learnsor_core::markers::{strip_markers, wrap_markers};
use learnsor_core::{FieldKind, FieldMap, HintDepth, Language, merge_levels, parse_level};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a learner supplies for one hint request.
#[derive(Debug, Clone, Default)]
pub struct HintRequest {
    pub user_code: String,
    pub task: String,
    /// Explicit language identifier; wins over any filename.
    pub language: Option<String>,
    /// Filename used to detect the language.
    pub filename: Option<String>,
    /// Project root to summarize into the context.
    pub project_path: Option<PathBuf>,
    pub instructions: Option<String>,
    /// File the learner is editing, summarized into the context.
    pub active_file: Option<PathBuf>,
    pub depth: HintDepth,
}

/// Raw output of one generation round.
#[derive(Debug, Clone, Serialize)]
pub struct LevelResult {
    /// Which round produced this text.
    pub level: HintDepth,
    /// Generated text, or the error message if the call failed.
    pub text: String,
    pub language: Language,
    /// Depth the request asked for.
    pub requested: HintDepth,
    pub failed: bool,
}

/// Result of a hint request: every computed level plus the merged document.
#[derive(Debug, Clone, Serialize)]
pub struct HintResponse {
    pub language: Language,
    pub depth: HintDepth,
    pub levels: Vec<LevelResult>,
    /// Marker-free merged document.
    pub merged: String,
    pub items: Vec<HintItem>,
    pub usage: UsageSummary,
}

impl HintResponse {
    pub fn level(&self, level: HintDepth) -> Option<&LevelResult> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// The merged document wrapped in exactly one comment-marker pair.
    pub fn wrapped(&self) -> String {
        wrap_markers(&self.merged, &self.language.comment_syntax())
    }
}

/// Runs hint requests against an injected provider.
pub struct HintOrchestrator<'a> {
    provider: &'a dyn LlmProvider,
    generation: &'a GenerationConfig,
    scan: &'a ScanConfig,
}

impl<'a> HintOrchestrator<'a> {
    pub fn new(
        provider: &'a dyn LlmProvider,
        generation: &'a GenerationConfig,
        scan: &'a ScanConfig,
    ) -> Self {
        Self {
            provider,
            generation,
            scan,
        }
    }

    /// Resolve the language and build the shared context block.
    fn prepare(&self, request: &HintRequest) -> (Language, String) {
        let active_name = request
            .active_file
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        let language = Language::resolve(
            request.language.as_deref(),
            request.filename.as_deref(),
            active_name.as_deref(),
        );

        let project = request
            .project_path
            .as_deref()
            .map(|root| project_context(root, self.scan));
        let active = request
            .active_file
            .as_deref()
            .map(|path| active_file_context(path, self.scan));
        let context =
            assemble_context(project.as_deref(), active.as_deref(), &request.user_code);

        (language, context)
    }

    /// Generate hints up to the requested depth. Never fails: provider and scan
    /// errors come back as text inside the response.
    pub fn generate(&self, request: &HintRequest) -> HintResponse {
        let depth = request.depth;
        let (language, context) = self.prepare(request);
        let syntax = language.comment_syntax();
        let inputs = PromptInputs {
            context: &context,
            task: &request.task,
            language: &language,
            instructions: request.instructions.as_deref(),
        };
        let mut tracker = UsageTracker::new(self.provider);

        tracing::info!(
            "generating {} hints for {} with {}",
            depth,
            language,
            self.provider.model_name()
        );

        let mut levels = Vec::new();
        let level1 = self.run_level(HintDepth::Level1, &level1_prompt(&inputs), &mut tracker);
        levels.push(level_result(HintDepth::Level1, level1, &language, depth));

        if depth.includes(HintDepth::Level2) {
            let prompt = level2_prompt(&inputs, &levels[0].text);
            let level2 = self.run_level(HintDepth::Level2, &prompt, &mut tracker);
            levels.push(level_result(HintDepth::Level2, level2, &language, depth));
        }

        if depth.includes(HintDepth::Level3) {
            let prompt = level3_prompt(&inputs, &levels[0].text, &levels[1].text);
            let level3 = self.run_level(HintDepth::Level3, &prompt, &mut tracker);
            levels.push(level_result(HintDepth::Level3, level3, &language, depth));
        }

        let parse = |level: HintDepth, kind: FieldKind| -> Option<FieldMap> {
            levels
                .iter()
                .find(|l| l.level == level)
                .map(|l| parse_level(&strip_markers(&l.text, &syntax), kind, &syntax))
        };
        let how = parse(HintDepth::Level2, FieldKind::How).unwrap_or_default();
        let code = parse(HintDepth::Level3, FieldKind::Code);

        let merged = merge_levels(&levels[0].text, &how, code.as_ref(), &syntax);
        let items = collect_items(&levels[0].text, &how, code.as_ref(), &syntax);

        HintResponse {
            language,
            depth,
            levels,
            merged,
            items,
            usage: tracker.summary(),
        }
    }

    /// One generation round. `Err` carries the human-readable failure text.
    fn run_level(
        &self,
        level: HintDepth,
        prompt: &str,
        tracker: &mut UsageTracker,
    ) -> Result<String, String> {
        let budget = self.generation.budget(level);
        let request = CompletionRequest {
            prompt,
            max_tokens: budget.max_tokens,
            temperature: budget.temperature,
        };
        tracing::debug!(
            "level {} prompt: {} chars, max_tokens={}, temperature={}",
            level.number(),
            prompt.len(),
            budget.max_tokens,
            budget.temperature
        );

        let retries = self.generation.max_retries.min(GenerationConfig::MAX_RETRIES);
        match call_with_retry(self.provider, &request, retries) {
            Ok(response) => {
                tracker.record(&response);
                Ok(response.text)
            }
            Err(e) => {
                tracker.record_failure();
                tracing::warn!("level {} generation failed: {}", level.number(), e);
                Err(format!(
                    "Error generating level {} hints: {}",
                    level.number(),
                    e
                ))
            }
        }
    }
}

fn level_result(
    level: HintDepth,
    outcome: Result<String, String>,
    language: &Language,
    requested: HintDepth,
) -> LevelResult {
    let failed = outcome.is_err();
    LevelResult {
        level,
        text: outcome.unwrap_or_else(|message| message),
        language: language.clone(),
        requested,
        failed,
    }
}

/// Longest pause between two attempts at the same level.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pause before retry number `retry` (0-based): 1s, 2s, 4s, ... capped at [`MAX_BACKOFF`].
fn backoff(retry: usize) -> Duration {
    let exponent = u32::try_from(retry).unwrap_or(u32::MAX);
    Duration::from_secs(2u64.saturating_pow(exponent)).min(MAX_BACKOFF)
}

/// One provider call plus up to `max_retries` retries. Returns the last error.
fn call_with_retry(
    provider: &dyn LlmProvider,
    request: &CompletionRequest<'_>,
    max_retries: usize,
) -> Result<LlmResponse, ProviderError> {
    let mut retry = 0;
    loop {
        match provider.complete(request) {
            Ok(response) => return Ok(response),
            Err(e) if retry < max_retries => {
                let pause = backoff(retry);
                tracing::warn!(
                    "{} call failed ({}), retrying in {}s",
                    provider.model_name(),
                    e,
                    pause.as_secs()
                );
                std::thread::sleep(pause);
                retry += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff(0), Duration::from_secs(1));
        assert_eq!(backoff(2), Duration::from_secs(4));
        assert_eq!(backoff(5), MAX_BACKOFF);
        assert_eq!(backoff(200), MAX_BACKOFF);
    }
}
