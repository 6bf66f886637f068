//! Token usage and cost tracking across the levels of one request.

use crate::provider::{LlmProvider, LlmResponse};
use serde::Serialize;

/// Running usage tracker for one hint request.
#[derive(Debug, Default)]
pub struct UsageTracker {
    pub calls: usize,
    pub failures: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    input_rate: f64,
    output_rate: f64,
    model: String,
}

/// Final usage figures reported with a hint response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    pub model: String,
    pub calls: usize,
    pub failures: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
}

impl UsageTracker {
    pub fn new(provider: &dyn LlmProvider) -> Self {
        Self {
            input_rate: provider.cost_per_mtok_input(),
            output_rate: provider.cost_per_mtok_output(),
            model: provider.model_name().to_string(),
            ..Self::default()
        }
    }

    /// Record a successful call.
    pub fn record(&mut self, response: &LlmResponse) {
        self.calls += 1;
        if let Some(t) = response.input_tokens {
            self.total_input_tokens += t;
        }
        if let Some(t) = response.output_tokens {
            self.total_output_tokens += t;
        }
    }

    /// Record a failed call (no tokens reported).
    pub fn record_failure(&mut self) {
        self.calls += 1;
        self.failures += 1;
    }

    /// Current total cost in USD.
    pub fn total_cost_usd(&self) -> f64 {
        (self.total_input_tokens as f64 / 1_000_000.0) * self.input_rate
            + (self.total_output_tokens as f64 / 1_000_000.0) * self.output_rate
    }

    pub fn summary(&self) -> UsageSummary {
        UsageSummary {
            model: self.model.clone(),
            calls: self.calls,
            failures: self.failures,
            input_tokens: self.total_input_tokens,
            output_tokens: self.total_output_tokens,
            cost_usd: self.total_cost_usd(),
        }
    }
}

impl std::fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} call(s) to {} ({} failed), ~{} input / ~{} output tokens, ${:.4}",
            self.calls,
            self.model,
            self.failures,
            self.input_tokens,
            self.output_tokens,
            self.cost_usd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(input_rate: f64, output_rate: f64) -> UsageTracker {
        UsageTracker {
            input_rate,
            output_rate,
            model: "test-model".to_string(),
            ..UsageTracker::default()
        }
    }

    #[test]
    fn test_record_accumulates_tokens() {
        let mut t = tracker(1.0, 5.0);
        t.record(&LlmResponse {
            text: String::new(),
            input_tokens: Some(1_000_000),
            output_tokens: Some(200_000),
        });
        t.record(&LlmResponse {
            text: String::new(),
            input_tokens: None,
            output_tokens: Some(100),
        });
        assert_eq!(t.calls, 2);
        assert_eq!(t.total_input_tokens, 1_000_000);
        assert_eq!(t.total_output_tokens, 200_100);
        assert!((t.total_cost_usd() - 2.0005).abs() < 1e-9);
    }

    #[test]
    fn test_failure_counts_as_call() {
        let mut t = tracker(1.0, 1.0);
        t.record_failure();
        let summary = t.summary();
        assert_eq!(summary.calls, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.cost_usd, 0.0);
        assert!(summary.to_string().contains("test-model"));
    }
}
