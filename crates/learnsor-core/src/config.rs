//! Configuration for hint generation and project scanning.
//!
//! Load order: `.learnsor/config.toml` → environment variables → defaults.

use crate::depth::HintDepth;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level LearnSor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnsorConfig {
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
    pub scan: ScanConfig,
}

/// Text-generation provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// `anthropic` or `openai`.
    pub name: String,
    /// Model override; each provider has its own default.
    pub model: Option<String>,
    /// API root for OpenAI-compatible endpoints, e.g. `http://localhost:11434/v1`.
    pub base_url: Option<String>,
    /// Global HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
}

/// Token and temperature budget for one generation round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelBudget {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Per-level generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Extra attempts after a failed provider call. 0 = a single call per level.
    /// At most [`GenerationConfig::MAX_RETRIES`].
    pub max_retries: usize,
    pub level1: LevelBudget,
    pub level2: LevelBudget,
    pub level3: LevelBudget,
}

/// Project and active-file scanning limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of files summarized in the project overview.
    pub max_files: usize,
    /// Non-blank lines of each file shown as a preview.
    pub preview_lines: usize,
    /// Files larger than this are skipped.
    pub max_file_bytes: u64,
    /// Glob patterns (relative to the project root) excluded from scanning.
    pub exclude: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "anthropic".to_string(),
            model: None,
            base_url: None,
            timeout_secs: 120,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            level1: LevelBudget {
                max_tokens: 1000,
                temperature: 0.7,
            },
            level2: LevelBudget {
                max_tokens: 1500,
                temperature: 0.6,
            },
            level3: LevelBudget {
                max_tokens: 2000,
                temperature: 0.5,
            },
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_files: 40,
            preview_lines: 8,
            max_file_bytes: 200_000,
            exclude: Vec::new(),
        }
    }
}

impl GenerationConfig {
    /// Upper bound for `max_retries`; backoff doubles per attempt.
    pub const MAX_RETRIES: usize = 5;

    /// Budget for generating the given level.
    pub fn budget(&self, level: HintDepth) -> LevelBudget {
        match level {
            HintDepth::Level1 => self.level1,
            HintDepth::Level2 => self.level2,
            HintDepth::Level3 => self.level3,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

fn env_override_opt(var: &str, target: &mut Option<String>) {
    if let Ok(v) = std::env::var(var)
        && !v.trim().is_empty()
    {
        *target = Some(v);
    }
}

impl LearnsorConfig {
    /// Load config from `.learnsor/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".learnsor").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("LEARNSOR_PROVIDER", &mut config.provider.name);
        env_override_opt("LEARNSOR_MODEL", &mut config.provider.model);
        env_override_opt("LEARNSOR_BASE_URL", &mut config.provider.base_url);
        env_override("LEARNSOR_TIMEOUT_SECS", &mut config.provider.timeout_secs);
        env_override("LEARNSOR_MAX_RETRIES", &mut config.generation.max_retries);
        env_override("LEARNSOR_SCAN_MAX_FILES", &mut config.scan.max_files);
        env_override(
            "LEARNSOR_SCAN_PREVIEW_LINES",
            &mut config.scan.preview_lines,
        );

        config.provider.name = config.provider.name.trim().to_lowercase();
        config.validate()?;
        Ok(config)
    }

    /// Reject budgets the providers would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        for level in HintDepth::ALL {
            let budget = self.generation.budget(level);
            if budget.max_tokens == 0 {
                anyhow::bail!("generation.{}.max_tokens must be greater than 0", level);
            }
            if !(0.0..=1.0).contains(&budget.temperature) {
                anyhow::bail!(
                    "generation.{}.temperature ({}) must be between 0 and 1",
                    level,
                    budget.temperature
                );
            }
        }
        if self.generation.max_retries > GenerationConfig::MAX_RETRIES {
            anyhow::bail!(
                "generation.max_retries ({}) must be at most {}",
                self.generation.max_retries,
                GenerationConfig::MAX_RETRIES
            );
        }
        if self.provider.timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be greater than 0");
        }
        Ok(())
    }
}
