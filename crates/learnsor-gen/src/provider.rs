//! LLM provider abstraction for hint generation.
//!
//! Supports Anthropic (Messages API) and OpenAI-compatible (Chat Completions) APIs.
//! Uses blocking HTTP via `ureq`: each level waits for its response before the
//! next one is requested, so there is nothing for an async runtime to overlap.

use learnsor_core::config::ProviderConfig;
use serde_json::Value;
use std::time::Duration;

/// Errors from LLM provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("empty response from LLM")]
    EmptyResponse,
    #[error("no API key found; set {0}")]
    MissingApiKey(&'static str),
    #[error("unknown provider: '{name}'. Available: {available}")]
    UnknownProvider { name: String, available: String },
}

/// One generation call: the prompt plus its output budget.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A completed LLM response.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The text content of the response.
    pub text: String,
    /// Input tokens used (from API response, if reported).
    pub input_tokens: Option<u64>,
    /// Output tokens used (from API response, if reported).
    pub output_tokens: Option<u64>,
}

/// Abstraction over LLM API providers.
///
/// Implementations must be safe to share: one handle serves every level of a
/// request, and may serve concurrent requests.
pub trait LlmProvider: Send + Sync {
    /// Send a single-prompt completion request.
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError>;

    /// The model name (for display/logging).
    fn model_name(&self) -> &str;

    /// Cost per million input tokens (USD).
    fn cost_per_mtok_input(&self) -> f64;

    /// Cost per million output tokens (USD).
    fn cost_per_mtok_output(&self) -> f64;
}

/// Per-million-token prices, matched by substring of the model name in table order.
struct ModelPrice {
    pattern: &'static str,
    input: f64,
    output: f64,
}

const fn price(pattern: &'static str, input: f64, output: f64) -> ModelPrice {
    ModelPrice {
        pattern,
        input,
        output,
    }
}

/// Resolve `(input, output)` USD per million tokens; unknown models get `fallback`.
fn price_for(model: &str, table: &[ModelPrice], fallback: (f64, f64)) -> (f64, f64) {
    table
        .iter()
        .find(|p| model.contains(p.pattern))
        .map_or(fallback, |p| (p.input, p.output))
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build(),
    )
}

/// `error.message` of an API error body, if present.
fn error_message(json: &Value) -> Option<String> {
    let err = json.get("error")?;
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| err.as_str())
        .unwrap_or("unknown error");
    Some(message.to_string())
}

/// POST a JSON body and return the decoded JSON reply.
///
/// Status codes >= 400 become [`ProviderError::Api`] carrying the body's error
/// message when the API sent one.
fn post_json(
    agent: &ureq::Agent,
    url: &str,
    headers: &[(&str, &str)],
    body: &Value,
) -> Result<Value, ProviderError> {
    let mut request = agent.post(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let mut response = request
        .send_json(body)
        .map_err(|e| ProviderError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let rejected = |json: Option<&Value>| ProviderError::Api {
        status,
        message: json
            .and_then(error_message)
            .unwrap_or_else(|| "request rejected by the API".to_string()),
    };

    match response.body_mut().read_json::<Value>() {
        Ok(json) if status < 400 => Ok(json),
        Ok(json) => Err(rejected(Some(&json))),
        Err(e) if status < 400 => Err(ProviderError::Parse(e.to_string())),
        Err(_) => Err(rejected(None)),
    }
}

/// A 2xx body can still carry an error object (Anthropic's `overloaded_error`).
fn reject_error_body(json: &Value) -> Result<(), ProviderError> {
    match error_message(json) {
        Some(message) => Err(ProviderError::Api {
            status: 200,
            message,
        }),
        None => Ok(()),
    }
}

fn usage_field(json: &Value, key: &str) -> Option<u64> {
    json.get("usage")?.get(key)?.as_u64()
}

/// Request body shared by both APIs: one user turn plus the level's budget.
fn single_turn_body(model: &str, request: &CompletionRequest<'_>) -> Value {
    serde_json::json!({
        "model": model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [{"role": "user", "content": request.prompt}]
    })
}

/// Anthropic provider using the Messages API.
#[cfg(feature = "anthropic")]
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    pricing: (f64, f64),
    agent: ureq::Agent,
}

#[cfg(feature = "anthropic")]
impl AnthropicProvider {
    /// Default model: Claude Haiku 4.5, fast and cheap.
    pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
    pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
    const API_URL: &str = "https://api.anthropic.com/v1/messages";
    const API_VERSION: &str = "2023-06-01";
    const PRICES: &[ModelPrice] = &[
        price("haiku-4-5", 1.00, 5.00),
        price("haiku", 0.80, 4.00),
        price("sonnet", 3.00, 15.00),
        price("opus", 15.00, 75.00),
    ];

    pub fn new(api_key: String, model: Option<String>, timeout: Duration) -> Self {
        let model = model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());
        Self {
            api_key,
            pricing: price_for(&model, Self::PRICES, (3.00, 15.00)),
            model,
            agent: build_agent(timeout),
        }
    }

    /// Concatenate the text blocks of a Messages API response.
    fn extract(json: &Value) -> Result<LlmResponse, ProviderError> {
        reject_error_body(json)?;

        let text: String = json
            .get("content")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(LlmResponse {
            text,
            input_tokens: usage_field(json, "input_tokens"),
            output_tokens: usage_field(json, "output_tokens"),
        })
    }
}

#[cfg(feature = "anthropic")]
impl LlmProvider for AnthropicProvider {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError> {
        let json = post_json(
            &self.agent,
            Self::API_URL,
            &[
                ("x-api-key", self.api_key.as_str()),
                ("anthropic-version", Self::API_VERSION),
            ],
            &single_turn_body(&self.model, request),
        )?;
        Self::extract(&json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn cost_per_mtok_input(&self) -> f64 {
        self.pricing.0
    }

    fn cost_per_mtok_output(&self) -> f64 {
        self.pricing.1
    }
}

/// OpenAI-compatible provider (works with OpenAI, Azure, local proxies).
#[cfg(feature = "openai")]
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    endpoint: String,
    pricing: (f64, f64),
    agent: ureq::Agent,
}

#[cfg(feature = "openai")]
impl OpenAiProvider {
    /// Default model: GPT-4o-mini, fast and cheap.
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
    const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    const PRICES: &[ModelPrice] = &[
        price("4o-mini", 0.15, 0.60),
        price("4o", 2.50, 10.00),
        price("4.1-mini", 0.40, 1.60),
        price("4.1", 2.00, 8.00),
    ];

    /// `base_url` is the API root the `/chat/completions` path is appended to.
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Self {
        let model = model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string());
        let base = base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        Self {
            api_key,
            endpoint: format!("{}/chat/completions", base.trim_end_matches('/')),
            pricing: price_for(&model, Self::PRICES, (0.50, 1.50)),
            model,
            agent: build_agent(timeout),
        }
    }

    /// Pull the first choice's message out of a Chat Completions response.
    fn extract(json: &Value) -> Result<LlmResponse, ProviderError> {
        reject_error_body(json)?;

        let text = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?
            .to_string();

        Ok(LlmResponse {
            text,
            input_tokens: usage_field(json, "prompt_tokens"),
            output_tokens: usage_field(json, "completion_tokens"),
        })
    }
}

#[cfg(feature = "openai")]
impl LlmProvider for OpenAiProvider {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError> {
        let bearer = format!("Bearer {}", self.api_key);
        let json = post_json(
            &self.agent,
            &self.endpoint,
            &[("Authorization", bearer.as_str())],
            &single_turn_body(&self.model, request),
        )?;
        Self::extract(&json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn cost_per_mtok_input(&self) -> f64 {
        self.pricing.0
    }

    fn cost_per_mtok_output(&self) -> f64 {
        self.pricing.1
    }
}

/// Create a provider from explicit settings.
pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    match provider_name {
        #[cfg(feature = "anthropic")]
        "anthropic" => Ok(Box::new(AnthropicProvider::new(
            api_key.to_string(),
            model.map(String::from),
            timeout,
        ))),
        #[cfg(feature = "openai")]
        "openai" => Ok(Box::new(OpenAiProvider::new(
            api_key.to_string(),
            model.map(String::from),
            base_url.map(String::from),
            timeout,
        ))),
        other => Err(ProviderError::UnknownProvider {
            name: other.to_string(),
            available: available_providers().join(", "),
        }),
    }
}

/// Environment variable holding the API key for a provider name.
pub fn api_key_var(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        #[cfg(feature = "anthropic")]
        "anthropic" => Some(AnthropicProvider::API_KEY_VAR),
        #[cfg(feature = "openai")]
        "openai" => Some(OpenAiProvider::API_KEY_VAR),
        _ => None,
    }
}

/// Create the configured provider, reading its API key from the environment.
pub fn provider_from_config(
    config: &ProviderConfig,
) -> Result<Box<dyn LlmProvider>, ProviderError> {
    let var = api_key_var(&config.name).ok_or_else(|| ProviderError::UnknownProvider {
        name: config.name.clone(),
        available: available_providers().join(", "),
    })?;
    let api_key = std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ProviderError::MissingApiKey(var))?;

    create_provider(
        &config.name,
        &api_key,
        config.model.as_deref(),
        config.base_url.as_deref(),
        Duration::from_secs(config.timeout_secs),
    )
}

/// List compiled-in provider names.
pub fn available_providers() -> Vec<&'static str> {
    vec![
        #[cfg(feature = "anthropic")]
        "anthropic",
        #[cfg(feature = "openai")]
        "openai",
    ]
}
