//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize};

use super::{
    AbortSignal, ContentGenerator, DetailPrompt, GenerationError, GenerationOutcome, Prompt,
    RevisePrompt, SequencePrompt, ShortPrompt,
};
use crate::models::{DetailPlan, SequenceSkeleton, ShortVersion};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Connection settings for [`HttpGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `OPENAI_API_KEY`, `PLANPILOT_MODEL`, `PLANPILOT_API_BASE` and
    /// `PLANPILOT_TIMEOUT_SECS`. Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key);

        if let Ok(model) = std::env::var("PLANPILOT_MODEL") {
            config.model = model;
        }
        if let Ok(api_base) = std::env::var("PLANPILOT_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(raw) = std::env::var("PLANPILOT_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid PLANPILOT_TIMEOUT_SECS value '{raw}'"),
            }
        }
        Some(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// When and how long to wait before repeating a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1500),
            retryable_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `attempt + 1`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Generator backed by the remote service.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    config: GeneratorConfig,
    retry: RetryPolicy,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl HttpGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;
        Ok(Self {
            config,
            retry: RetryPolicy::default(),
            client,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn request_body<T: JsonSchema>(&self, schema_name: &str, prompt: &str) -> serde_json::Value {
        let schema = schemars::schema_for!(T);
        serde_json::json!({
            "model": &self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "schema": schema,
                    "strict": false
                }
            }
        })
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        body: &serde_json::Value,
    ) -> Result<T, GenerationError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("empty completion".into()))?;
        parse_content(&content)
    }

    async fn request<P, T>(
        &self,
        prompt: &P,
        schema_name: &str,
        signal: &AbortSignal,
    ) -> GenerationOutcome<T>
    where
        P: Prompt + Sync,
        T: DeserializeOwned + JsonSchema,
    {
        let body = self.request_body::<T>(schema_name, &prompt.render());
        debug!(
            "Requesting {} content from {} with model {}",
            P::KIND.as_str(),
            self.config.api_base,
            self.config.model
        );

        let mut attempt = 0;
        loop {
            if signal.is_aborted() {
                return GenerationOutcome::Cancelled;
            }

            let result = tokio::select! {
                _ = signal.aborted() => return GenerationOutcome::Cancelled,
                result = self.send_once::<T>(&body) => result,
            };

            match result {
                Ok(content) => {
                    info!("Received {} content", P::KIND.as_str());
                    return GenerationOutcome::Generated(content);
                }
                Err(GenerationError::Status { status, .. })
                    if self.retry.is_retryable(status) && attempt < self.retry.max_retries =>
                {
                    let delay = self.retry.delay(attempt);
                    attempt += 1;
                    warn!(
                        "Generation service returned {status}, retrying in {}ms (attempt {attempt}/{})",
                        delay.as_millis(),
                        self.retry.max_retries
                    );
                    tokio::select! {
                        _ = signal.aborted() => return GenerationOutcome::Cancelled,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return GenerationOutcome::Failed(e),
            }
        }
    }
}

/// Decodes the structured content, tolerating a surrounding code fence.
fn parse_content<T: DeserializeOwned>(content: &str) -> Result<T, GenerationError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(unfenced).map_err(|e| GenerationError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl ContentGenerator for HttpGenerator {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn short_version(
        &self,
        prompt: &ShortPrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<ShortVersion> {
        self.request(prompt, "short_version", signal).await
    }

    async fn detail_plan(
        &self,
        prompt: &DetailPrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<DetailPlan> {
        self.request(prompt, "detail_plan", signal).await
    }

    async fn sequence_skeleton(
        &self,
        prompt: &SequencePrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<SequenceSkeleton> {
        self.request(prompt, "sequence_skeleton", signal).await
    }

    async fn revise(
        &self,
        prompt: &RevisePrompt,
        signal: &AbortSignal,
    ) -> GenerationOutcome<ShortVersion> {
        self.request(prompt, "short_version", signal).await
    }
}
