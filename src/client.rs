use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::{AzureConfig, InferenceOptions};
use crate::prompt::PromptRequest;

/// Client for an Azure OpenAI chat-completions deployment.
///
/// # Example
/// ```no_run
/// use purecheck::{AzureConfig, InferenceClient};
///
/// let azure = AzureConfig::new(
///     "https://my-resource.openai.azure.com/openai/deployments/gpt-4o",
///     "api-key",
///     "2024-02-15-preview",
/// );
/// let client = InferenceClient::new(&azure);
/// assert!(client.url().ends_with("/chat/completions"));
/// ```
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: Client,
    config: AzureConfig,
}

impl InferenceClient {
    pub fn new(config: &AzureConfig) -> Self {
        let mut config = config.clone();
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Use a custom `reqwest::Client` (for proxies, TLS, connection pooling).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Full chat-completions URL, without the query string.
    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint)
    }

    /// Send the prompt and return the raw completion response.
    ///
    /// One request, no retries.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint is unreachable or the request times out
    /// - The service answers with a non-success status (auth, quota, ...)
    /// - The body is not a chat-completions response
    /// - The response holds no choices
    pub async fn complete(
        &self,
        prompt: &PromptRequest,
        options: &InferenceOptions,
    ) -> Result<InferenceResponse, InferenceError> {
        let body = json!({
            "model": self.config.deployment,
            "messages": prompt,
            "max_tokens": options.max_tokens,
        });

        let url = self.url();
        log::debug!(
            "POST {} (model={}, messages={}, max_tokens={})",
            url,
            self.config.deployment,
            prompt.messages.len(),
            options.max_tokens
        );

        let mut request = self
            .http
            .post(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(&body);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| InferenceError::Connection(self.config.endpoint.clone(), e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Http(status, text));
        }

        let response: InferenceResponse = resp
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        if response.choices.is_empty() {
            return Err(InferenceError::NoChoices);
        }
        if response.is_truncated() {
            log::warn!(
                "Reply hit the {} token limit and may be cut off",
                options.max_tokens
            );
        }
        if let Some(usage) = &response.usage {
            log::debug!(
                "Token usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        Ok(response)
    }
}

/// Chat-completions response. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl InferenceResponse {
    /// Text of the first choice, if there is one and it has content.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }

    /// Whether the first choice stopped at the token limit.
    pub fn is_truncated(&self) -> bool {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            == Some("length")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// `null` when the reply was filtered
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Errors that can occur while calling the inference endpoint.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Cannot connect to Azure OpenAI at {0}: {1}")]
    Connection(String, String),

    #[error("Azure OpenAI returned HTTP {0}: {1}")]
    Http(u16, String),

    #[error("Invalid response from Azure OpenAI: {0}")]
    InvalidResponse(String),

    #[error("Azure OpenAI returned no choices")]
    NoChoices,
}
