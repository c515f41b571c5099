use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use super::{SummaryResponse, Summarizer};
use crate::error::{Result, TaskgenError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Per-call ceiling on the remote summarizer; an unbounded external call is
/// the largest availability risk in the run.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat-completions client for an OpenAI-compatible endpoint.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
    call_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            language: language.into(),
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn system_prompt(&self) -> String {
        format!(
            "You will receive a file path and the text of its uncommitted change. \
             Create as many tasks as needed to explain everything that changed, \
             each with a title and a description. Take the file's name and \
             extension into account. If a change is large, split it into \
             multiple tasks. Use neutral, client-friendly wording and avoid \
             negatively-toned terms. Write every title and description in {}. \
             Respond with a single JSON object of the form \
             {{\"filename\": \"<path>\", \"tasks\": [{{\"title\": \"...\", \
             \"description\": \"...\"}}]}} and nothing else.",
            self.language
        )
    }

    async fn request_completion(&self, file: &str, change_text: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("{}\n\n{}", file, change_text),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaskgenError::synthesis(
                file,
                format!("summarizer returned {}: {}", status, body),
            ));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TaskgenError::synthesis(file, "summarizer returned no choices"))
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize(&self, file: &str, change_text: &str) -> Result<SummaryResponse> {
        debug!(file = %file, model = %self.model, "Requesting task synthesis");

        let content = timeout(self.call_timeout, self.request_completion(file, change_text))
            .await
            .map_err(|_| {
                TaskgenError::synthesis(
                    file,
                    format!(
                        "summarizer call timed out after {}s",
                        self.call_timeout.as_secs()
                    ),
                )
            })?
            .map_err(|e| match e {
                e @ TaskgenError::Synthesis { .. } => e,
                other => TaskgenError::synthesis(file, other),
            })?;

        serde_json::from_str(content.trim())
            .map_err(|e| TaskgenError::synthesis(file, format!("malformed summarizer response: {}", e)))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
