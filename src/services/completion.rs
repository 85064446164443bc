use crate::config::ProviderSettings;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Longest provider body kept in an error for logging
const MAX_LOGGED_BODY: usize = 2048;

/// Errors that can occur when calling the completion provider
///
/// None of these carry the API key; the provider body is kept for server-side
/// diagnosis only.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("request to completion provider timed out")]
    Timeout,

    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else {
            CompletionError::Request(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion API client
///
/// Sends one system + user conversation per call to an OpenAI-compatible
/// endpoint and returns the first choice's text. The client enforces both a
/// connect and an overall request deadline.
pub struct CompletionClient {
    endpoint: String,
    api_key: String,
    model: String,
    referer: Option<String>,
    title: Option<String>,
    client: Client,
}

impl CompletionClient {
    /// Create a new completion client from provider settings
    pub fn new(settings: &ProviderSettings) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(CompletionError::Request)?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            referer: settings.referer.clone(),
            title: settings.title.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a single completion and return the assistant's text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        tracing::debug!(
            "Sending completion request to {} (model: {}, prompt: {} bytes)",
            self.endpoint,
            self.model,
            user.len()
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");

        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request.json(&request_body).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status,
                body: truncate(&body),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            CompletionError::InvalidResponse(format!("{}: {}", e, truncate(&body)))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::InvalidResponse(format!(
                    "Missing choices[0].message.content: {}",
                    truncate(&body)
                ))
            })
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_LOGGED_BODY {
        return body.to_string();
    }

    let mut end = MAX_LOGGED_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
