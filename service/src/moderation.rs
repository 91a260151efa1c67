use async_trait::async_trait;
use common::{ModerationRequest, ModerationResponse, RetryPolicy};
use std::time::Duration;

use crate::error::{ModerationError, Result, ServiceError};
use crate::retry::with_retry;

/// Decides whether generated avatar content may be published.
#[async_trait]
pub trait Moderator: Send + Sync {
    async fn moderate(
        &self,
        content: &str,
        user_id: &str,
    ) -> std::result::Result<ModerationResponse, ModerationError>;
}

/// Client for the remote content moderation API.
pub struct HttpModerator {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
    retry: RetryPolicy,
}

impl HttpModerator {
    pub fn new(api_url: &str, api_token: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        if api_url.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("moderation API URL is required".into()));
        }
        if api_token.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("moderation API token is required".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), common::MODERATION_PATH),
            api_token: api_token.to_string(),
            retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        request: &ModerationRequest,
    ) -> std::result::Result<ModerationResponse, ModerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModerationError::Status {
                status: status.as_u16(),
                body: snippet(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ModerationError::Malformed(e.to_string()))
    }
}

/// Error bodies are kept on failed jobs for the life of the process.
const MAX_ERROR_BODY_CHARS: usize = 256;

fn snippet(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl Moderator for HttpModerator {
    async fn moderate(
        &self,
        content: &str,
        user_id: &str,
    ) -> std::result::Result<ModerationResponse, ModerationError> {
        let request = ModerationRequest {
            content: content.to_string(),
            user_id: user_id.to_string(),
        };
        log::debug!("Sending moderation request for user {} to {}", user_id, self.endpoint);

        let request = &request;
        let this = self;
        with_retry(&self.retry, move || this.send(request)).await
    }
}

const INAPPROPRIATE_KEYWORDS: &[&str] = &[
    "violent", "violence", "weapon", "weapons", "gun", "knife", "sword",
    "blood", "bloody", "gore", "death", "kill", "murder",
    "hate", "nazi", "racist", "terror", "bomb",
    "nude", "naked", "sexual", "porn", "explicit",
    "drug", "cocaine", "marijuana", "alcohol",
];

const MAX_CONTENT_CHARS: usize = 1000;

/// Offline moderator that flags prompts by keyword. Used when the real
/// moderation endpoint is unavailable.
#[derive(Debug, Default)]
pub struct KeywordModerator;

impl KeywordModerator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, content: &str) -> ModerationResponse {
        if content.trim().is_empty() {
            return rejected("Content cannot be empty".to_string());
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return rejected("Content exceeds maximum length limit".to_string());
        }

        let lowered = content.to_lowercase();
        let found: Vec<&str> = INAPPROPRIATE_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| lowered.contains(keyword))
            .take(3)
            .collect();

        if found.is_empty() {
            ModerationResponse {
                approved: true,
                reason: Some("Content appears safe and appropriate".to_string()),
            }
        } else {
            rejected(format!("Content contains inappropriate material: {}", found.join(", ")))
        }
    }
}

fn rejected(reason: String) -> ModerationResponse {
    ModerationResponse {
        approved: false,
        reason: Some(reason),
    }
}

#[async_trait]
impl Moderator for KeywordModerator {
    async fn moderate(
        &self,
        content: &str,
        _user_id: &str,
    ) -> std::result::Result<ModerationResponse, ModerationError> {
        Ok(self.evaluate(content))
    }
}
