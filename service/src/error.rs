use common::JobId;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no such job: {0}")]
    NotFound(JobId),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = result::Result<T, ServiceError>;

/// Anything that went wrong talking to the moderation endpoint. Never
/// returned from `submit`; its text ends up in the job's error message.
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("moderation request timed out")]
    Timeout,
    #[error("moderation request failed: {0}")]
    Transport(String),
    #[error("moderation API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response format from moderation API: {0}")]
    Malformed(String),
}

impl ModerationError {
    /// Timeouts, connection problems and 5xx answers are worth another try.
    pub fn is_transient(&self) -> bool {
        match self {
            ModerationError::Timeout | ModerationError::Transport(_) => true,
            ModerationError::Status { status, .. } => *status >= 500,
            ModerationError::Malformed(_) => false,
        }
    }
}

impl From<reqwest::Error> for ModerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModerationError::Timeout
        } else if e.is_decode() {
            ModerationError::Malformed(e.to_string())
        } else {
            ModerationError::Transport(e.to_string())
        }
    }
}
