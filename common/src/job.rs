use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Rejected,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Rejected => "rejected",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single avatar request and its recorded outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub user_id: String,
    pub status: JobStatus,
    pub input_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Job {
    pub fn new(id: JobId, user_id: impl Into<String>, input_data: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            status: JobStatus::Pending,
            input_data: input_data.into(),
            output_ref: None,
            created_at: Utc::now(),
            error_message: None,
        }
    }

    /// Records the generated output. Only allowed once, while pending.
    pub fn attach_output(&mut self, output_ref: String) -> Result<()> {
        ensure!(
            self.status == JobStatus::Pending,
            "job {} is {}, output can only be attached while pending",
            self.id,
            self.status
        );
        ensure!(self.output_ref.is_none(), "job {} already has an output", self.id);
        self.output_ref = Some(output_ref);
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        self.leave_pending(JobStatus::Completed)?;
        self.error_message = None;
        Ok(())
    }

    pub fn reject(&mut self, reason: Option<String>) -> Result<()> {
        self.leave_pending(JobStatus::Rejected)?;
        self.error_message = reason;
        Ok(())
    }

    /// Failed jobs never expose an output reference.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.leave_pending(JobStatus::Failed)?;
        self.output_ref = None;
        self.error_message = Some(message.into());
        Ok(())
    }

    fn leave_pending(&mut self, next: JobStatus) -> Result<()> {
        ensure!(
            !self.status.is_terminal(),
            "invalid transition for job {}: {} -> {}",
            self.id,
            self.status,
            next
        );
        self.status = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerationRequest {
    pub content: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerationResponse {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    #[default]
    Exponential,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub backoff: BackoffStrategy,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_initial_delay_ms() -> u64 { 500 }
fn default_max_delay_ms() -> u64 { 5000 }

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::default(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}
