pub mod job;

pub use job::{Job, JobId, JobStatus, ModerationRequest, ModerationResponse,
             RetryPolicy, BackoffStrategy};

pub const MODERATION_PATH: &str = "/api/v1/moderate-content";
pub const DEFAULT_AVATAR_BASE_URL: &str = "https://avatars.example.com";
pub const DEFAULT_MODERATION_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_CONFIG_PATH: &str = "config/avatar-service.yaml";
