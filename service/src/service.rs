use common::{Job, JobId};
use std::sync::Arc;

use crate::config::{Config, GenerationConfig};
use crate::error::{Result, ServiceError};
use crate::moderation::{HttpModerator, KeywordModerator, Moderator};
use crate::store::JobStore;
use common::RetryPolicy;

/// Accepts avatar requests, runs them through moderation, and keeps the
/// outcome for later lookup.
pub struct AvatarJobService {
    moderator: Arc<dyn Moderator>,
    generation: GenerationConfig,
    store: JobStore,
}

impl AvatarJobService {
    /// Service backed by the remote moderation API with default timeout and
    /// no retries.
    pub fn new(moderation_api_url: &str, api_token: &str) -> Result<Self> {
        let moderator = HttpModerator::new(
            moderation_api_url,
            api_token,
            std::time::Duration::from_millis(common::DEFAULT_MODERATION_TIMEOUT_MS),
            RetryPolicy::default(),
        )?;
        Ok(Self::with_moderator(Arc::new(moderator), GenerationConfig::default()))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let moderator: Arc<dyn Moderator> = if config.moderation.mock_mode {
            log::warn!("Mock moderation enabled, {} will not be called", config.moderation.api_url);
            Arc::new(KeywordModerator::new())
        } else {
            Arc::new(HttpModerator::new(
                &config.moderation.api_url,
                &config.moderation.api_token,
                config.moderation.timeout(),
                config.moderation.retry.clone(),
            )?)
        };

        Ok(Self::with_moderator(moderator, config.generation.clone()))
    }

    pub fn with_moderator(moderator: Arc<dyn Moderator>, generation: GenerationConfig) -> Self {
        Self {
            moderator,
            generation,
            store: JobStore::new(),
        }
    }

    /// Creates a job, moderates it, and returns the finished record.
    ///
    /// Only bad input is reported as an error. Once the job exists, any
    /// moderation problem is recorded on the job as `failed`.
    pub async fn submit(&self, user_id: &str, input_data: &str) -> Result<Job> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("user_id must not be empty".into()));
        }
        if input_data.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("input_data must not be empty".into()));
        }

        let mut job = Job::new(self.allocate_id(), user_id, input_data);
        log::info!("Created job {} for user {}", job.id, job.user_id);

        job.attach_output(self.mock_output_ref(&job.id))?;

        match self.moderator.moderate(&job.input_data, &job.user_id).await {
            Ok(verdict) if verdict.approved => job.complete()?,
            Ok(verdict) => job.reject(verdict.reason)?,
            Err(e) => {
                log::error!("Moderation failed for job {}: {}", job.id, e);
                job.fail(e.to_string())?;
            }
        }
        log::info!("Job {} finished as {}", job.id, job.status);

        if !self.store.insert(job.clone()) {
            return Err(anyhow::anyhow!("job id {} collided with an existing job", job.id).into());
        }
        Ok(job)
    }

    pub fn get_status(&self, job_id: &JobId) -> Result<Job> {
        self.store
            .get(job_id)
            .ok_or_else(|| ServiceError::NotFound(job_id.clone()))
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.store.all()
    }

    pub fn job_count(&self) -> usize {
        self.store.len()
    }

    fn allocate_id(&self) -> JobId {
        loop {
            let id = JobId::generate();
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    /// Stand-in for avatar generation: a fixed URL keyed by job id.
    fn mock_output_ref(&self, id: &JobId) -> String {
        format!("{}/{}.png", self.generation.avatar_base_url.trim_end_matches('/'), id)
    }
}
