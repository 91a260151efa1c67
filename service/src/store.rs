use common::{Job, JobId};
use dashmap::DashMap;
use std::sync::Arc;

/// Process-lifetime job storage, safe for concurrent inserts and reads.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<DashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
        }
    }

    /// Stores a finished job. Returns false, leaving the existing record
    /// untouched, if the id is already taken.
    pub fn insert(&self, job: Job) -> bool {
        match self.jobs.entry(job.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(job);
                true
            }
        }
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &JobId) -> bool {
        self.jobs.contains_key(id)
    }

    /// Snapshot of every job, oldest first.
    pub fn all(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|entry| entry.value().clone()).collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
