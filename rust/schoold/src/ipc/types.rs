use std::path::PathBuf;

use serde::Deserialize;

use super::outbox::Outbox;
use super::workers::WorkerPool;
use crate::auth::SecretHasher;
use crate::db::Db;
use crate::error::ServiceError;
use crate::palette::Palette;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// What a handler did with a request: answered it, or handed it to a worker
/// that writes its own response.
pub enum Reply {
    Ready(serde_json::Value),
    Deferred,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Db>,
    pub palette: Palette,
    pub hasher: SecretHasher,
    pub outbox: Outbox,
    workers: WorkerPool,
}

impl AppState {
    pub fn new(palette: Palette, hasher: SecretHasher, outbox: Outbox, workers: usize) -> Self {
        Self {
            workspace: None,
            db: None,
            palette,
            hasher,
            workers: WorkerPool::new(workers, outbox.clone()),
            outbox,
        }
    }

    pub fn db(&self) -> Result<&Db, ServiceError> {
        self.db.as_ref().ok_or(ServiceError::NoWorkspace)
    }

    /// Queues `job` for the credential workers. It gets the response writer
    /// and answers for itself.
    pub fn submit_job<F>(&mut self, job: F)
    where
        F: FnOnce(&Outbox) + Send + 'static,
    {
        self.workers.submit(Box::new(job));
    }

    pub fn worker_count(&self) -> usize {
        self.workers.size()
    }

    /// Waits for every queued and in-flight job; called once stdin is closed.
    pub fn join_workers(&mut self) {
        self.workers.shutdown();
    }
}
