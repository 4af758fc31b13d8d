// scorer-core/src/tasks/scheduler.rs
//!
//! In-process implementation of the deferred job scheduling collaborator.
//! One-shot jobs only: each `schedule` call spawns a sleep that delivers
//! the job into an mpsc channel once, and the dispatcher re-invokes the
//! moderation-action handler for it. No job is cancellable once issued.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, warn};
use uuid::Uuid;

use scorer_common::traits::{JobScheduler, KvStore};

use crate::services::moderation::{ModActionService, DELAYED_MOD_ACTION_JOB};
use crate::Error;

/// A job due for execution, as delivered to the dispatcher.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub job_id: Uuid,
    pub name: String,
    pub payload: serde_json::Value,
}

/// [`JobScheduler`] backed by `tokio::spawn` + `sleep`.
pub struct TokioJobScheduler {
    tx: mpsc::Sender<ScheduledJob>,
}

impl TokioJobScheduler {
    /// Returns the scheduler and the receiving end for a dispatcher.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ScheduledJob>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl JobScheduler for TokioJobScheduler {
    async fn schedule(
        &self,
        name: &str,
        run_at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Result<Uuid, Error> {
        let job_id = Uuid::new_v4();
        let job = ScheduledJob { job_id, name: name.to_string(), payload };
        let delay = (run_at - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            if tx.send(job).await.is_err() {
                error!("Job dispatcher is gone, dropping job {}", job_id);
            }
        });
        Ok(job_id)
    }
}

/// Consume due jobs and route them to their handlers. Runs until the
/// scheduler side of the channel is dropped.
pub fn spawn_job_dispatcher<K: KvStore + 'static>(
    mut rx: mpsc::Receiver<ScheduledJob>,
    mod_actions: Arc<ModActionService<K>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match job.name.as_str() {
                DELAYED_MOD_ACTION_JOB => {
                    if let Err(e) = mod_actions.process_delayed(job.payload).await {
                        error!("Delayed mod action job {} failed: {}", job.job_id, e);
                    }
                }
                other => {
                    warn!("Unknown scheduled job `{}` ({})", other, job.job_id);
                }
            }
        }
    })
}
