//! Cron scheduler for background maintenance
//!
//! Wraps `tokio-cron-scheduler`. Cron expressions use six fields
//! (`sec min hour day month weekday`) and are validated with `cron` before a
//! job is registered.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Instant,
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Default cleanup schedule: every 30 minutes
pub const DEFAULT_CLEANUP_CRON: &str = "0 */30 * * * *";

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// A task with this name is already registered
    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    /// Task not found
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Run counters for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    pub name: String,
    pub cron_expression: String,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct TaskMetadata {
    cron_expression: String,
    job_id: Uuid,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
}

impl TaskMetadata {
    fn new(cron_expression: &str, job_id: Uuid) -> Self {
        Self {
            cron_expression: cron_expression.to_string(),
            job_id,
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    fn record(&self, result: Result<(), String>) {
        *self.last_run.write() = Some(Utc::now());
        match result {
            Ok(()) => {
                self.success_count.fetch_add(1, Ordering::Relaxed);
            },
            Err(e) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                *self.last_error.write() = Some(e);
            },
        }
    }

    fn to_stats(&self, name: &str) -> TaskStats {
        TaskStats {
            name: name.to_string(),
            cron_expression: self.cron_expression.clone(),
            success_count: self.success_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            last_run: *self.last_run.read(),
            last_error: self.last_error.read().clone(),
        }
    }
}

type TaskTable = Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>;

/// Cron scheduler for maintenance tasks
pub struct MaintenanceScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: TaskTable,
    running: AtomicBool,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl MaintenanceScheduler {
    /// Create a stopped scheduler
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying job scheduler cannot be created.
    pub async fn new() -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: AtomicBool::new(false),
        })
    }

    /// Start firing registered jobs
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already running");
            return Ok(());
        }

        self.scheduler.lock().await.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!(tasks = self.task_count(), "Maintenance scheduler started");
        Ok(())
    }

    /// Stop the scheduler; it cannot be restarted afterwards
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        if !self.running.load(Ordering::Relaxed) {
            debug!("Scheduler not running");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Maintenance scheduler stopped");
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Register `task` under `name` on `cron_expression`
    ///
    /// Task errors are logged and counted; they never stop the schedule.
    #[instrument(skip(self, task))]
    pub async fn add_task<F, Fut>(
        &self,
        name: &str,
        cron_expression: &str,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        cron_expression.parse::<cron::Schedule>().map_err(|e| {
            SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}"))
        })?;
        if self.tasks.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let task_name = name.to_string();
        let tasks = Arc::clone(&self.tasks);

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let name = task_name.clone();
            let tasks = Arc::clone(&tasks);
            let run = task();

            Box::pin(async move {
                debug!(task = %name, "Starting scheduled task");
                let start = Instant::now();
                let result = run.await;
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(()) => info!(task = %name, duration_ms, "Task completed"),
                    Err(e) => error!(task = %name, error = %e, duration_ms, "Task failed"),
                }

                let metadata = tasks.read().get(&name).cloned();
                if let Some(metadata) = metadata {
                    metadata.record(result);
                }
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        let job_id = job.guid();
        self.tasks.write().insert(
            name.to_string(),
            Arc::new(TaskMetadata::new(cron_expression, job_id)),
        );
        if let Err(e) = self.scheduler.lock().await.add(job).await {
            self.tasks.write().remove(name);
            return Err(e.into());
        }

        info!(task = %name, cron = %cron_expression, "Task scheduled");
        Ok(())
    }

    /// Unregister a task
    #[instrument(skip(self))]
    pub async fn remove_task(&self, name: &str) -> Result<(), SchedulerError> {
        let metadata = self
            .tasks
            .write()
            .remove(name)
            .ok_or_else(|| SchedulerError::TaskNotFound(name.to_string()))?;

        self.scheduler.lock().await.remove(&metadata.job_id).await?;
        info!(task = %name, "Task removed");
        Ok(())
    }

    #[must_use]
    pub fn task_stats(&self, name: &str) -> Option<TaskStats> {
        self.tasks.read().get(name).map(|m| m.to_stats(name))
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }
}
