//! Bounded job scheduler
//!
//! Admission control for download jobs: at most `capacity` jobs are in
//! flight at once, and a submitter that hits the bound suspends until a
//! slot frees up. Admission is a counting semaphore rather than a linear
//! scan over accumulated futures, so submission cost stays proportional
//! to the in-flight set, not to the total number of jobs ever submitted.
//!
//! Jobs are expected to catch their own errors; from the scheduler's view
//! every job completes. The only failures surfaced here are pool-level
//! ones (closed semaphore, panicked worker), and those are fatal.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Scheduler errors. All variants indicate a broken worker pool and are
/// fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The admission semaphore was closed while waiting for a slot
    #[error("worker pool closed while waiting for a slot")]
    PoolClosed,

    /// A worker task panicked or was aborted
    #[error("worker task failed: {0}")]
    WorkerFailed(String),
}

/// Fixed-capacity pool of in-flight download jobs.
pub struct JobScheduler {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<()>,
    capacity: usize,
    submitted: u64,
}

impl JobScheduler {
    /// Create a scheduler that admits at most `capacity` concurrent jobs.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "scheduler capacity must be at least 1");
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            tasks: JoinSet::new(),
            capacity,
            submitted: 0,
        }
    }

    /// Configured worker capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of jobs submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Submit one job, suspending while the pool is saturated.
    ///
    /// The job runs on the worker pool as soon as a slot is available.
    /// Submission is fire-and-forget: completion is only observed through
    /// [`wait_idle`](Self::wait_idle).
    pub async fn submit<F>(&mut self, job: F) -> Result<(), SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| SchedulerError::PoolClosed)?;

        self.tasks.spawn(async move {
            job.await;
            drop(permit);
        });
        self.submitted += 1;

        // Batch-drain handles of already-finished jobs so the set tracks
        // only in-flight work.
        while let Some(result) = self.tasks.try_join_next() {
            result.map_err(|e| SchedulerError::WorkerFailed(e.to_string()))?;
        }

        debug!(
            in_flight = self.tasks.len(),
            submitted = self.submitted,
            "Job admitted"
        );
        Ok(())
    }

    /// Barrier: wait until every submitted job has completed.
    pub async fn wait_idle(&mut self) -> Result<(), SchedulerError> {
        while let Some(result) = self.tasks.join_next().await {
            result.map_err(|e| SchedulerError::WorkerFailed(e.to_string()))?;
        }
        Ok(())
    }
}
