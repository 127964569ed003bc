use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::core::calculate_avalanche;
use crate::registry::DebtRegistry;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Job {
    RecomputePayoffPlan,
}

impl Job {
    pub fn name(self) -> &'static str {
        match self {
            Job::RecomputePayoffPlan => "recompute_payoff_plan",
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handle for work that runs after a response has been sent. Jobs are
/// idempotent; a failed job is logged and counted, never retried.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<Job>,
    failures: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,
}

impl JobQueue {
    pub fn start(registry: DebtRegistry, extra_payment: f64) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let failures = Arc::new(AtomicU64::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let worker = tokio::spawn(run_worker(
            receiver,
            registry,
            extra_payment,
            Arc::clone(&failures),
            Arc::clone(&completed),
        ));
        (
            Self {
                sender,
                failures,
                completed,
            },
            worker,
        )
    }

    pub fn submit(&self, job: Job) {
        if let Err(err) = self.sender.send(job) {
            error!(job = err.0.name(), "job queue is closed; job dropped");
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn completed_count(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<Job>,
    registry: DebtRegistry,
    extra_payment: f64,
    failures: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,
) {
    while let Some(job) = receiver.recv().await {
        match execute(job, &registry, extra_payment).await {
            Ok(()) => {
                completed.fetch_add(1, Ordering::Relaxed);
                debug!(job = job.name(), "background job finished");
            }
            Err(err) => {
                failures.fetch_add(1, Ordering::Relaxed);
                warn!(job = job.name(), error = %err, "background job failed");
            }
        }
    }
    debug!("job queue drained; worker exiting");
}

async fn execute(job: Job, registry: &DebtRegistry, extra_payment: f64) -> Result<(), JobError> {
    match job {
        Job::RecomputePayoffPlan => recompute_payoff_plan(registry, extra_payment).await,
    }
}

async fn recompute_payoff_plan(registry: &DebtRegistry, extra_payment: f64) -> Result<(), JobError> {
    let (revision, debts) = registry.active_debts().await;
    let plan =
        tokio::task::spawn_blocking(move || calculate_avalanche(&debts, extra_payment)).await?;
    if !plan.completed {
        warn!(revision, "active debts do not pay off within the simulation ceiling");
    }
    registry.store_plan(revision, plan).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NewDebt;
    use std::time::Duration;

    async fn wait_for_completed(queue: &JobQueue, expected: u64) {
        for _ in 0..200 {
            if queue.completed_count() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job queue did not complete {expected} jobs");
    }

    #[tokio::test]
    async fn recompute_job_stores_plan_for_current_revision() {
        let registry = DebtRegistry::new();
        registry
            .create(NewDebt {
                name: "car".to_string(),
                balance: 1_200.0,
                minimum_payment: 100.0,
                interest_rate: None,
            })
            .await;
        let (queue, _worker) = JobQueue::start(registry.clone(), 100.0);

        queue.submit(Job::RecomputePayoffPlan);
        wait_for_completed(&queue, 1).await;

        let snapshot = registry.plan().await.expect("plan stored");
        assert_eq!(snapshot.revision, registry.revision().await);
        assert_eq!(snapshot.plan.months_to_freedom, Some(6));
        assert_eq!(queue.failure_count(), 0);
    }

    #[tokio::test]
    async fn recompute_with_no_active_debts_stores_empty_plan() {
        let registry = DebtRegistry::new();
        let (queue, _worker) = JobQueue::start(registry.clone(), 0.0);

        queue.submit(Job::RecomputePayoffPlan);
        wait_for_completed(&queue, 1).await;

        let snapshot = registry.plan().await.expect("plan stored");
        assert!(snapshot.plan.completed);
        assert_eq!(snapshot.plan.months_to_freedom, Some(0));
    }

    #[tokio::test]
    async fn submit_after_worker_stops_does_not_panic() {
        let registry = DebtRegistry::new();
        let (queue, worker) = JobQueue::start(registry, 0.0);
        worker.abort();
        let _ = worker.await;
        queue.submit(Job::RecomputePayoffPlan);
        assert_eq!(queue.completed_count(), 0);
    }
}
