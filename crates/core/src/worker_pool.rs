//! Bounded pool of async workers.
//!
//! A fixed number of long-lived tasks pull jobs from a shared queue. Each
//! submitted job yields a [`TaskHandle`] that resolves to the job's output.
//!
//! The pool must be created inside a tokio runtime. Dropping it aborts every
//! worker; [`WorkerPool::shutdown`] gives workers a grace period first.

use crate::error::{PortfolioError, Result};
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    workers: JoinSet<()>,
    size: usize,
}

/// Handle to the outcome of a submitted job.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Waits for the job to finish.
    ///
    /// # Errors
    /// Returns `WorkerInterrupted` if the job panicked or was aborted.
    pub async fn join(self) -> Result<T> {
        self.receiver
            .await
            .map_err(|_| PortfolioError::WorkerInterrupted)
    }
}

impl WorkerPool {
    /// Spawns `size` workers on the current runtime.
    ///
    /// # Errors
    /// Returns `InvalidWorkerCount` if `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PortfolioError::InvalidWorkerCount(size));
        }

        let (sender, receiver) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut workers = JoinSet::new();

        for worker_id in 0..size {
            let receiver = Arc::clone(&receiver);
            workers.spawn(async move {
                loop {
                    // Lock is held only while waiting for the next job
                    let next = receiver.lock().await.recv().await;
                    let Some(job) = next else { break };

                    if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                        warn!(worker_id, "job panicked, worker continues");
                    }
                }
                debug!(worker_id, "worker stopped");
            });
        }

        debug!("worker pool started with {} workers", size);

        Ok(Self {
            sender,
            workers,
            size,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Queues a job and returns a handle to its output.
    ///
    /// A job that can no longer be queued is dropped, and its handle resolves
    /// to `WorkerInterrupted`.
    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            let _ = tx.send(task.await);
        });
        if self.sender.send(job).is_err() {
            warn!("worker pool queue closed, job dropped");
        }

        TaskHandle { receiver: rx }
    }

    /// Stops accepting work and waits up to `grace` for workers to drain the
    /// queue, then aborts whatever is still running. Never waits past `grace`.
    pub async fn shutdown(self, grace: Duration) {
        let Self {
            sender,
            mut workers,
            ..
        } = self;
        drop(sender);

        let drained = tokio::time::timeout(grace, async {
            while workers.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                "worker pool did not stop within {:?}, aborting {} workers",
                grace,
                workers.len()
            );
            workers.abort_all();
        } else {
            debug!("worker pool stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(PortfolioError::InvalidWorkerCount(0))
        ));
    }

    #[tokio::test]
    async fn test_runs_every_job() {
        let pool = WorkerPool::new(3).unwrap();
        assert_eq!(pool.size(), 3);

        let handles: Vec<_> = (0..10u64)
            .map(|i| pool.submit(async move { i * i }))
            .collect();

        let mut outputs = Vec::new();
        for handle in handles {
            outputs.push(handle.join().await.unwrap());
        }

        assert_eq!(outputs, (0..10u64).map(|i| i * i).collect::<Vec<_>>());
        pool.shutdown(Duration::from_millis(500)).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded_by_pool_size() {
        let pool = WorkerPool::new(2).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().await.unwrap();
        }
        pool.shutdown(Duration::from_millis(500)).await;

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak >= 1 && peak <= 2, "peak concurrency was {peak}");
    }

    #[tokio::test]
    async fn test_panicking_job_reports_interrupted_and_worker_survives() {
        let pool = WorkerPool::new(1).unwrap();

        let failed = pool.submit(async {
            panic!("boom");
        });
        let ok = pool.submit(async { 7 });

        let failed: Result<()> = failed.join().await;
        assert!(matches!(failed, Err(PortfolioError::WorkerInterrupted)));
        assert_eq!(ok.join().await.unwrap(), 7);

        pool.shutdown(Duration::from_millis(500)).await;
    }

    #[tokio::test]
    async fn test_shutdown_aborts_stuck_workers_after_grace() {
        let pool = WorkerPool::new(1).unwrap();
        let stuck = pool.submit(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            pool.shutdown(Duration::from_millis(50)),
        )
        .await;
        assert!(finished.is_ok(), "shutdown blocked past its grace period");

        assert!(matches!(
            stuck.join().await,
            Err(PortfolioError::WorkerInterrupted)
        ));
    }
}
