//! Dispatch pool implementation
//!
//! Shared state is an admission table (identifier key → pending job) and
//! an in-flight counter, both changed only inside short critical sections
//! that never await. Validation, cache reads and the analysis itself all
//! happen outside the lock.
//!
//! Admitted jobs go onto a queue in admission order. A single dispatcher
//! task takes capacity permits in that order, so queued requests start
//! first-in first-out. Each job then runs the analysis on a nested task so
//! a panic is caught at the join, removes itself from the table and
//! publishes the Record to every waiter through a shared future.

use crate::analysis::api::Analyzer;
use crate::analysis::error::panic_message;
use crate::core::sync::{handle_mutex_poison, recover_poison};
use crate::model::api::{Record, RepoId};
use crate::pool::error::{PoolError, PoolResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot, watch, OwnedSemaphorePermit, Semaphore};

type SharedJob = Shared<BoxFuture<'static, PoolResult<Record>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of concurrent analyses
    pub capacity: usize,
    /// Return stored Records instead of re-analyzing
    pub use_cache: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            use_cache: true,
        }
    }
}

/// Point-in-time view of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub capacity: usize,
    /// Admitted jobs that have not finished (queued or running)
    pub in_flight: usize,
    /// Jobs currently holding a capacity slot
    pub running: usize,
    /// Keys of queued or running jobs, sorted
    pub keys: Vec<String>,
    pub closing: bool,
}

#[derive(Default)]
struct AdmissionTable {
    closing: bool,
    jobs: HashMap<String, SharedJob>,
}

struct PoolInner {
    analyzer: Arc<Analyzer>,
    config: PoolConfig,
    slots: Arc<Semaphore>,
    table: Mutex<AdmissionTable>,
    in_flight: watch::Sender<usize>,
}

/// An admitted job waiting for a capacity slot
struct QueuedJob {
    repo: RepoId,
    key: String,
    sender: oneshot::Sender<PoolResult<Record>>,
}

enum Admission {
    Cached(Record),
    Job(SharedJob),
}

/// Bounded, coalescing dispatcher of analysis jobs
///
/// Cloning is cheap; clones share the same pool. The dispatcher task
/// stops once the last clone is dropped and its queue is empty.
#[derive(Clone)]
pub struct DispatchPool {
    inner: Arc<PoolInner>,
    queue: mpsc::UnboundedSender<QueuedJob>,
}

impl std::fmt::Debug for DispatchPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPool")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl DispatchPool {
    /// Must be called from within a Tokio runtime
    pub fn new(analyzer: Arc<Analyzer>, mut config: PoolConfig) -> Self {
        if config.capacity == 0 {
            log::warn!("Pool capacity 0 is unusable; using 1");
            config.capacity = 1;
        }
        let (in_flight, _) = watch::channel(0);
        log::debug!(
            "Dispatch pool ready (capacity {}, cache {})",
            config.capacity,
            if config.use_cache { "on" } else { "off" }
        );

        let inner = Arc::new(PoolInner {
            analyzer,
            slots: Arc::new(Semaphore::new(config.capacity)),
            config,
            table: Mutex::new(AdmissionTable::default()),
            in_flight,
        });
        let (queue, queued) = mpsc::unbounded_channel();
        tokio::spawn(dispatch(Arc::clone(&inner), queued));

        Self { inner, queue }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.inner.analyzer
    }

    /// Analyze `repo` and wait for its Record
    ///
    /// Returns a stored Record when caching is enabled and one exists, and
    /// joins an in-flight job for the same identifier instead of starting
    /// another. Only validation and pool-level conditions produce errors.
    pub async fn submit(&self, repo: RepoId) -> PoolResult<Record> {
        match self.admit(repo).await? {
            Admission::Cached(record) => Ok(record),
            Admission::Job(job) => job.await,
        }
    }

    /// Enqueue `repo` without waiting
    ///
    /// Completion is observable only through the promoter and the
    /// database. A cache hit is handed to the promoter straight away.
    pub async fn submit_async(&self, repo: RepoId) -> PoolResult<()> {
        match self.admit(repo).await? {
            Admission::Cached(record) => self.inner.analyzer.promote(record),
            Admission::Job(_) => {}
        }
        Ok(())
    }

    /// Stop admitting work and wait for every admitted job to finish
    ///
    /// Idempotent; concurrent callers all return once the pool is empty.
    pub async fn drain(&self) {
        let first = {
            let mut table = self.inner.lock_recovering();
            !std::mem::replace(&mut table.closing, true)
        };
        let mut in_flight = self.inner.in_flight.subscribe();
        if first {
            log::info!(
                "Draining dispatch pool ({} job(s) in flight)",
                *in_flight.borrow()
            );
        }

        // The sender lives as long as the pool, so this only ends at zero
        let _ = in_flight.wait_for(|count| *count == 0).await;
        if first {
            log::info!("Dispatch pool drained");
        }
    }

    pub fn is_closing(&self) -> bool {
        self.inner.lock_recovering().closing
    }

    pub fn stats(&self) -> PoolStats {
        let (closing, mut keys) = {
            let table = self.inner.lock_recovering();
            (table.closing, table.jobs.keys().cloned().collect::<Vec<_>>())
        };
        keys.sort();
        let capacity = self.inner.config.capacity;
        PoolStats {
            capacity,
            in_flight: *self.inner.in_flight.borrow(),
            running: capacity.saturating_sub(self.inner.slots.available_permits()),
            keys,
            closing,
        }
    }

    async fn admit(&self, repo: RepoId) -> PoolResult<Admission> {
        if self.is_closing() {
            return Err(PoolError::Closing);
        }

        self.inner.analyzer.validate(&repo).await?;

        if self.inner.config.use_cache {
            if let Some(record) = self.inner.analyzer.cached(&repo).await {
                if self.is_closing() {
                    return Err(PoolError::Closing);
                }
                log::debug!("Cache hit for {}", repo);
                return Ok(Admission::Cached(record));
            }
        }

        let key = repo.cache_key();
        let job = {
            let mut table = handle_mutex_poison(self.inner.table.lock(), |message| {
                PoolError::Internal { message }
            })?;
            if table.closing {
                return Err(PoolError::Closing);
            }
            if let Some(job) = table.jobs.get(&key) {
                log::debug!("Coalescing request for {} onto in-flight job", key);
                return Ok(Admission::Job(job.clone()));
            }

            let (sender, receiver) = oneshot::channel();
            let job: SharedJob = async move { receiver.await.unwrap_or(Err(PoolError::Abandoned)) }
                .boxed()
                .shared();
            // Queued under the lock so queue order is admission order
            let queued = QueuedJob {
                repo,
                key: key.clone(),
                sender,
            };
            if self.queue.send(queued).is_err() {
                return Err(PoolError::Internal {
                    message: "dispatcher is not running".to_string(),
                });
            }
            table.jobs.insert(key.clone(), job.clone());
            self.inner.in_flight.send_modify(|count| *count += 1);
            job
        };

        log::debug!("Admitted {}", key);
        Ok(Admission::Job(job))
    }
}

impl PoolInner {
    /// Lock the table for draining, job completion and diagnostics
    ///
    /// No critical section can panic halfway through an update, so a
    /// poisoned table is still consistent.
    fn lock_recovering(&self) -> MutexGuard<'_, AdmissionTable> {
        recover_poison(self.table.lock())
    }

    fn finish(&self, key: &str) {
        self.lock_recovering().jobs.remove(key);
        self.in_flight
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Hand out capacity slots to queued jobs in admission order
async fn dispatch(inner: Arc<PoolInner>, mut queue: mpsc::UnboundedReceiver<QueuedJob>) {
    while let Some(job) = queue.recv().await {
        match Arc::clone(&inner.slots).acquire_owned().await {
            Ok(permit) => {
                log::trace!("{} acquired a slot", job.key);
                tokio::spawn(run_job(Arc::clone(&inner), job, permit));
            }
            Err(_) => {
                inner.finish(&job.key);
                let _ = job.sender.send(Err(PoolError::Internal {
                    message: "capacity semaphore closed".to_string(),
                }));
            }
        }
    }
    log::trace!("Dispatcher stopped");
}

async fn run_job(inner: Arc<PoolInner>, job: QueuedJob, permit: OwnedSemaphorePermit) {
    let QueuedJob { repo, key, sender } = job;
    let analyzer = Arc::clone(&inner.analyzer);
    let work = repo.clone();
    // The permit moves into the task so a panic still releases the slot
    let handle = tokio::spawn(async move {
        let _permit = permit;
        analyzer.analyze(work).await
    });

    let record = match handle.await {
        Ok(record) => record,
        Err(error) => {
            let message = if error.is_panic() {
                format!("analysis panicked: {}", panic_message(error.into_panic()))
            } else {
                "analysis task was cancelled".to_string()
            };
            log::error!("{}: {}", repo, message);
            Record::faulted(repo, message)
        }
    };

    inner.analyzer.promote(record.clone());
    inner.finish(&key);
    if sender.send(Ok(record)).is_err() {
        log::trace!("No waiters left for {}", key);
    }
}
