//! The dump hook a transport invokes for every exchange.
//!
//! # Responsibilities
//! - Read the live, shared `DumpOptions` once per exchange
//! - Write records synchronously, or queue them for the background worker
//! - Never block or fail the request path because of a sink
//!
//! # Design Decisions
//! - One worker thread per dumper, started on the first async record
//! - Bounded queue with `try_send`: a stalled sink loses records, not latency
//! - The worker exits when the last `Dumper` clone is dropped

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::dump::options::DumpOptions;
use crate::dump::output::DumpOutput;

/// Maximum number of records waiting for the async worker.
pub const ASYNC_QUEUE_CAPACITY: usize = 1024;

struct DumpJob {
    output: DumpOutput,
    record: Vec<u8>,
}

struct DumperInner {
    options: Arc<RwLock<DumpOptions>>,
    queue: OnceLock<Option<mpsc::Sender<DumpJob>>>,
    /// Records accepted by the queue but not yet written.
    pending: Arc<AtomicUsize>,
}

/// Handle to an armed dump hook. Clones share the options and the worker.
#[derive(Clone)]
pub struct Dumper {
    inner: Arc<DumperInner>,
}

impl Dumper {
    /// Create a dumper reading `options` live.
    pub fn new(options: Arc<RwLock<DumpOptions>>) -> Self {
        Self {
            inner: Arc::new(DumperInner {
                options,
                queue: OnceLock::new(),
                pending: Arc::new(AtomicUsize::new(0)),
            }),
        }
    }

    fn read_options(&self) -> RwLockReadGuard<'_, DumpOptions> {
        self.inner
            .options
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current policy. Taken once per exchange so all records of
    /// one request/response pair follow the same flags.
    pub fn snapshot(&self) -> DumpOptions {
        self.read_options().clone()
    }

    /// True if this dumper reads exactly `options`.
    #[cfg(test)]
    pub(crate) fn reads(&self, options: &Arc<RwLock<DumpOptions>>) -> bool {
        Arc::ptr_eq(&self.inner.options, options)
    }

    /// True if both handles are the same hook.
    #[cfg(test)]
    pub(crate) fn same_hook(&self, other: &Dumper) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Write one record according to `opts`.
    pub fn write(&self, opts: &DumpOptions, record: Vec<u8>) {
        if record.is_empty() {
            return;
        }
        let Some(output) = opts.output.as_ref() else {
            tracing::trace!(bytes = record.len(), "Dump record dropped: no output configured");
            return;
        };

        if opts.async_mode {
            self.enqueue(output.clone(), record);
        } else if let Err(e) = output.write_record(&record) {
            tracing::warn!(
                output = output.label(),
                error = %e,
                "Failed to write dump record"
            );
        }
    }

    fn enqueue(&self, output: DumpOutput, record: Vec<u8>) {
        let Some(tx) = self.inner.queue.get_or_init(|| self.spawn_worker()) else {
            // No worker could be started; fall back to writing inline.
            if let Err(e) = output.write_record(&record) {
                tracing::warn!(
                    output = output.label(),
                    error = %e,
                    "Failed to write dump record"
                );
            }
            return;
        };

        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        match tx.try_send(DumpJob { output, record }) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                self.inner.pending.fetch_sub(1, Ordering::SeqCst);
                tracing::warn!(
                    output = job.output.label(),
                    bytes = job.record.len(),
                    "Dump queue full, dropping record"
                );
            }
            Err(TrySendError::Closed(_)) => {
                self.inner.pending.fetch_sub(1, Ordering::SeqCst);
                tracing::warn!("Dump worker stopped, dropping record");
            }
        }
    }

    fn spawn_worker(&self) -> Option<mpsc::Sender<DumpJob>> {
        let (tx, mut rx) = mpsc::channel::<DumpJob>(ASYNC_QUEUE_CAPACITY);
        let pending = Arc::clone(&self.inner.pending);

        let spawned = std::thread::Builder::new()
            .name("reqkit-dump".to_string())
            .spawn(move || {
                while let Some(job) = rx.blocking_recv() {
                    if let Err(e) = job.output.write_record(&job.record) {
                        tracing::warn!(
                            output = job.output.label(),
                            error = %e,
                            "Failed to write dump record"
                        );
                    }
                    pending.fetch_sub(1, Ordering::SeqCst);
                }
                tracing::debug!("Dump worker exiting");
            });

        match spawned {
            Ok(_) => {
                tracing::debug!(capacity = ASYNC_QUEUE_CAPACITY, "Async dump worker started");
                Some(tx)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to start async dump worker, dumping inline"
                );
                None
            }
        }
    }

    /// Number of queued records not yet written.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Wait until queued records are written or `timeout` elapses.
    ///
    /// Returns true if the queue drained.
    pub async fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}

impl std::fmt::Debug for Dumper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dumper")
            .field("options", &self.snapshot())
            .field("pending", &self.pending())
            .finish()
    }
}
