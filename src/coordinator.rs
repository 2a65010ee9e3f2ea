//! Fetch orchestration: debounced filter updates, sequenced requests, and
//! stale-response discard.
//!
//! The coordinator is the single writer of the visible product collection.
//! Every fetch is stamped with a monotonically increasing sequence number at
//! initiation; a settling fetch commits only if its sequence number exceeds
//! the last committed one, so the last-initiated request wins regardless of
//! settlement order. Fetch failures are logged and swallowed, leaving the
//! previously committed collection in place.

use crate::domain::{FilterState, ProductRecord};
use crate::sources::ProductSource;
use metrics::{counter, histogram};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct CommittedState {
    products: Arc<Vec<ProductRecord>>,
    /// Sequence number of the fetch that produced `products`.
    seq: u64,
    /// Bumped on every commit; keys the aggregation memo cache.
    generation: u64,
}

struct CoordinatorInner {
    source: Arc<dyn ProductSource>,
    debounce_window: Duration,
    committed: Mutex<CommittedState>,
    /// Sequence number of the most recently initiated fetch.
    next_seq: AtomicU64,
    /// Highest sequence number that has settled (success or failure).
    settled_seq: AtomicU64,
    shutdown: AtomicBool,
    pending_update: Mutex<Option<JoinHandle<()>>>,
}

/// Cheaply cloneable handle; all clones share one coordinator.
#[derive(Clone)]
pub struct FetchCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl FetchCoordinator {
    pub fn new(source: Arc<dyn ProductSource>, debounce_window: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                source,
                debounce_window,
                committed: Mutex::new(CommittedState {
                    products: Arc::new(Vec::new()),
                    seq: 0,
                    generation: 0,
                }),
                next_seq: AtomicU64::new(0),
                settled_seq: AtomicU64::new(0),
                shutdown: AtomicBool::new(false),
                pending_update: Mutex::new(None),
            }),
        }
    }

    /// Apply a filter change after the debounce window. Calls arriving
    /// within the window collapse into one fetch carrying the last call's
    /// filters: each call aborts the previously scheduled task and replaces
    /// it with its own.
    pub fn update_filters(&self, filters: FilterState) {
        if self.inner.shutdown.load(Ordering::SeqCst) {
            debug!("Ignoring filter update after shutdown");
            return;
        }

        let coordinator = self.clone();
        let window = self.inner.debounce_window;
        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            coordinator.trigger_fetch(filters);
        });

        let mut pending = self.inner.pending_update.lock().unwrap();
        if let Some(previous) = pending.replace(task) {
            if !previous.is_finished() {
                counter!("pulse_filter_updates_coalesced_total").increment(1);
                debug!("Coalescing filter update within debounce window");
            }
            previous.abort();
        }
    }

    /// Issue a fetch immediately, bypassing the debounce window. Used for
    /// the initial load and by the debounce timer once the window elapses.
    /// The returned handle settles when the fetch has committed, been
    /// discarded, or failed.
    pub fn trigger_fetch(&self, filters: FilterState) -> JoinHandle<()> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();

        tokio::spawn(async move {
            if inner.shutdown.load(Ordering::SeqCst) {
                return;
            }

            debug!("Starting catalog fetch #{}", seq);
            let started = std::time::Instant::now();
            let result = inner.source.fetch_products(&filters).await;
            histogram!(
                "pulse_fetch_duration_seconds",
                "source" => inner.source.source_name()
            )
            .record(started.elapsed().as_secs_f64());

            // Teardown guard: a torn-down coordinator commits nothing and
            // no longer transitions the loading flag.
            if inner.shutdown.load(Ordering::SeqCst) {
                debug!("Dropping result of fetch #{}: coordinator shut down", seq);
                return;
            }

            match result {
                Ok(products) => {
                    counter!("pulse_fetch_success_total").increment(1);
                    let mut committed = inner.committed.lock().unwrap();
                    if seq > committed.seq {
                        info!(
                            "Committing fetch #{}: {} products (replacing fetch #{})",
                            seq,
                            products.len(),
                            committed.seq
                        );
                        committed.products = Arc::new(products);
                        committed.seq = seq;
                        committed.generation += 1;
                    } else {
                        counter!("pulse_stale_responses_discarded_total").increment(1);
                        debug!(
                            "Discarding stale response #{} (already committed #{})",
                            seq, committed.seq
                        );
                    }
                }
                Err(e) => {
                    counter!("pulse_fetch_error_total").increment(1);
                    warn!(
                        "Catalog fetch #{} failed, keeping previous collection: {}",
                        seq, e
                    );
                }
            }

            inner.settled_seq.fetch_max(seq, Ordering::SeqCst);
        })
    }

    /// Fetch with the given filters and wait for it to settle.
    pub async fn refresh(&self, filters: FilterState) {
        let _ = self.trigger_fetch(filters).await;
    }

    /// True while the most recently initiated fetch has not yet settled.
    pub fn is_loading(&self) -> bool {
        self.inner.next_seq.load(Ordering::SeqCst) > self.inner.settled_seq.load(Ordering::SeqCst)
    }

    /// Snapshot of the committed collection. The Arc is a cheap handle;
    /// readers can hold it across further commits without blocking them.
    pub fn products(&self) -> Arc<Vec<ProductRecord>> {
        self.inner.committed.lock().unwrap().products.clone()
    }

    /// Commit generation of the current collection, for memo keying.
    pub fn generation(&self) -> u64 {
        self.inner.committed.lock().unwrap().generation
    }

    /// Collection and generation read under one lock, so the pair is
    /// consistent even with a commit racing the read.
    pub fn snapshot(&self) -> (Arc<Vec<ProductRecord>>, u64) {
        let committed = self.inner.committed.lock().unwrap();
        (committed.products.clone(), committed.generation)
    }

    /// Tear down: cancel any pending debounced update and suppress
    /// commitment of in-flight fetch results.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        let mut pending = self.inner.pending_update.lock().unwrap();
        if let Some(task) = pending.take() {
            task.abort();
            debug!("Cancelled pending debounced update on shutdown");
        }
    }
}
