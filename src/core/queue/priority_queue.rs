//! Bounded priority queue controller.
//!
//! Producers and consumers are serialised among themselves by two independent
//! reentrant exclusions, so a producer blocked on capacity never holds anything
//! a consumer needs. The buckets sit behind one short-held storage guard; both
//! blocking paths park on condition variables tied to that guard:
//!
//! - `capacity_available` – signalled by every poll, drain and purge
//! - `items_available`    – signalled by every successful offer
//!
//! Lock order is always exclusion first, storage second.

use std::collections::VecDeque;
use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard, ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, trace};

use crate::config::QueueConfig;
use crate::core::error::{PutTimeoutCause, QueueError};
use crate::core::priority::PriorityDomain;
use crate::core::queue::{BucketStore, MappedBuckets};
use crate::metrics::QueueStats;

struct Inner<S> {
    store: S,
    /// Mirrors `store.size_all()`.
    depth: usize,
}

impl<S> Inner<S> {
    fn pop_highest<P, M>(&mut self, order: &[P]) -> Option<M>
    where
        S: BucketStore<P, M>,
    {
        let item = order
            .iter()
            .find_map(|p| self.store.get_mut(p).and_then(VecDeque::pop_front))?;
        self.depth -= 1;
        Some(item)
    }

    fn peek_highest<P, M>(&self, order: &[P]) -> Option<&M>
    where
        S: BucketStore<P, M>,
    {
        order
            .iter()
            .find_map(|p| self.store.get(p).and_then(VecDeque::front))
    }
}

/// Thread-safe bounded priority queue.
///
/// Items come out highest priority first and FIFO within one priority. The
/// total number of queued items never exceeds `maxQueueDepth`.
pub struct PriorityQueue<M, P, S = MappedBuckets<P, M>> {
    domain: PriorityDomain<P>,
    config: QueueConfig,
    put_exclusion: ReentrantMutex<()>,
    poll_exclusion: ReentrantMutex<()>,
    inner: Mutex<Inner<S>>,
    capacity_available: Condvar,
    items_available: Condvar,
    stats: QueueStats,
    _items: PhantomData<fn() -> M>,
}

impl<M, P, S> PriorityQueue<M, P, S>
where
    P: Ord + Clone + Debug,
    S: BucketStore<P, M>,
{
    pub fn new(domain: PriorityDomain<P>, config: QueueConfig) -> Result<Self, QueueError> {
        if config.max_queue_depth == 0 {
            return Err(QueueError::Instantiation(
                "maxQueueDepth must be at least 1".to_string(),
            ));
        }

        let store = S::for_domain(&domain)?;
        debug!(
            priorities = domain.len(),
            default_priority = ?domain.default_priority(),
            max_queue_depth = config.max_queue_depth,
            max_put_wait_ms = config.max_put_wait_time,
            max_poll_wait_ms = config.max_poll_wait_time,
            "priority queue created"
        );

        Ok(Self {
            domain,
            config,
            put_exclusion: ReentrantMutex::new(()),
            poll_exclusion: ReentrantMutex::new(()),
            inner: Mutex::new(Inner { store, depth: 0 }),
            capacity_available: Condvar::new(),
            items_available: Condvar::new(),
            stats: QueueStats::default(),
            _items: PhantomData,
        })
    }

    /// Offer `item` at the domain's default priority.
    pub fn offer(&self, item: M) -> Result<(), QueueError> {
        let priority = self.domain.default_priority().clone();
        self.offer_with_priority(item, priority)
    }

    /// Offer `item` at `priority`, blocking up to `maxPutWaitTime` while the
    /// queue is full.
    ///
    /// The wait window starts before the put-exclusion is requested and covers
    /// both lock acquisition and the capacity wait.
    pub fn offer_with_priority(&self, item: M, priority: P) -> Result<(), QueueError> {
        if !self.domain.contains(&priority) {
            self.stats.inc_rejected();
            return Err(QueueError::invalid_priority(&priority));
        }

        let timeout = self.config.put_block_timeout();
        let deadline = Instant::now().checked_add(timeout);

        let _put = acquire(&self.put_exclusion, timeout)
            .ok_or_else(|| self.put_timeout(PutTimeoutCause::LockUnavailable))?;

        let mut inner = self.inner.lock();
        while inner.depth >= self.config.max_queue_depth {
            if !self.wait_until(&self.capacity_available, &mut inner, deadline) {
                drop(inner);
                return Err(self.put_timeout(PutTimeoutCause::DepthExceeded));
            }
        }

        let bucket = inner
            .store
            .get_mut(&priority)
            .ok_or_else(|| QueueError::invalid_priority(&priority))?;
        bucket.push_back(item);
        inner.depth += 1;
        let depth = inner.depth;
        drop(inner);

        self.items_available.notify_one();
        self.stats.inc_offered();
        trace!(?priority, depth, "offered");
        Ok(())
    }

    /// Offer every item in `items` at `priority` under a single hold of the
    /// put-exclusion. Stops at the first failure; items admitted before it
    /// stay queued. Returns how many were admitted.
    pub fn offer_all<I>(&self, items: I, priority: P) -> Result<usize, QueueError>
    where
        I: IntoIterator<Item = M>,
    {
        if !self.domain.contains(&priority) {
            self.stats.inc_rejected();
            return Err(QueueError::invalid_priority(&priority));
        }

        let timeout = self.config.put_block_timeout();
        let _put = acquire(&self.put_exclusion, timeout)
            .ok_or_else(|| self.put_timeout(PutTimeoutCause::LockUnavailable))?;

        let mut admitted = 0;
        for item in items {
            // reentrant: the put-exclusion is already ours
            self.offer_with_priority(item, priority.clone())?;
            admitted += 1;
        }
        Ok(admitted)
    }

    /// Non-blocking poll: one attempt at the poll-exclusion, one scan.
    ///
    /// A poller parked in [`poll_timeout`](Self::poll_timeout) keeps the
    /// poll-exclusion for its whole wait, so `poll` during that window is
    /// `Err(PollTimeout)` rather than `Ok(None)`.
    pub fn poll(&self) -> Result<Option<M>, QueueError> {
        self.poll_timeout(Duration::ZERO)
    }

    /// `poll_timeout(maxPollWaitTime)` when `wait` is set, otherwise `poll()`.
    pub fn poll_wait(&self, wait: bool) -> Result<Option<M>, QueueError> {
        if wait {
            self.poll_timeout(self.config.poll_wait_timeout())
        } else {
            self.poll()
        }
    }

    /// Remove and return the head of the highest-priority non-empty bucket.
    ///
    /// `timeout` bounds both acquiring the poll-exclusion and, once held,
    /// waiting for an item to arrive. An empty queue at the deadline yields
    /// `Ok(None)`; only failing to get the exclusion is an error. The
    /// exclusion is held while waiting, and a timeout too large for
    /// `Instant` means waiting until an item arrives.
    pub fn poll_timeout(&self, timeout: Duration) -> Result<Option<M>, QueueError> {
        let deadline = Instant::now().checked_add(timeout);

        let _poll = acquire(&self.poll_exclusion, timeout).ok_or_else(|| {
            self.stats.inc_poll_timeouts();
            debug!(timeout_ms = timeout.as_millis() as u64, "poll-exclusion not acquired");
            QueueError::PollTimeout
        })?;

        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.pop_highest(self.domain.descending()) {
                let depth = inner.depth;
                drop(inner);
                self.capacity_available.notify_one();
                self.stats.inc_polled(1);
                trace!(depth, "polled");
                return Ok(Some(item));
            }
            if !self.wait_until(&self.items_available, &mut inner, deadline) {
                return Ok(None);
            }
        }
    }

    /// Poll up to `max` items in one hold of the poll-exclusion.
    ///
    /// Waits at most `maxPollWaitTime` for the exclusion, never for items.
    pub fn drain(&self, max: usize) -> Result<Vec<M>, QueueError> {
        let timeout = self.config.poll_wait_timeout();
        let _poll = acquire(&self.poll_exclusion, timeout).ok_or_else(|| {
            self.stats.inc_poll_timeouts();
            QueueError::PollTimeout
        })?;

        let mut drained = Vec::with_capacity(max.min(self.depth()));
        while drained.len() < max {
            // reentrant: the poll-exclusion is already ours
            match self.poll()? {
                Some(item) => drained.push(item),
                None => break,
            }
        }
        Ok(drained)
    }

    /// Clone of the item the next `poll` would return.
    ///
    /// The clone is taken under the storage guard and handed back after it is
    /// released, so the caller may use the queue freely with the result.
    /// Waits for the poll-exclusion, so a concurrent `poll_timeout` parked on
    /// an empty queue delays this call until it returns.
    pub fn peek(&self) -> Option<M>
    where
        M: Clone,
    {
        let _poll = self.poll_exclusion.lock();
        let inner = self.inner.lock();
        inner.peek_highest(self.domain.descending()).cloned()
    }

    /// Empty every bucket. Returns the number of items discarded.
    ///
    /// Like [`peek`](Self::peek), waits behind any poller holding the
    /// poll-exclusion.
    pub fn purge(&self) -> usize {
        let _poll = self.poll_exclusion.lock();
        let mut inner = self.inner.lock();
        let purged = inner.store.clear_all();
        inner.depth = 0;
        drop(inner);

        self.capacity_available.notify_all();
        self.stats.inc_purged(purged as u64);
        debug!(purged, "queue purged");
        purged
    }

    /// Items currently queued across all priorities.
    pub fn depth(&self) -> usize {
        self.inner.lock().depth
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty_all()
    }

    #[inline]
    pub fn domain(&self) -> &PriorityDomain<P> {
        &self.domain
    }

    #[inline]
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    fn put_timeout(&self, cause: PutTimeoutCause) -> QueueError {
        self.stats.inc_put_timeouts();
        debug!(
            ?cause,
            max_put_wait_ms = self.config.max_put_wait_time,
            "offer timed out"
        );
        QueueError::PutTimeout(cause)
    }

    /// Park on `signal` until notified or `deadline`. Returns false once the
    /// deadline has passed; `None` means no deadline.
    fn wait_until(
        &self,
        signal: &Condvar,
        inner: &mut MutexGuard<'_, Inner<S>>,
        deadline: Option<Instant>,
    ) -> bool {
        match deadline {
            Some(deadline) => {
                if Instant::now() >= deadline {
                    return false;
                }
                signal.wait_until(inner, deadline);
                true
            }
            None => {
                signal.wait(inner);
                true
            }
        }
    }
}

/// Zero means a single `try_lock`, never "wait forever".
fn acquire(lock: &ReentrantMutex<()>, timeout: Duration) -> Option<ReentrantMutexGuard<'_, ()>> {
    if timeout.is_zero() {
        lock.try_lock()
    } else {
        lock.try_lock_for(timeout)
    }
}

impl<M, P: Debug, S> fmt::Debug for PriorityQueue<M, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("domain", &self.domain)
            .field("config", &self.config)
            .field("depth", &self.inner.lock().depth)
            .finish()
    }
}
