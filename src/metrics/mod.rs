use std::sync::atomic::{AtomicU64, Ordering};

// Per-queue counters (low overhead). Coarse-grained, relaxed ordering.
#[derive(Debug, Default)]
pub struct QueueStats {
    offered: AtomicU64,
    polled: AtomicU64,
    rejected: AtomicU64,
    put_timeouts: AtomicU64,
    poll_timeouts: AtomicU64,
    purged: AtomicU64,
}

/// Point-in-time copy of [`QueueStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStatsSnapshot {
    pub offered: u64,
    pub polled: u64,
    pub rejected: u64,
    pub put_timeouts: u64,
    pub poll_timeouts: u64,
    pub purged: u64,
}

impl QueueStats {
    #[inline]
    pub fn inc_offered(&self) {
        self.offered.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_polled(&self, n: u64) {
        self.polled.fetch_add(n, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_put_timeouts(&self) {
        self.put_timeouts.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_poll_timeouts(&self) {
        self.poll_timeouts.fetch_add(1, Ordering::Relaxed);
    }
    #[inline]
    pub fn inc_purged(&self, n: u64) {
        self.purged.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot {
            offered: self.offered.load(Ordering::Relaxed),
            polled: self.polled.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            put_timeouts: self.put_timeouts.load(Ordering::Relaxed),
            poll_timeouts: self.poll_timeouts.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
        }
    }
}

impl QueueStatsSnapshot {
    pub fn render(&self) -> String {
        // Simple text format (Prometheus-style without HELP/TYPE lines for brevity)
        format!(
            "prioq_offered {}\nprioq_polled {}\nprioq_rejected {}\nprioq_put_timeouts {}\nprioq_poll_timeouts {}\nprioq_purged {}\n",
            self.offered,
            self.polled,
            self.rejected,
            self.put_timeouts,
            self.poll_timeouts,
            self.purged,
        )
    }
}
