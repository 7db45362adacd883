use crate::metrics::traits::MemoMetricsRecorder;

/// Admission-level counters, stored next to the hit/miss counters and
/// guarded by the same lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoMetrics {
    /// Computed values the admission policy stored.
    pub admitted: u64,
    /// Computed values the admission policy returned without storing.
    pub rejected: u64,
    /// Admitted inserts that replaced an entry stored by a racing miss.
    pub overwrites: u64,
    /// Entries removed by a single-key reset.
    pub invalidations: u64,
    /// Misses where the computation or the admission policy returned an error.
    pub failures: u64,
}

impl MemoMetrics {
    /// Creates zeroed counters.
    pub fn new() -> MemoMetrics {
        Self::default()
    }
}

impl MemoMetricsRecorder for MemoMetrics {
    #[inline]
    fn record_admitted(&mut self) {
        self.admitted += 1;
    }

    #[inline]
    fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    #[inline]
    fn record_overwrite(&mut self) {
        self.overwrites += 1;
    }

    #[inline]
    fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    #[inline]
    fn record_failure(&mut self) {
        self.failures += 1;
    }

    fn record_clear(&mut self) {
        *self = Self::default();
    }
}
