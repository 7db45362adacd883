/// Point-in-time view of every memo counter plus the store size gauge.
///
/// Uninstrumented memos report `instrumented: false` and zero counters; the
/// flag must be checked before treating the counters as measurements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoMetricsSnapshot {
    /// Whether the memo tracks counters at all.
    pub instrumented: bool,

    /// Lookups served from the store.
    pub hits: u64,
    /// Successful computations, admitted or not.
    pub misses: u64,

    /// Breakdown of misses and resets, see
    /// [`MemoMetrics`](crate::metrics::metrics_impl::MemoMetrics).
    pub admitted: u64,
    pub rejected: u64,
    pub overwrites: u64,
    pub invalidations: u64,
    pub failures: u64,

    /// Entries in the store when the snapshot was taken.
    pub cache_len: usize,
}

impl MemoMetricsSnapshot {
    /// Returns `hits + misses`.
    #[inline]
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }
}
