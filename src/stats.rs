//! Hit/miss instrumentation.
//!
//! ## Architecture
//!
//! ```text
//!   Instrumentation::Enabled                 Instrumentation::Disabled
//!   ────────────────────────                 ─────────────────────────
//!   counters: Some(HitCounters)              counters: None
//!     hits   += 1 on store lookup hit          never touched
//!     misses += 1 on successful compute        readers return None
//! ```
//!
//! The mode is chosen once at construction and never changes. A disabled memo
//! has no counter storage at all, so readers cannot mistake "not tracked" for
//! zero.
//!
//! ## Terminology
//!
//! - **hit**: a lookup satisfied from the store without running the
//!   computation.
//! - **miss**: a successful (non-failing) run of the computation, counted
//!   whether or not the admission policy stored the result.
//! - **total**: `hits + misses`.

/// Whether a memo tracks hits and misses. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Instrumentation {
    /// Count hits and misses.
    #[default]
    Enabled,
    /// Track nothing; counter readers report "not tracked".
    Disabled,
}

impl Instrumentation {
    /// Returns `true` for [`Instrumentation::Enabled`].
    #[inline]
    pub fn is_enabled(self) -> bool {
        matches!(self, Instrumentation::Enabled)
    }
}

impl From<bool> for Instrumentation {
    #[inline]
    fn from(track_hits: bool) -> Self {
        if track_hits {
            Instrumentation::Enabled
        } else {
            Instrumentation::Disabled
        }
    }
}

/// Live counters, owned by the memo's store and updated under its lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HitCounters {
    pub(crate) hits: u64,
    pub(crate) misses: u64,
}

impl HitCounters {
    /// Creates counters for `mode`, or `None` when nothing is tracked.
    #[inline]
    pub(crate) fn for_mode(mode: Instrumentation) -> Option<Self> {
        mode.is_enabled().then(Self::default)
    }

    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub(crate) fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Point-in-time hit/miss counts, read in a single critical section.
///
/// # Example
///
/// ```
/// use memokit::memo::Memo;
///
/// let memo = Memo::new(|n: &u32| n + 1, |_: &u32| true, true);
/// memo.invoke(1);
/// memo.invoke(1);
/// memo.invoke(2);
///
/// let stats = memo.stats().unwrap();
/// assert_eq!(stats.hits, 1);
/// assert_eq!(stats.misses, 2);
/// assert_eq!(stats.total(), 3);
/// assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups satisfied from the store.
    pub hits: u64,
    /// Successful computation runs.
    pub misses: u64,
}

impl MemoStats {
    /// Returns `hits + misses`.
    #[inline]
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of invocations served from the store; `0.0` before any call.
    pub fn hit_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
