//! Thread-safe memoizing wrapper around a pure computation.
//!
//! ## Architecture
//!
//! ```text
//!   caller ── invoke(args) ─┐
//!                           ▼
//!   ┌──────────────────────────────────────────┐
//!   │ lock store                               │
//!   │   hit?  ── yes ──► hits += 1, clone ─────┼──► return cached
//!   │   no                                     │
//!   │ unlock                                   │
//!   └───────────────────┬──────────────────────┘
//!                       ▼
//!            compute(&args)       (unlocked, may be slow)
//!                       ▼
//!            admission(&value)    (unlocked)
//!                       ▼
//!   ┌──────────────────────────────────────────┐
//!   │ lock store                               │
//!   │   admitted? insert (args, value)         │
//!   │   misses += 1                            │
//!   │ unlock                                   │
//!   └───────────────────┬──────────────────────┘
//!                       ▼
//!                 return value
//! ```
//!
//! ## Concurrency Contract
//!
//! The computation always runs outside the lock, so a slow computation never
//! stalls lookups for other keys. The price: two threads missing on the same
//! key at the same time will **both** run the computation. The memo
//! guarantees at most one *stored* value per key, not at most one
//! *computation* per key. Each racing caller gets the value it computed
//! itself, and the insert that takes the lock last is the one that stays.
//! This is only sound because the wrapped computation is assumed to be pure.
//!
//! ## Failure Semantics
//!
//! - A computation returning `Err` (or panicking) inserts nothing and does
//!   not count as a miss; the error reaches the caller unchanged.
//! - A failing admission policy is handled the same way.
//! - No lock is held while user code runs, and `parking_lot` locks do not
//!   poison, so a panicking computation leaves the memo fully usable.
//! - Retrying after a failure is always safe: no partial state is left.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::memo::Memo;
//!
//! let square = Memo::new(|n: &u64| n * n, |_: &u64| true, true);
//!
//! assert_eq!(square.invoke(3), 9);
//! assert_eq!((square.hits(), square.misses()), (Some(0), Some(1)));
//!
//! assert_eq!(square.invoke(3), 9);
//! assert_eq!((square.hits(), square.misses()), (Some(1), Some(1)));
//!
//! assert!(square.reset(&3));
//! assert_eq!(square.cache_size(), 0);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::admission::{Admission, Verdict};
use crate::computation::Computation;
use crate::error::InvariantError;
use crate::stats::{HitCounters, Instrumentation, MemoStats};
use crate::traits::{ConcurrentCache, MemoizedFn};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::MemoMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::MemoMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MemoMetricsRecorder, MetricsSnapshotProvider};

/// Store contents and counters, always accessed under the memo's lock.
struct Store<K, V, S> {
    entries: HashMap<K, V, S>,
    counters: Option<HitCounters>,
    #[cfg(feature = "metrics")]
    metrics: Option<MemoMetrics>,
}

impl<K, V, S> Store<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn new(mode: Instrumentation, initial_capacity: usize, hasher: S) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(initial_capacity, hasher),
            counters: HitCounters::for_mode(mode),
            #[cfg(feature = "metrics")]
            metrics: mode.is_enabled().then(MemoMetrics::new),
        }
    }

    /// Returns a clone of the stored value and counts the hit.
    fn lookup(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.entries.get(key)?.clone();
        if let Some(counters) = self.counters.as_mut() {
            counters.record_hit();
        }
        Some(value)
    }

    /// Finishes a successful miss: conditional insert plus miss count.
    fn complete_miss(&mut self, args: K, value: &V, admitted: bool)
    where
        V: Clone,
    {
        if admitted {
            let replaced = self.entries.insert(args, value.clone()).is_some();
            if replaced {
                log::trace!("memo miss: replaced an entry stored by a concurrent miss");
            }
            #[cfg(feature = "metrics")]
            if let Some(metrics) = self.metrics.as_mut() {
                metrics.record_admitted();
                if replaced {
                    metrics.record_overwrite();
                }
            }
        } else {
            log::trace!("memo miss: value rejected by admission policy");
            #[cfg(feature = "metrics")]
            if let Some(metrics) = self.metrics.as_mut() {
                metrics.record_rejected();
            }
        }
        if let Some(counters) = self.counters.as_mut() {
            counters.record_miss();
        }
    }

    fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.entries.remove(key).is_some();
        #[cfg(feature = "metrics")]
        if removed {
            if let Some(metrics) = self.metrics.as_mut() {
                metrics.record_invalidation();
            }
        }
        removed
    }

    fn clear(&mut self, clear_counters: bool) {
        self.entries.clear();
        if !clear_counters {
            return;
        }
        if let Some(counters) = self.counters.as_mut() {
            counters.reset();
        }
        #[cfg(feature = "metrics")]
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.record_clear();
        }
    }
}

/// A memoized computation with an admission policy and optional hit/miss
/// instrumentation.
///
/// `Memo` is `Send + Sync` whenever `K` and `V` are `Send`; share it between
/// threads with `Arc<Memo<..>>`. Values are returned by clone, so wrap large
/// values in `Arc` to make hits cheap.
///
/// Concurrent misses on the same key may each run the computation; see the
/// [module docs](crate::memo) for the full contract.
///
/// # Type Parameters
///
/// - `K`: key (argument tuple), `Eq + Hash`
/// - `V`: computed value, `Clone`
/// - `E`: computation error, [`Infallible`] for [`Memo::new`]
/// - `S`: hasher for the store, [`FxBuildHasher`] by default
pub struct Memo<K, V, E = Infallible, S = FxBuildHasher> {
    compute: Computation<K, V, E>,
    admission: Admission<V, E>,
    instrumentation: Instrumentation,
    store: Mutex<Store<K, V, S>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash + 'static,
    V: Clone + 'static,
{
    /// Wraps an infallible computation.
    ///
    /// `admit` decides which results are stored; any [`Verdict`] other than
    /// false/none admits. `instrumentation` accepts a `bool` (track hits) or an
    /// [`Instrumentation`] value.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::memo::Memo;
    ///
    /// // Only even results are worth remembering
    /// let memo = Memo::new(|n: &i64| n * n, |v: &i64| v % 2 == 0, true);
    ///
    /// assert_eq!(memo.invoke(2), 4);
    /// assert_eq!(memo.cache_size(), 1);
    ///
    /// assert_eq!(memo.invoke(3), 9);
    /// assert_eq!(memo.cache_size(), 1);
    /// ```
    pub fn new<F, P, R>(compute: F, admit: P, instrumentation: impl Into<Instrumentation>) -> Self
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
        P: Fn(&V) -> R + Send + Sync + 'static,
        R: Verdict,
    {
        Self::from_parts(
            Computation::from_fn(compute),
            Admission::from_predicate(admit),
            instrumentation.into(),
            0,
            FxBuildHasher,
        )
    }
}

impl<K, V, E> Memo<K, V, E>
where
    K: Eq + Hash + 'static,
    V: Clone + 'static,
    E: 'static,
{
    /// Wraps a fallible computation and a fallible admission policy sharing
    /// the error type `E`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::num::ParseIntError;
    ///
    /// use memokit::memo::Memo;
    ///
    /// let parse = Memo::try_new(
    ///     |s: &String| s.parse::<i32>(),
    ///     |_: &i32| Ok::<_, ParseIntError>(true),
    ///     true,
    /// );
    ///
    /// assert_eq!(parse.try_invoke("42".to_string()), Ok(42));
    /// assert!(parse.try_invoke("nope".to_string()).is_err());
    /// assert_eq!(parse.misses(), Some(1));
    /// ```
    pub fn try_new<F, P, R>(
        compute: F,
        admit: P,
        instrumentation: impl Into<Instrumentation>,
    ) -> Self
    where
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
        P: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
        R: Verdict,
    {
        Self::from_parts(
            Computation::from_fallible(compute),
            Admission::from_fallible(admit),
            instrumentation.into(),
            0,
            FxBuildHasher,
        )
    }
}

impl<K, V, S> Memo<K, V, Infallible, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    /// Returns the memoized result for `args`, computing it on a miss.
    pub fn invoke(&self, args: K) -> V {
        match self.try_invoke(args) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Returns a closure that forwards to [`invoke`](Self::invoke), for use
    /// wherever a plain `Fn(K) -> V` is expected.
    ///
    /// ```
    /// use memokit::memo::Memo;
    ///
    /// let len = Memo::new(|s: &&str| s.len(), |_: &usize| true, false);
    /// let lengths: Vec<usize> = ["a", "bb", "a"].into_iter().map(len.as_fn()).collect();
    /// assert_eq!(lengths, vec![1, 2, 1]);
    /// assert_eq!(len.cache_size(), 2);
    /// ```
    pub fn as_fn(&self) -> impl Fn(K) -> V + '_ {
        move |args: K| self.invoke(args)
    }
}

impl<K, V, E, S> Memo<K, V, E, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    pub(crate) fn from_parts(
        compute: Computation<K, V, E>,
        admission: Admission<V, E>,
        instrumentation: Instrumentation,
        initial_capacity: usize,
        hasher: S,
    ) -> Self {
        log::debug!(
            "memo created: instrumentation={:?}, initial_capacity={}",
            instrumentation,
            initial_capacity
        );
        Self {
            compute,
            admission,
            instrumentation,
            store: Mutex::new(Store::new(instrumentation, initial_capacity, hasher)),
        }
    }

    /// Returns the memoized result for `args`, computing it on a miss.
    ///
    /// A computation or admission error is returned unchanged; nothing is
    /// stored and the miss counter is not incremented.
    ///
    /// # Example
    ///
    /// ```
    /// use memokit::memo::Memo;
    ///
    /// let checked_div = Memo::try_new(
    ///     |&(a, b): &(i32, i32)| a.checked_div(b).ok_or("division by zero"),
    ///     |_: &i32| Ok(true),
    ///     true,
    /// );
    ///
    /// assert_eq!(checked_div.try_invoke((7, 2)), Ok(3));
    /// assert_eq!(checked_div.try_invoke((7, 0)), Err("division by zero"));
    /// assert_eq!(checked_div.cache_size(), 1);
    /// assert_eq!(checked_div.misses(), Some(1));
    /// ```
    pub fn try_invoke(&self, args: K) -> Result<V, E> {
        let cached = self.store.lock().lookup(&args);
        if let Some(value) = cached {
            return Ok(value);
        }

        let value = self
            .compute
            .run(&args)
            .inspect_err(|_| self.record_failure())?;
        let admitted = self
            .admission
            .evaluate(&value)
            .inspect_err(|_| self.record_failure())?;

        self.store.lock().complete_miss(args, &value, admitted);
        Ok(value)
    }

    /// Removes the entry for `key`. Returns `true` if an entry was removed.
    ///
    /// Counters are not affected.
    pub fn reset<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.store.lock().remove(key);
        log::debug!("memo reset: removed={}", removed);
        removed
    }

    /// Removes every entry. Counters are zeroed only when `clear_counters` is
    /// set and the memo is instrumented.
    pub fn reset_all(&self, clear_counters: bool) {
        let mut store = self.store.lock();
        let dropped = store.entries.len();
        store.clear(clear_counters);
        drop(store);
        log::debug!(
            "memo reset_all: dropped {} entries, clear_counters={}",
            dropped,
            clear_counters
        );
    }

    /// Number of stored entries.
    pub fn cache_size(&self) -> usize {
        self.store.lock().entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.lock().entries.is_empty()
    }

    /// Returns `true` if a value is stored for `key`. Does not count a hit.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().entries.contains_key(key)
    }

    /// Returns the stored value for `key` without computing or counting.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().entries.get(key).cloned()
    }

    /// Lookups served from the store, or `None` if hits are not tracked.
    pub fn hits(&self) -> Option<u64> {
        self.stats().map(|stats| stats.hits)
    }

    /// Successful computation runs, or `None` if misses are not tracked.
    pub fn misses(&self) -> Option<u64> {
        self.stats().map(|stats| stats.misses)
    }

    /// `hits + misses`, or `None` if not tracked.
    pub fn total(&self) -> Option<u64> {
        self.stats().map(|stats| stats.total())
    }

    /// Hits and misses read together, or `None` if not tracked.
    pub fn stats(&self) -> Option<MemoStats> {
        self.store.lock().counters.map(|counters| counters.stats())
    }

    /// The instrumentation mode chosen at construction.
    #[inline]
    pub fn instrumentation(&self) -> Instrumentation {
        self.instrumentation
    }

    /// Returns `true` if hits and misses are tracked.
    #[inline]
    pub fn is_instrumented(&self) -> bool {
        self.instrumentation.is_enabled()
    }

    /// Verifies that counters and store contents agree with each other.
    ///
    /// Intended for tests and debug assertions.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let store = self.store.lock();
        if store.counters.is_some() != self.instrumentation.is_enabled() {
            return Err(InvariantError::new(format!(
                "counter storage does not match instrumentation mode {:?}",
                self.instrumentation
            )));
        }

        #[cfg(feature = "metrics")]
        if let (Some(counters), Some(metrics)) = (store.counters, store.metrics) {
            if metrics.admitted + metrics.rejected != counters.misses {
                return Err(InvariantError::new(format!(
                    "admitted ({}) + rejected ({}) != misses ({})",
                    metrics.admitted, metrics.rejected, counters.misses
                )));
            }
            let live = store.entries.len() as u64;
            if live + metrics.overwrites > metrics.admitted {
                return Err(InvariantError::new(format!(
                    "store holds {} entries ({} overwrites) but only {} were admitted",
                    live, metrics.overwrites, metrics.admitted
                )));
            }
        }

        Ok(())
    }

    fn record_failure(&self) {
        log::trace!("memo miss: computation or admission policy failed");
        #[cfg(feature = "metrics")]
        {
            if let Some(metrics) = self.store.lock().metrics.as_mut() {
                metrics.record_failure();
            }
        }
    }
}

impl<K, V, E, S> MemoizedFn<K> for Memo<K, V, E, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    type Output = V;
    type Error = E;

    fn try_call(&self, args: K) -> Result<V, E> {
        self.try_invoke(args)
    }

    fn invalidate(&self, args: &K) -> bool {
        self.reset(args)
    }

    fn invalidate_all(&self) {
        self.reset_all(false)
    }
}

impl<K, V, E, S> ConcurrentCache for Memo<K, V, E, S>
where
    K: Send,
    V: Send,
    S: Send,
{
}

#[cfg(feature = "metrics")]
impl<K, V, E, S> MetricsSnapshotProvider<MemoMetricsSnapshot> for Memo<K, V, E, S> {
    fn snapshot(&self) -> MemoMetricsSnapshot {
        let store = self.store.lock();
        let mut snapshot = MemoMetricsSnapshot {
            cache_len: store.entries.len(),
            ..Default::default()
        };
        if let (Some(counters), Some(metrics)) = (store.counters, store.metrics) {
            snapshot.instrumented = true;
            snapshot.hits = counters.hits;
            snapshot.misses = counters.misses;
            snapshot.admitted = metrics.admitted;
            snapshot.rejected = metrics.rejected;
            snapshot.overwrites = metrics.overwrites;
            snapshot.invalidations = metrics.invalidations;
            snapshot.failures = metrics.failures;
        }
        snapshot
    }
}

impl<K, V, E, S> fmt::Debug for Memo<K, V, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock();
        f.debug_struct("Memo")
            .field("instrumentation", &self.instrumentation)
            .field("cache_size", &store.entries.len())
            .field("stats", &store.counters.map(|counters| counters.stats()))
            .finish_non_exhaustive()
    }
}
