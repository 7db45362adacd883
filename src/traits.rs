//! # Memo Trait Seams
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            MemoizedFn<K>                │
//!   │                                         │
//!   │  try_call(&, K) → Result<Output, Error> │
//!   │  invalidate(&, &K) → bool               │
//!   │  invalidate_all(&)                      │
//!   └─────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────┐
//!   │ ConcurrentCache                         │
//!   │   Marker trait: Send + Sync             │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! `MemoizedFn` lets calling code depend on "a cached function of `K`"
//! without naming the memo's hasher or error parameters; every method takes
//! `&self`, since memoized functions are shared rather than owned.
//!
//! ## MemoConfig
//!
//! | Field              | Type              | Default   | Description                    |
//! |--------------------|-------------------|-----------|--------------------------------|
//! | `initial_capacity` | `usize`           | 0         | Pre-sized store slots          |
//! | `instrumentation`  | `Instrumentation` | `Enabled` | Track hits and misses          |

use crate::stats::Instrumentation;

/// A shared, cached function of `K`.
///
/// # Example
///
/// ```
/// use memokit::memo::Memo;
/// use memokit::traits::MemoizedFn;
///
/// fn warm<M: MemoizedFn<u32>>(f: &M, keys: &[u32]) -> usize {
///     keys.iter().filter(|&&k| f.try_call(k).is_ok()).count()
/// }
///
/// let double = Memo::new(|n: &u32| n * 2, |_: &u32| true, true);
/// assert_eq!(warm(&double, &[1, 2, 3]), 3);
/// assert_eq!(double.cache_size(), 3);
/// ```
pub trait MemoizedFn<K> {
    /// Value produced for a key.
    type Output;

    /// Error produced by the underlying computation.
    type Error;

    /// Returns the cached value for `args`, computing it on a miss.
    fn try_call(&self, args: K) -> Result<Self::Output, Self::Error>;

    /// Drops the cached value for `args`; returns whether one was stored.
    fn invalidate(&self, args: &K) -> bool;

    /// Drops every cached value, keeping instrumentation counters.
    fn invalidate_all(&self);
}

/// Marker trait for caches that are safe to share across threads.
///
/// Use it as a bound where a cache is handed to worker threads:
///
/// ```
/// use std::sync::Arc;
///
/// use memokit::memo::Memo;
/// use memokit::traits::ConcurrentCache;
///
/// fn share<C: ConcurrentCache + 'static>(cache: Arc<C>) -> std::thread::JoinHandle<()> {
///     std::thread::spawn(move || drop(cache))
/// }
///
/// let memo = Arc::new(Memo::new(|n: &u8| *n, |_: &u8| true, false));
/// share(memo).join().unwrap();
/// ```
pub trait ConcurrentCache: Send + Sync {}

/// Construction-time settings for a memo.
///
/// ```
/// use memokit::stats::Instrumentation;
/// use memokit::traits::MemoConfig;
///
/// let config = MemoConfig::default();
/// assert_eq!(config.initial_capacity, 0);
/// assert_eq!(config.instrumentation, Instrumentation::Enabled);
///
/// let config = MemoConfig {
///     initial_capacity: 1024,
///     ..Default::default()
/// };
/// assert_eq!(config.initial_capacity, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoConfig {
    /// Number of entries the store is pre-sized for.
    pub initial_capacity: usize,

    /// Whether hits and misses are tracked. Fixed for the memo's lifetime.
    pub instrumentation: Instrumentation,
}

impl Default for MemoConfig {
    /// Creates a default configuration.
    ///
    /// Defaults:
    /// - `initial_capacity`: 0
    /// - `instrumentation`: `Enabled`
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            instrumentation: Instrumentation::Enabled,
        }
    }
}
