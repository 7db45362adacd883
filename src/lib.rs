//! memokit: thread-safe memoization with admission policies and hit/miss
//! instrumentation.
//!
//! The central type is [`Memo`](memo::Memo): it wraps a pure computation,
//! answers repeated calls from a store guarded by a single lock, and never
//! holds that lock while the computation runs.
//!
//! ```
//! use memokit::prelude::*;
//!
//! let digits = memoize(|n: &u64| n.to_string().len());
//! assert_eq!(digits.invoke(12345), 5);
//! assert_eq!(digits.invoke(12345), 5);
//! assert_eq!(digits.hits(), Some(1));
//! ```

pub mod admission;
pub mod builder;
pub mod computation;
pub mod error;
pub mod key;
pub mod memo;
pub mod stats;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

use std::hash::Hash;

use crate::memo::Memo;
use crate::stats::Instrumentation;

/// Memoizes `f`, storing every result and tracking hits and misses.
pub fn memoize<K, V, F>(f: F) -> Memo<K, V>
where
    K: Eq + Hash + 'static,
    V: Clone + 'static,
    F: Fn(&K) -> V + Send + Sync + 'static,
{
    Memo::new(f, admission::always::<V>, Instrumentation::Enabled)
}
