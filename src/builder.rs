//! Fluent construction for [`Memo`].
//!
//! [`Memo::new`] and [`Memo::try_new`] cover the common case. The builder adds
//! pre-sizing, custom hashers, and [`MemoConfig`], and validates that a
//! computation was actually supplied.
//!
//! ## Example
//!
//! ```rust
//! use memokit::builder::MemoBuilder;
//!
//! let memo = MemoBuilder::<u64, u64>::new()
//!     .compute(|n| n * n)
//!     .admit_if(|v| *v < 1_000)
//!     .initial_capacity(64)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(memo.invoke(12), 144);
//! assert_eq!(memo.invoke(40), 1_600);
//! assert_eq!(memo.cache_size(), 1);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;

use crate::admission::{Admission, Verdict};
use crate::computation::Computation;
use crate::error::ConfigError;
use crate::memo::Memo;
use crate::stats::Instrumentation;
use crate::traits::MemoConfig;

/// Builder for [`Memo`] instances.
///
/// The computation is required; everything else has a default:
/// admit everything, instrumentation enabled, empty store, [`FxBuildHasher`].
pub struct MemoBuilder<K, V, E = Infallible, S = FxBuildHasher> {
    compute: Option<Computation<K, V, E>>,
    admission: Option<Admission<V, E>>,
    config: MemoConfig,
    hasher: S,
}

impl<K, V> MemoBuilder<K, V>
where
    K: 'static,
    V: 'static,
{
    /// Creates a builder for an infallible computation.
    pub fn new() -> Self {
        Self::with_config(MemoConfig::default())
    }
}

impl<K, V> Default for MemoBuilder<K, V>
where
    K: 'static,
    V: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> MemoBuilder<K, V, E>
where
    K: 'static,
    V: 'static,
    E: 'static,
{
    /// Creates a builder whose computation and admission policy may fail
    /// with `E`.
    ///
    /// ```rust
    /// use memokit::builder::MemoBuilder;
    ///
    /// let memo = MemoBuilder::<u32, u32, String>::fallible()
    ///     .try_compute(|n| n.checked_mul(1_000_000).ok_or_else(|| format!("{n} overflows")))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(memo.try_invoke(3), Ok(3_000_000));
    /// assert_eq!(memo.try_invoke(5_000), Err("5000 overflows".to_string()));
    /// ```
    pub fn fallible() -> Self {
        Self::with_config(MemoConfig::default())
    }

    /// Creates a builder from a [`MemoConfig`].
    pub fn with_config(config: MemoConfig) -> Self {
        Self {
            compute: None,
            admission: None,
            config,
            hasher: FxBuildHasher,
        }
    }
}

impl<K, V, E, S> MemoBuilder<K, V, E, S>
where
    K: 'static,
    V: 'static,
    E: 'static,
{
    /// Sets an infallible computation.
    pub fn compute<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
    {
        self.compute = Some(Computation::from_fn(f));
        self
    }

    /// Sets a computation that may fail with `E`.
    pub fn try_compute<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
    {
        self.compute = Some(Computation::from_fallible(f));
        self
    }

    /// Stores only values for which `predicate` returns an admitting
    /// [`Verdict`].
    pub fn admit_if<P, R>(mut self, predicate: P) -> Self
    where
        P: Fn(&V) -> R + Send + Sync + 'static,
        R: Verdict,
    {
        self.admission = Some(Admission::from_predicate(predicate));
        self
    }

    /// Like [`admit_if`](Self::admit_if), for predicates that may fail with
    /// `E`. A failure is reported to the caller like a computation failure.
    pub fn try_admit_if<P, R>(mut self, predicate: P) -> Self
    where
        P: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
        R: Verdict,
    {
        self.admission = Some(Admission::from_fallible(predicate));
        self
    }

    /// Sets the instrumentation mode.
    pub fn instrumentation(mut self, instrumentation: Instrumentation) -> Self {
        self.config.instrumentation = instrumentation;
        self
    }

    /// Shorthand for [`instrumentation`](Self::instrumentation) from a flag.
    pub fn track_hits(self, track_hits: bool) -> Self {
        self.instrumentation(track_hits.into())
    }

    /// Pre-sizes the store for `capacity` entries. This is not a bound: the
    /// store grows without eviction.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Replaces instrumentation and capacity settings with `config`.
    pub fn config(mut self, config: MemoConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `hasher` for the store instead of [`FxBuildHasher`].
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    ///
    /// use memokit::builder::MemoBuilder;
    ///
    /// let memo = MemoBuilder::<String, usize>::new()
    ///     .compute(|s| s.len())
    ///     .hasher(RandomState::new())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(memo.invoke("four".to_string()), 4);
    /// ```
    pub fn hasher<S2>(self, hasher: S2) -> MemoBuilder<K, V, E, S2> {
        MemoBuilder {
            compute: self.compute,
            admission: self.admission,
            config: self.config,
            hasher,
        }
    }

    /// Builds the memo.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no computation was set.
    pub fn build(self) -> Result<Memo<K, V, E, S>, ConfigError>
    where
        K: Eq + Hash,
        V: Clone,
        S: BuildHasher,
    {
        let compute = self.compute.ok_or_else(|| {
            ConfigError::new("a computation is required: call compute() or try_compute()")
        })?;
        Ok(Memo::from_parts(
            compute,
            self.admission.unwrap_or_default(),
            self.config.instrumentation,
            self.config.initial_capacity,
            self.hasher,
        ))
    }
}

impl<K, V, E, S> fmt::Debug for MemoBuilder<K, V, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoBuilder")
            .field("has_compute", &self.compute.is_some())
            .field("has_admission", &self.admission.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
