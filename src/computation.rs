//! The wrapped computation.
//!
//! A memo stores its computation type-erased so that `Memo<K, V, E>` can be
//! named, stored in structs, and shared across threads without carrying the
//! closure type around. Infallible computations are lifted into
//! `Result<V, Infallible>`, which lets one invoke path serve both shapes.

use std::convert::Infallible;
use std::fmt;

type ComputeFn<K, V, E> = dyn Fn(&K) -> Result<V, E> + Send + Sync;

/// Type-erased computation from an argument key to a value.
///
/// # Example
///
/// ```
/// use memokit::computation::Computation;
///
/// let square = Computation::<u64, u64>::from_fn(|n| n * n);
/// assert_eq!(square.run(&7), Ok(49));
///
/// let parse = Computation::<String, i32, std::num::ParseIntError>::from_fallible(|s| s.parse());
/// assert!(parse.run(&"12".to_string()).is_ok());
/// assert!(parse.run(&"x".to_string()).is_err());
/// ```
pub struct Computation<K, V, E = Infallible> {
    f: Box<ComputeFn<K, V, E>>,
}

impl<K: 'static, V: 'static, E: 'static> Computation<K, V, E> {
    /// Wraps a computation that cannot fail.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
    {
        Self {
            f: Box::new(move |args: &K| Ok(f(args))),
        }
    }

    /// Wraps a computation that reports failure through `Result`.
    pub fn from_fallible<F>(f: F) -> Self
    where
        F: Fn(&K) -> Result<V, E> + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }
}

impl<K, V, E> Computation<K, V, E> {
    /// Runs the computation for `args`.
    #[inline]
    pub fn run(&self, args: &K) -> Result<V, E> {
        (self.f)(args)
    }
}

impl<K, V, E> fmt::Debug for Computation<K, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation").finish_non_exhaustive()
    }
}
