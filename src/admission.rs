//! Admission policies: which freshly computed values get stored.
//!
//! Every miss runs the computation and then asks the admission policy about
//! the result. Only admitted values are inserted into the store; rejected
//! values are still returned to the caller, they are just not remembered.
//!
//! ## Verdicts
//!
//! A policy returns any type implementing [`Verdict`]. The rule is
//! "everything admits except false and none":
//!
//! | Verdict value          | Admits? |
//! |------------------------|---------|
//! | `true`                 | yes     |
//! | `false`                | no      |
//! | `None`                 | no      |
//! | `Some(v)`              | `v.admits()` |
//!
//! `Result` is not a verdict. Predicates that can fail go through
//! [`Memo::try_new`](crate::memo::Memo::try_new),
//! [`MemoBuilder::try_admit_if`](crate::builder::MemoBuilder::try_admit_if) or
//! [`Admission::from_fallible`], where an `Err` propagates to the caller
//! like a failing computation instead of reading as a rejection.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::admission::{self, Admission, Verdict};
//!
//! let even = Admission::<u64>::from_predicate(|v: &u64| v % 2 == 0);
//! assert_eq!(even.evaluate(&4), Ok(true));
//! assert_eq!(even.evaluate(&9), Ok(false));
//!
//! let all = Admission::<u64>::from_predicate(admission::always::<u64>);
//! assert_eq!(all.evaluate(&9), Ok(true));
//!
//! assert!(Some(true).admits());
//! assert!(!None::<bool>.admits());
//! ```

use std::convert::Infallible;
use std::fmt;

/// A boolean-like answer from an admission predicate.
///
/// An infallible constructor does not accept a predicate returning `Result`:
///
/// ```compile_fail
/// use memokit::memo::Memo;
///
/// let memo = Memo::new(
///     |n: &u32| *n,
///     |v: &u32| if *v == 13 { Err("no verdict") } else { Ok(true) },
///     true,
/// );
/// ```
pub trait Verdict {
    /// Returns `true` if the verdict admits the value.
    fn admits(&self) -> bool;
}

impl Verdict for bool {
    #[inline]
    fn admits(&self) -> bool {
        *self
    }
}

impl<T: Verdict> Verdict for Option<T> {
    #[inline]
    fn admits(&self) -> bool {
        self.as_ref().is_some_and(Verdict::admits)
    }
}

impl<T: Verdict + ?Sized> Verdict for &T {
    #[inline]
    fn admits(&self) -> bool {
        (**self).admits()
    }
}

/// Predicate that admits every value.
#[inline]
pub fn always<V: ?Sized>(_value: &V) -> bool {
    true
}

/// Predicate that admits nothing; the memo degrades to a counted pass-through.
#[inline]
pub fn never<V: ?Sized>(_value: &V) -> bool {
    false
}

type PredicateFn<V, E> = dyn Fn(&V) -> Result<bool, E> + Send + Sync;

/// Type-erased admission predicate held by a memo.
pub struct Admission<V, E = Infallible> {
    predicate: Box<PredicateFn<V, E>>,
}

impl<V: 'static, E: 'static> Admission<V, E> {
    /// Wraps an infallible predicate.
    pub fn from_predicate<P, R>(predicate: P) -> Self
    where
        P: Fn(&V) -> R + Send + Sync + 'static,
        R: Verdict,
    {
        Self {
            predicate: Box::new(move |value: &V| Ok(predicate(value).admits())),
        }
    }

    /// Wraps a predicate that may fail. Its error propagates out of the
    /// invoking call exactly like a computation error.
    pub fn from_fallible<P, R>(predicate: P) -> Self
    where
        P: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
        R: Verdict,
    {
        Self {
            predicate: Box::new(move |value: &V| {
                predicate(value).map(|verdict| verdict.admits())
            }),
        }
    }

    /// Admits every value.
    pub fn admit_all() -> Self {
        Self::from_predicate(always::<V>)
    }

    /// Admits nothing.
    pub fn admit_none() -> Self {
        Self::from_predicate(never::<V>)
    }
}

impl<V, E> Admission<V, E> {
    /// Runs the predicate against `value`.
    #[inline]
    pub fn evaluate(&self, value: &V) -> Result<bool, E> {
        (self.predicate)(value)
    }
}

impl<V: 'static, E: 'static> Default for Admission<V, E> {
    fn default() -> Self {
        Self::admit_all()
    }
}

impl<V, E> fmt::Debug for Admission<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Admission").finish_non_exhaustive()
    }
}
