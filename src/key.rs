//! Ordered argument lists used as memo keys.
//!
//! A memo is keyed by the *argument tuple* of the computation it wraps. Any
//! `K: Eq + Hash` works as a key: a scalar for unary functions, a Rust tuple
//! for fixed arities. [`Args`] covers the remaining case, a variadic argument
//! list whose length is only known at runtime.
//!
//! ## Equality and Hashing
//!
//! ```text
//!   Args[1, 2]    == Args[1, 2]      same length, element-wise equal
//!   Args[1, 2]    != Args[2, 1]      order matters
//!   Args[1, 2]    != Args[1, 2, 0]   length matters
//!   hash(Args[..]) == hash(&[..])    enables borrowed lookups by slice
//! ```
//!
//! `Args` owns its elements in a boxed slice and exposes no mutation, so a
//! key cannot change after it has been used to index a store.
//!
//! ## Example Usage
//!
//! ```
//! use memokit::args;
//! use memokit::key::Args;
//!
//! let key: Args<i64> = args![3, 4];
//! assert_eq!(key.len(), 2);
//! assert_eq!(key, Args::from(vec![3, 4]));
//! assert_ne!(key, args![4, 3]);
//! assert_eq!(key.as_slice(), &[3, 4]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Immutable, ordered argument list with structural equality and hashing.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Args<T>(Box<[T]>);

impl<T> Args<T> {
    /// Creates an argument list from a vector, preserving order.
    #[inline]
    pub fn from_vec(values: Vec<T>) -> Self {
        Self(values.into_boxed_slice())
    }

    /// Creates an empty argument list (the key of a nullary call).
    #[inline]
    pub fn empty() -> Self {
        Self(Box::default())
    }

    /// Returns the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the argument at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// Returns the arguments as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Consumes the list, returning the arguments as a vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.0.into_vec()
    }
}

impl<T> Deref for Args<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Borrow<[T]> for Args<T> {
    #[inline]
    fn borrow(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Args<T> {
    #[inline]
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Args<T> {
    #[inline]
    fn from(values: [T; N]) -> Self {
        Self::from_vec(Vec::from(values))
    }
}

impl<T: Clone> From<&[T]> for Args<T> {
    #[inline]
    fn from(values: &[T]) -> Self {
        Self(values.into())
    }
}

impl<T> FromIterator<T> for Args<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Args<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Args<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Args")?;
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Builds an [`Args`] key from a comma-separated list of arguments.
///
/// ```
/// use memokit::args;
///
/// let key = args!["a", "b"];
/// assert_eq!(key.len(), 2);
/// let nullary: memokit::key::Args<u8> = args![];
/// assert!(nullary.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::key::Args::empty()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::key::Args::from_vec(::std::vec![$($arg),+])
    };
}
