//! Shared sequence
//!
//! One exclusive lock per sequence. Shifts and reallocation touch the whole
//! buffer, so there is no finer-grained locking to offer.

use parking_lot::{Mutex, MutexGuard};

use super::Sequence;

/// A `Sequence` behind a single `parking_lot::Mutex`
pub struct SharedSequence<T> {
    inner: Mutex<Sequence<T>>,
}

impl<T> SharedSequence<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Sequence::new()),
        }
    }

    /// Run `f` with exclusive access to the sequence
    pub fn with<R>(&self, f: impl FnOnce(&mut Sequence<T>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Hold the lock across several operations
    pub fn lock(&self) -> MutexGuard<'_, Sequence<T>> {
        self.inner.lock()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn into_inner(self) -> Sequence<T> {
        self.inner.into_inner()
    }
}

impl<T> Default for SharedSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Sequence<T>> for SharedSequence<T> {
    fn from(seq: Sequence<T>) -> Self {
        Self {
            inner: Mutex::new(seq),
        }
    }
}
