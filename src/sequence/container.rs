//! Sequence container
//!
//! Capacity management, shift insertion/removal, traversal and teardown.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::slice;

use tracing::{debug, trace};

use crate::error::{Result, SeqError};

use super::raw::RawBuf;
use super::{Growth, INITIAL_CAPACITY, MAX_SLOTS};

/// A growable sequence that exclusively owns its elements.
///
/// Elements live in `[0, len)`; slots `[len, capacity)` are allocated but
/// unpopulated. Dropping an element is the element's `Drop`: removing
/// operations (`remove_at`, `clear`, `free`, dropping the sequence) release
/// elements, while `pop`/`pop_at` hand ownership to the caller.
///
/// Allocation failure never panics in the fallible operations: it is
/// reported as [`SeqError::Allocation`] and the sequence is left unchanged.
/// Out-of-range positions are caller bugs and panic.
pub struct Sequence<T> {
    buf: RawBuf<T>,
    len: usize,
    /// Upper bound on capacity; growth past it counts as allocation failure
    limit: usize,
}

impl<T> Sequence<T> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create an empty sequence. No allocation is performed.
    pub const fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            limit: MAX_SLOTS,
        }
    }

    /// Create an empty sequence whose capacity may never exceed `max_slots`
    pub fn with_limit(max_slots: usize) -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            limit: max_slots.min(MAX_SLOTS),
        }
    }

    // =========================================================================
    // Capacity Management
    // =========================================================================

    /// Make room for one more element at the end.
    ///
    /// Empty buffers get an initial block of [`INITIAL_CAPACITY`] slots (or the
    /// limit, if smaller). Full buffers try to double, then fall back to a
    /// single extra slot. On failure nothing changes.
    pub fn ensure_capacity_for_append(&mut self) -> Result<Growth> {
        let cap = self.capacity();

        if cap == 0 {
            let initial = INITIAL_CAPACITY.min(self.limit);
            if initial == 0 || !self.grow_to(initial) {
                return Err(SeqError::Allocation {
                    requested: INITIAL_CAPACITY as u64,
                });
            }
            trace!(capacity = initial, "allocated initial block");
            return Ok(Growth::Reallocated);
        }

        if self.len < cap {
            return Ok(Growth::AlreadySufficient);
        }

        if let Some(doubled) = cap.checked_mul(2) {
            if self.grow_to(doubled) {
                trace!(from = cap, to = doubled, "doubled capacity");
                return Ok(Growth::Reallocated);
            }
        }

        let plus_one = cap + 1;
        if self.grow_to(plus_one) {
            debug!(from = cap, to = plus_one, "doubling refused, grew by one slot");
            return Ok(Growth::Reallocated);
        }

        debug!(capacity = cap, "append growth refused");
        Err(SeqError::Allocation {
            requested: plus_one as u64,
        })
    }

    /// Ensure at least `slots` slots are allocated.
    ///
    /// Grows to exactly `slots` in one allocation; never doubles.
    pub fn reserve(&mut self, slots: usize) -> Result<Growth> {
        if self.capacity() >= slots {
            return Ok(Growth::AlreadySufficient);
        }
        if !self.grow_to(slots) {
            debug!(requested = slots, capacity = self.capacity(), "reserve refused");
            return Err(SeqError::Allocation {
                requested: slots as u64,
            });
        }
        debug!(capacity = slots, "reserved");
        Ok(Growth::Reallocated)
    }

    /// Reallocate down to exactly `len` slots.
    ///
    /// Best effort: on failure the sequence is unchanged.
    pub fn shrink_to_fit(&mut self) -> Result<Growth> {
        if self.len == self.capacity() {
            return Ok(Growth::AlreadySufficient);
        }
        if !self.buf.try_resize(self.len) {
            return Err(SeqError::Allocation {
                requested: self.len as u64,
            });
        }
        debug!(capacity = self.len, "shrunk to fit");
        Ok(Growth::Reallocated)
    }

    fn grow_to(&mut self, slots: usize) -> bool {
        slots <= self.limit && self.buf.try_resize(slots)
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Append `value`. Amortized O(1).
    ///
    /// On allocation failure `value` is dropped and the sequence is unchanged.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.ensure_capacity_for_append()?;
        // SAFETY: ensure_capacity_for_append guarantees len < capacity
        unsafe { self.buf.ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Insert `value` at `position`, shifting `[position, len)` up one slot.
    ///
    /// `position == len` appends. O(len - position).
    ///
    /// # Panics
    /// If `position > len`.
    pub fn push_at(&mut self, value: T, position: usize) -> Result<()> {
        assert!(
            position <= self.len,
            "push_at position {} out of bounds (len {})",
            position,
            self.len
        );
        self.ensure_capacity_for_append()?;
        // SAFETY: len < capacity, so [position + 1, len + 1) is allocated;
        // ptr::copy tolerates the overlap.
        unsafe {
            let slot = self.buf.ptr().add(position);
            ptr::copy(slot, slot.add(1), self.len - position);
            slot.write(value);
        }
        self.len += 1;
        Ok(())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove and return the last element without dropping it.
    ///
    /// # Panics
    /// If the sequence is empty.
    pub fn pop(&mut self) -> T {
        assert!(self.len > 0, "pop on an empty Sequence");
        self.len -= 1;
        // SAFETY: the slot at the old last index is populated and is now
        // outside [0, len), so it is read exactly once.
        unsafe { self.buf.ptr().add(self.len).read() }
    }

    /// Non-panicking `pop`
    pub fn try_pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            Some(self.pop())
        }
    }

    /// Remove and return the element at `position`, shifting everything after
    /// it down one slot. Order of the remaining elements is preserved.
    ///
    /// # Panics
    /// If `position >= len`.
    pub fn pop_at(&mut self, position: usize) -> T {
        assert!(
            position < self.len,
            "pop_at position {} out of bounds (len {})",
            position,
            self.len
        );
        // SAFETY: position is populated; (position, len) is moved down by one
        // and the stale last slot falls outside the new len.
        unsafe {
            let slot = self.buf.ptr().add(position);
            let value = slot.read();
            ptr::copy(slot.add(1), slot, self.len - position - 1);
            self.len -= 1;
            value
        }
    }

    /// Drop the element at `position` and close the gap.
    ///
    /// # Panics
    /// If `position >= len`.
    pub fn remove_at(&mut self, position: usize) {
        drop(self.pop_at(position));
    }

    /// Drop every element, keeping the allocation
    pub fn clear(&mut self) {
        let len = self.len;
        // len first, so a panicking Drop cannot cause a double drop
        self.len = 0;
        // SAFETY: [0, len) was populated and is no longer reachable
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), len));
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Visit elements from index 0 upwards until `predicate` returns true.
    ///
    /// Returns the index of the first match, or `None` if nothing matched.
    /// The predicate may mutate the element it is given.
    pub fn iterate_forward<F>(&mut self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&mut T) -> bool,
    {
        self.as_mut_slice()
            .iter_mut()
            .position(|item| predicate(item))
    }

    /// Visit elements from the last index down to 0 until `predicate` returns
    /// true.
    pub fn iterate_backward<F>(&mut self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&mut T) -> bool,
    {
        self.as_mut_slice()
            .iter_mut()
            .rposition(|item| predicate(item))
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Drop every element and release the buffer.
    ///
    /// The sequence is left exactly as `Sequence::new()` (keeping its limit)
    /// and may be reused. Calling this on an empty sequence is a no-op.
    pub fn free(&mut self) {
        self.clear();
        self.buf.release();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.buf.cap()
    }

    /// Capacity ceiling set by `with_limit`
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is populated; ptr is non-null and aligned even
        // when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self gives exclusive access
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// `push` for contexts that cannot report errors (trait impls).
    fn push_or_panic(&mut self, value: T) {
        if let Err(err) = self.push(value) {
            panic!("Sequence growth failed: {}", err);
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T> Drop for Sequence<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_limit(self.limit);
        if let Err(err) = out.reserve(self.len) {
            panic!("Sequence clone failed: {}", err);
        }
        for item in self.iter() {
            out.push_or_panic(item.clone());
        }
        out
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T> Index<usize> for Sequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for Sequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        seq.extend(iter);
        seq
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_or_panic(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Sequence<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
