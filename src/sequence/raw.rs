//! Raw slot buffer
//!
//! Owns an allocation of `cap` slots of `T` and nothing else. It never reads,
//! writes or drops elements; `Sequence` tracks which slots are populated.

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// The buffer owns its slots the same way `Vec<T>` does.
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty buffer with no allocation
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn cap(&self) -> usize {
        self.cap
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Reallocate to exactly `new_cap` slots.
    ///
    /// Returns `false` when the allocator refuses or the layout would
    /// overflow; in that case the buffer (and its contents) is untouched.
    /// Slots past `new_cap` must already be logically empty when shrinking.
    pub(crate) fn try_resize(&mut self, new_cap: usize) -> bool {
        if new_cap == self.cap {
            return true;
        }
        if new_cap == 0 {
            self.release();
            return true;
        }
        if Self::IS_ZST {
            self.cap = new_cap;
            return true;
        }

        let new_layout = match Layout::array::<T>(new_cap) {
            Ok(layout) => layout,
            Err(_) => return false,
        };

        let raw = if self.cap == 0 {
            // SAFETY: new_layout has non-zero size (new_cap > 0, T not a ZST)
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout = match Layout::array::<T>(self.cap) {
                Ok(layout) => layout,
                Err(_) => return false,
            };
            // SAFETY: ptr was allocated with old_layout; new size is non-zero
            // and fits isize per the Layout::array check above.
            unsafe { alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) }
        };

        match NonNull::new(raw as *mut T) {
            Some(ptr) => {
                self.ptr = ptr;
                self.cap = new_cap;
                true
            }
            None => false,
        }
    }

    /// Free the allocation and return to the empty state
    pub(crate) fn release(&mut self) {
        if self.cap != 0 && !Self::IS_ZST {
            if let Ok(layout) = Layout::array::<T>(self.cap) {
                // SAFETY: ptr was allocated with exactly this layout
                unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
            }
        }
        self.ptr = NonNull::dangling();
        self.cap = 0;
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        self.release();
    }
}
