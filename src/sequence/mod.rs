//! Sequence Module
//!
//! A growable, contiguous container of fixed-layout elements with an explicit
//! growth policy and a length-prefixed binary format.
//!
//! ## Responsibilities
//! - Own the backing buffer and every populated element
//! - Grow by an initial block of 8, then doubling, then a single slot
//! - Shift-based insertion and removal that keeps element order
//! - Early-exit traversal in both directions
//! - Binary write/read for element types with a codec
//!
//! ## Slot Layout
//! ```text
//! ┌───────┬───────┬─────┬───────────┬──────────────┬─────┐
//! │ [0]   │ [1]   │ ... │ [len - 1] │ [len] unused │ ... │
//! └───────┴───────┴─────┴───────────┴──────────────┴─────┘
//! |<------------ populated ------------>|
//! |<------------------------ capacity ------------------->|
//! ```
//!
//! ## Wire Format
//! ```text
//! ┌────────────────┬────────────┬────────────┬─────┐
//! │ Count: u64 LE  │ Element 0  │ Element 1  │ ... │
//! └────────────────┴────────────┴────────────┴─────┘
//! ```
//! Elements use their own `Encode`/`Decode` formats; nested sequences appear
//! as nested instances of the same layout.

mod container;
mod raw;
mod serial;
mod shared;

pub use container::Sequence;
pub use shared::SharedSequence;

/// Reserved "no such index" value. Never a valid index or length.
pub const INVALID_INDEX: u64 = u64::MAX;

/// Slots allocated by the first append into an empty sequence
pub const INITIAL_CAPACITY: usize = 8;

/// Largest capacity a sequence will ever request.
/// Keeps every length strictly below `INVALID_INDEX`.
pub(crate) const MAX_SLOTS: usize = usize::MAX - 1;

/// Outcome of a successful capacity request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// The buffer was reallocated
    Reallocated,

    /// The buffer already satisfied the request
    AlreadySufficient,
}
