//! # seqstore
//!
//! A growable sequence container with binary persistence, and the inventory
//! records built on it:
//! - `Sequence<T>` with an explicit growth policy and fallible allocation
//! - Shift-based insertion/removal that preserves element order
//! - Length-prefixed binary format, nesting for sequences inside elements
//! - A store that saves articles, orders and users to one checksummed file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │          (articles, orders, users → one file)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Model                               │
//! │        Article   Order(Sequence<Purchase>)   User           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Sequence   │          │    Codec    │
//!   │ (RawBuf<T>) │          │ Encode/Dec. │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod sequence;
pub mod model;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SeqError, Result};
pub use config::{Config, LoadPolicy};
pub use sequence::{Growth, Sequence, SharedSequence, INVALID_INDEX};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of seqstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
