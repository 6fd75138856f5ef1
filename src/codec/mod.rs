//! Codec Module
//!
//! Per-element binary encoders and decoders used by `Sequence::write` and
//! `Sequence::read`.
//!
//! ## Primitive Formats
//! ```text
//! u8            1 byte
//! u64 / i64     8 bytes, little-endian
//! [u8; N]       N raw bytes
//! String        Len: u64 LE | UTF-8 bytes (no terminator)
//! ```
//!
//! Records are the concatenation of their fields with no padding, tags or
//! checksums.

mod primitives;

use std::io::{Read, Write};

use crate::error::Result;

pub use primitives::MAX_TEXT_LEN;

/// Binary encoder for one element
pub trait Encode {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()>;
}

/// Binary decoder for one element
pub trait Decode: Sized {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self>;
}

/// Encode `value` into a fresh byte vector
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    value.encode(&mut bytes)?;
    Ok(bytes)
}

/// Decode a value from the front of `bytes`, ignoring anything after it
pub fn from_bytes<T: Decode>(mut bytes: &[u8]) -> Result<T> {
    T::decode(&mut bytes)
}
