//! Sequence serialization
//!
//! `write`/`read` exist only for element types with a codec.

use std::io::{Read, Write};

use tracing::{debug, warn};

use crate::codec::{Decode, Encode};
use crate::error::{Result, SeqError};

use super::{Sequence, INVALID_INDEX};

impl<T: Encode> Sequence<T> {
    /// Write the element count as a u64, then every element in order.
    ///
    /// Stops at the first failing write; whatever was already written stays
    /// in the stream.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        (self.len() as u64).encode(writer)?;
        for item in self.iter() {
            item.encode(writer)?;
        }
        debug!(count = self.len(), "wrote sequence");
        Ok(())
    }
}

impl<T: Decode> Sequence<T> {
    /// Replace the contents with a sequence read from `reader`.
    ///
    /// Existing elements are dropped first. Capacity for the whole count is
    /// reserved up front. If an element fails to decode, the sequence keeps
    /// exactly the elements decoded before it and the error is
    /// [`SeqError::PartialRead`]; whether to keep or `free` them is the
    /// caller's decision.
    pub fn read<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        self.clear();

        let count = u64::decode(reader)?;
        if count == INVALID_INDEX {
            warn!("sequence count is the invalid-index sentinel");
            return Err(SeqError::Corrupt(
                "sequence count equals the invalid-index sentinel".to_string(),
            ));
        }

        let slots = usize::try_from(count).map_err(|_| SeqError::Allocation { requested: count })?;
        self.reserve(slots)?;

        for decoded in 0..count {
            match T::decode(reader) {
                // Capacity was reserved above, so push never reallocates here
                Ok(item) => self.push(item)?,
                Err(err) => {
                    warn!(decoded, expected = count, error = %err, "sequence read stopped early");
                    return Err(SeqError::PartialRead {
                        decoded,
                        expected: count,
                        source: Box::new(err),
                    });
                }
            }
        }

        debug!(count, "read sequence");
        Ok(())
    }
}

// Nested sequences are elements like any other.

impl<T: Encode> Encode for Sequence<T> {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.write(writer)
    }
}

impl<T: Decode> Decode for Sequence<T> {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut seq = Sequence::new();
        seq.read(reader)?;
        Ok(seq)
    }
}
