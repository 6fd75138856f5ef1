//! Primitive codecs
//!
//! Fixed-width integers, fixed byte arrays and length-prefixed text.

use std::io::{Read, Write};

use crate::error::{Result, SeqError};

use super::{Decode, Encode};

/// Longest text accepted by the decoder (1 MiB)
pub const MAX_TEXT_LEN: u64 = 1024 * 1024;

impl Encode for u8 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[*self])?;
        Ok(())
    }
}

impl Decode for u8 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}

impl Encode for u64 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_le_bytes())?;
        Ok(())
    }
}

impl Decode for u64 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; 8];
        reader.read_exact(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

impl Encode for i64 {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_le_bytes())?;
        Ok(())
    }
}

impl Decode for i64 {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; 8];
        reader.read_exact(&mut bytes)?;
        Ok(i64::from_le_bytes(bytes))
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self)?;
        Ok(())
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; N];
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

impl Encode for str {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        (self.len() as u64).encode(writer)?;
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

impl Encode for String {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.as_str().encode(writer)
    }
}

impl Decode for String {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let len = u64::decode(reader)?;
        if len > MAX_TEXT_LEN {
            return Err(SeqError::Decode(format!(
                "text length {} exceeds maximum {}",
                len, MAX_TEXT_LEN
            )));
        }

        let mut bytes = vec![0u8; len as usize];
        reader.read_exact(&mut bytes)?;

        String::from_utf8(bytes).map_err(|e| SeqError::Decode(format!("text is not UTF-8: {}", e)))
    }
}
