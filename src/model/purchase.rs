//! Purchase line items

use std::io::{Read, Write};

use crate::codec::{Decode, Encode};
use crate::error::{Result, SeqError};

/// Bytes reserved for a prescription code
pub const PRESCRIPTION_LEN: usize = 19;

/// One line of an order: an article and how many of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// Index of the article in the store's article sequence
    pub article_id: u64,
    pub quantity: i64,
    /// NUL-padded prescription code, all zeros when none
    pub prescription: [u8; PRESCRIPTION_LEN],
}

impl Purchase {
    pub fn new(article_id: u64, quantity: i64) -> Self {
        Self {
            article_id,
            quantity,
            prescription: [0; PRESCRIPTION_LEN],
        }
    }

    /// Attach a prescription code of at most `PRESCRIPTION_LEN` bytes
    pub fn with_prescription(mut self, code: &str) -> Result<Self> {
        if code.len() > PRESCRIPTION_LEN {
            return Err(SeqError::InvalidField(format!(
                "prescription code is {} bytes (max {})",
                code.len(),
                PRESCRIPTION_LEN
            )));
        }
        self.prescription = [0; PRESCRIPTION_LEN];
        self.prescription[..code.len()].copy_from_slice(code.as_bytes());
        Ok(self)
    }

    /// The code up to the first NUL, or `None` when unset or not UTF-8
    pub fn prescription(&self) -> Option<&str> {
        let end = self
            .prescription
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PRESCRIPTION_LEN);
        match std::str::from_utf8(&self.prescription[..end]) {
            Ok("") | Err(_) => None,
            Ok(code) => Some(code),
        }
    }
}

impl Encode for Purchase {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.article_id.encode(writer)?;
        self.quantity.encode(writer)?;
        self.prescription.encode(writer)
    }
}

impl Decode for Purchase {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            article_id: u64::decode(reader)?,
            quantity: i64::decode(reader)?,
            prescription: <[u8; PRESCRIPTION_LEN]>::decode(reader)?,
        })
    }
}
