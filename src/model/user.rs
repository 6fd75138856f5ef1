//! Users

use std::io::{Read, Write};

use crate::codec::{Decode, Encode};
use crate::error::{Result, SeqError};

/// Tax number length in bytes
pub const NIF_LEN: usize = 9;

/// Citizen card number length in bytes
pub const CC_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub nif: [u8; NIF_LEN],
    pub cc: [u8; CC_LEN],
}

impl User {
    /// Build a user.
    ///
    /// `nif` must be 9 ASCII digits. `cc` must be 9 digits, 2 letters and a
    /// final check digit.
    pub fn new(name: impl Into<String>, nif: &str, cc: &str) -> Result<Self> {
        let nif: [u8; NIF_LEN] = fixed_field("NIF", nif)?;
        if !is_valid_nif(&nif) {
            return Err(SeqError::InvalidField(format!(
                "NIF must be {} digits",
                NIF_LEN
            )));
        }

        let cc: [u8; CC_LEN] = fixed_field("CC", cc)?;
        if !is_valid_cc(&cc) {
            return Err(SeqError::InvalidField(
                "CC must be 9 digits, 2 letters and a digit".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            nif,
            cc,
        })
    }

    pub fn nif_str(&self) -> &str {
        std::str::from_utf8(&self.nif).unwrap_or("")
    }

    pub fn cc_str(&self) -> &str {
        std::str::from_utf8(&self.cc).unwrap_or("")
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            name: String::new(),
            nif: *b"000000000",
            cc: *b"000000000XY0",
        }
    }
}

fn fixed_field<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    value.as_bytes().try_into().map_err(|_| {
        SeqError::InvalidField(format!(
            "{} must be exactly {} bytes, got {}",
            field,
            N,
            value.len()
        ))
    })
}

fn is_valid_nif(nif: &[u8; NIF_LEN]) -> bool {
    nif.iter().all(u8::is_ascii_digit)
}

fn is_valid_cc(cc: &[u8; CC_LEN]) -> bool {
    cc[..9].iter().all(u8::is_ascii_digit)
        && cc[9..11].iter().all(u8::is_ascii_alphabetic)
        && cc[11].is_ascii_digit()
}

impl Encode for User {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.name.encode(writer)?;
        self.nif.encode(writer)?;
        self.cc.encode(writer)
    }
}

impl Decode for User {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            name: String::decode(reader)?,
            nif: <[u8; NIF_LEN]>::decode(reader)?,
            cc: <[u8; CC_LEN]>::decode(reader)?,
        })
    }
}
