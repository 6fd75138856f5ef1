//! Article records
//!
//! An article has a name, a price in cents, a stock count and a metadata byte.
//!
//! ## Metadata Byte
//! ```text
//! bit  7 6 5 4 3 2 1 0
//!            │ │ │ └─┴── VAT class (0 normal, 1 intermediate, 2 reduced)
//!            │ │ └────── animal group
//!            │ └──────── prescription required
//!            └────────── disabled
//! ```

use std::io::{Read, Write};

use crate::codec::{Decode, Encode};
use crate::error::Result;

const VAT_MASK: u8 = 0b0000_0011;
const ANIMAL_GROUP: u8 = 0b0000_0100;
const NEEDS_PRESCRIPTION: u8 = 0b0000_1000;
const DISABLED: u8 = 0b0001_0000;

/// VAT class applied to an article's base price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VatRate {
    /// 23%
    Normal = 0,
    /// 13%
    Intermediate = 1,
    /// 6%
    Reduced = 2,
}

impl VatRate {
    pub fn percent(self) -> i64 {
        match self {
            VatRate::Normal => 23,
            VatRate::Intermediate => 13,
            VatRate::Reduced => 6,
        }
    }

    fn from_bits(bits: u8) -> Option<Self> {
        match bits & VAT_MASK {
            0 => Some(VatRate::Normal),
            1 => Some(VatRate::Intermediate),
            2 => Some(VatRate::Reduced),
            _ => None,
        }
    }
}

impl std::str::FromStr for VatRate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "normal" => Ok(VatRate::Normal),
            "intermediate" => Ok(VatRate::Intermediate),
            "reduced" => Ok(VatRate::Reduced),
            other => Err(format!("unknown VAT class '{}'", other)),
        }
    }
}

/// Packed article flags. Unknown bits are preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArticleMeta(pub u8);

impl ArticleMeta {
    /// `None` when the VAT bits hold the unused class 3
    pub fn vat(self) -> Option<VatRate> {
        VatRate::from_bits(self.0)
    }

    pub fn set_vat(&mut self, rate: VatRate) {
        self.0 = (self.0 & !VAT_MASK) | rate as u8;
    }

    pub fn is_animal(self) -> bool {
        self.0 & ANIMAL_GROUP != 0
    }

    pub fn set_animal(&mut self, on: bool) {
        self.set_flag(ANIMAL_GROUP, on);
    }

    pub fn requires_prescription(self) -> bool {
        self.0 & NEEDS_PRESCRIPTION != 0
    }

    pub fn set_requires_prescription(&mut self, on: bool) {
        self.set_flag(NEEDS_PRESCRIPTION, on);
    }

    pub fn is_disabled(self) -> bool {
        self.0 & DISABLED != 0
    }

    pub fn set_disabled(&mut self, on: bool) {
        self.set_flag(DISABLED, on);
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

/// An inventory article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub name: String,
    pub meta: ArticleMeta,
    /// Base price before VAT, in cents
    pub price_cents: i64,
    pub stock: i64,
}

impl Article {
    /// A normal-VAT article with no stock
    pub fn new(name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            name: name.into(),
            meta: ArticleMeta::default(),
            price_cents,
            stock: 0,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_vat(mut self, rate: VatRate) -> Self {
        self.meta.set_vat(rate);
        self
    }

    /// Unit price with VAT applied, rounded half up to whole cents.
    /// An unknown VAT class applies no tax.
    pub fn price_with_vat_cents(&self) -> i64 {
        let percent = self.meta.vat().map(VatRate::percent).unwrap_or(0);
        let scaled = self.price_cents as i128 * (100 + percent) as i128;
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl Encode for Article {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.name.encode(writer)?;
        self.meta.0.encode(writer)?;
        self.price_cents.encode(writer)?;
        self.stock.encode(writer)
    }
}

impl Decode for Article {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            name: String::decode(reader)?,
            meta: ArticleMeta(u8::decode(reader)?),
            price_cents: i64::decode(reader)?,
            stock: i64::decode(reader)?,
        })
    }
}
