//! Orders
//!
//! An order owns a nested sequence of purchases. Its encoding embeds that
//! sequence's own write/read format.

use std::io::{Read, Write};

use crate::codec::{Decode, Encode};
use crate::error::Result;
use crate::sequence::Sequence;

use super::{Article, Purchase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    pub purchases: Sequence<Purchase>,
    /// Index of the ordering user in the store's user sequence
    pub user_id: u64,
}

impl Order {
    pub fn new(user_id: u64) -> Self {
        Self {
            purchases: Sequence::new(),
            user_id,
        }
    }

    /// Total price in cents with VAT, using current article prices.
    ///
    /// Lines pointing at unknown articles contribute nothing.
    pub fn total_cents(&self, articles: &Sequence<Article>) -> i64 {
        self.purchases
            .iter()
            .filter_map(|line| {
                let article = articles.get(usize::try_from(line.article_id).ok()?)?;
                Some(article.price_with_vat_cents().saturating_mul(line.quantity))
            })
            .fold(0i64, i64::saturating_add)
    }
}

impl Encode for Order {
    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        self.purchases.write(writer)?;
        self.user_id.encode(writer)
    }
}

impl Decode for Order {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut purchases = Sequence::new();
        purchases.read(reader)?;
        Ok(Self {
            purchases,
            user_id: u64::decode(reader)?,
        })
    }
}
