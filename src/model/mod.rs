//! Model Module
//!
//! Inventory records stored in sequences and persisted by the store.
//!
//! ## Encodings
//! ```text
//! Article   Name: text | Meta: u8 | Price: i64 (cents) | Stock: i64
//! Purchase  ArticleId: u64 | Quantity: i64 | Prescription: [u8; 19]
//! Order     Purchases: Sequence<Purchase> | UserId: u64
//! User      Name: text | NIF: [u8; 9] | CC: [u8; 12]
//! ```

mod article;
mod order;
mod purchase;
mod user;

pub use article::{Article, ArticleMeta, VatRate};
pub use order::Order;
pub use purchase::{Purchase, PRESCRIPTION_LEN};
pub use user::{User, CC_LEN, NIF_LEN};
