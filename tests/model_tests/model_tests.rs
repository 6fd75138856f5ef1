//! Tests for model records
//!
//! These tests verify:
//! - Field encodings of articles, purchases, orders and users
//! - Article metadata flags
//! - Order totals with VAT
//! - Orders carrying nested purchase sequences through a round trip

use std::io::Cursor;

use seqstore::codec::{from_bytes, to_bytes};
use seqstore::model::{
    Article, ArticleMeta, Order, Purchase, User, VatRate, CC_LEN, NIF_LEN, PRESCRIPTION_LEN,
};
use seqstore::{SeqError, Sequence};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_order() -> Order {
    let mut order = Order::new(3);
    order.purchases.push(Purchase::new(0, 2)).unwrap();
    order
        .purchases
        .push(Purchase::new(1, 1).with_prescription("1234567890123456789").unwrap())
        .unwrap();
    order
}

fn catalogue() -> Sequence<Article> {
    [
        Article::new("Vitamin C", 1000),
        Article::new("Insulin", 2000).with_vat(VatRate::Reduced),
    ]
    .into_iter()
    .collect()
}

// =============================================================================
// Article Tests
// =============================================================================

#[test]
fn test_article_encoding_layout() {
    let mut article = Article::new("Gauze", 199).with_stock(-3);
    article.meta.set_disabled(true);

    let bytes = to_bytes(&article).unwrap();

    let mut expected = 5u64.to_le_bytes().to_vec();
    expected.extend_from_slice(b"Gauze");
    expected.push(0b0001_0000);
    expected.extend_from_slice(&199i64.to_le_bytes());
    expected.extend_from_slice(&(-3i64).to_le_bytes());
    assert_eq!(bytes, expected);

    assert_eq!(from_bytes::<Article>(&bytes).unwrap(), article);
}

#[test]
fn test_article_meta_flags() {
    let mut meta = ArticleMeta::default();
    assert_eq!(meta.vat(), Some(VatRate::Normal));

    meta.set_vat(VatRate::Intermediate);
    meta.set_animal(true);
    meta.set_requires_prescription(true);
    assert_eq!(meta.vat(), Some(VatRate::Intermediate));
    assert!(meta.is_animal());
    assert!(meta.requires_prescription());
    assert!(!meta.is_disabled());
    assert_eq!(meta.0, 0b0000_1101);

    meta.set_animal(false);
    meta.set_vat(VatRate::Reduced);
    assert_eq!(meta.0, 0b0000_1010);
}

#[test]
fn test_unknown_meta_bits_survive_round_trip() {
    let mut article = Article::new("Odd", 1);
    article.meta = ArticleMeta(0b1110_0011);
    assert_eq!(article.meta.vat(), None);

    let decoded: Article = from_bytes(&to_bytes(&article).unwrap()).unwrap();
    assert_eq!(decoded.meta, ArticleMeta(0b1110_0011));
}

#[test]
fn test_price_with_vat_rounds_half_up() {
    assert_eq!(Article::new("a", 1000).price_with_vat_cents(), 1230);
    assert_eq!(
        Article::new("b", 1000).with_vat(VatRate::Intermediate).price_with_vat_cents(),
        1130
    );
    // 250 * 1.06 = 265
    assert_eq!(
        Article::new("c", 250).with_vat(VatRate::Reduced).price_with_vat_cents(),
        265
    );
    // 50 * 1.13 = 56.5
    assert_eq!(
        Article::new("d", 50).with_vat(VatRate::Intermediate).price_with_vat_cents(),
        57
    );
}

#[test]
fn test_vat_rate_from_str() {
    assert_eq!("reduced".parse::<VatRate>().unwrap(), VatRate::Reduced);
    assert!("luxury".parse::<VatRate>().is_err());
}

// =============================================================================
// Purchase Tests
// =============================================================================

#[test]
fn test_purchase_encoding_is_fixed_width() {
    let purchase = Purchase::new(7, 4).with_prescription("RX42").unwrap();
    let bytes = to_bytes(&purchase).unwrap();

    assert_eq!(bytes.len(), 8 + 8 + PRESCRIPTION_LEN);
    assert_eq!(&bytes[..8], &7u64.to_le_bytes());
    assert_eq!(&bytes[8..16], &4i64.to_le_bytes());
    assert_eq!(&bytes[16..20], b"RX42");
    assert!(bytes[20..].iter().all(|&b| b == 0));

    let decoded: Purchase = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, purchase);
    assert_eq!(decoded.prescription(), Some("RX42"));
}

#[test]
fn test_purchase_without_prescription() {
    assert_eq!(Purchase::new(1, 1).prescription(), None);
}

#[test]
fn test_prescription_too_long_is_rejected() {
    let err = Purchase::new(1, 1)
        .with_prescription("12345678901234567890")
        .unwrap_err();
    assert!(matches!(err, SeqError::InvalidField(_)));
}

// =============================================================================
// Order Tests
// =============================================================================

#[test]
fn test_order_encoding_embeds_purchase_sequence() {
    let order = sample_order();
    let bytes = to_bytes(&order).unwrap();

    let mut expected = Vec::new();
    order.purchases.write(&mut expected).unwrap();
    expected.extend_from_slice(&3u64.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_orders_round_trip_recursively() {
    let mut orders: Sequence<Order> = Sequence::new();
    orders.push(sample_order()).unwrap();
    orders.push(Order::new(9)).unwrap();

    let mut bytes = Vec::new();
    orders.write(&mut bytes).unwrap();

    let mut decoded: Sequence<Order> = Sequence::new();
    decoded.read(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(decoded, orders);
    assert_eq!(decoded[0].purchases.len(), 2);
    assert_eq!(decoded[0].purchases[1].prescription(), Some("1234567890123456789"));
    assert!(decoded[1].purchases.is_empty());
}

#[test]
fn test_corrupt_nested_purchases_fail_the_order() {
    let mut orders: Sequence<Order> = Sequence::new();
    orders.push(Order::new(1)).unwrap();
    orders.push(sample_order()).unwrap();

    let mut bytes = Vec::new();
    orders.write(&mut bytes).unwrap();
    // Drop the tail of the second order's last purchase and its user id
    bytes.truncate(bytes.len() - 12);

    let mut decoded: Sequence<Order> = Sequence::new();
    let err = decoded.read(&mut Cursor::new(bytes)).unwrap_err();

    assert_eq!(err.decoded_count(), Some(1));
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].user_id, 1);
}

#[test]
fn test_order_total_applies_vat() {
    let order = sample_order();
    // 2 x 1230 + 1 x 2120
    assert_eq!(order.total_cents(&catalogue()), 4580);
}

#[test]
fn test_order_total_skips_unknown_articles() {
    let mut order = Order::new(0);
    order.purchases.push(Purchase::new(0, 1)).unwrap();
    order.purchases.push(Purchase::new(99, 5)).unwrap();
    assert_eq!(order.total_cents(&catalogue()), 1230);
}

// =============================================================================
// User Tests
// =============================================================================

#[test]
fn test_user_encoding_layout() {
    let user = User::new("Ana", "123456789", "123456789ZZ4").unwrap();
    let bytes = to_bytes(&user).unwrap();

    assert_eq!(bytes.len(), 8 + 3 + NIF_LEN + CC_LEN);
    assert_eq!(&bytes[8..11], b"Ana");
    assert_eq!(&bytes[11..20], b"123456789");
    assert_eq!(&bytes[20..], b"123456789ZZ4");

    let decoded: User = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, user);
    assert_eq!(decoded.nif_str(), "123456789");
    assert_eq!(decoded.cc_str(), "123456789ZZ4");
}

#[test]
fn test_user_rejects_wrong_field_lengths() {
    assert!(matches!(
        User::new("Bo", "1234", "123456789ZZ4"),
        Err(SeqError::InvalidField(_))
    ));
    assert!(matches!(
        User::new("Bo", "123456789", "short"),
        Err(SeqError::InvalidField(_))
    ));
}

#[test]
fn test_user_rejects_wrong_character_classes() {
    let bad = [
        ("abcdefghi", "123456789ZZ4"),
        ("12345678X", "123456789ZZ4"),
        ("123456789", "____________"),
        ("123456789", "12345678AZZ4"),
        ("123456789", "1234567891Z4"),
        ("123456789", "123456789ZZZ"),
    ];
    for (nif, cc) in bad {
        assert!(
            matches!(User::new("Bo", nif, cc), Err(SeqError::InvalidField(_))),
            "accepted NIF {} CC {}",
            nif,
            cc
        );
    }
    assert!(User::new("Bo", "000000000", "000000000xy0").is_ok());
}

#[test]
fn test_default_user_placeholders() {
    let user = User::default();
    assert_eq!(user.nif_str(), "000000000");
    assert_eq!(user.cc_str(), "000000000XY0");
}
