#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::EntryType;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn make_category(name: &str, keywords: &[&str]) -> Category {
    Category::with_keywords(
        name.to_string(),
        keywords.iter().map(|k| k.to_string()).collect(),
    )
}

fn make_txn(details: &str) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        details.into(),
        dec!(10.00),
        EntryType::Debit,
    )
}

// ── Categorizer ───────────────────────────────────────────────

#[test]
fn test_categorize_exact_match() {
    let cats = vec![
        make_category("Food", &["coffee shop"]),
        make_category("Rent", &["landlord"]),
    ];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("coffee shop"), "Food");
    assert_eq!(cat.categorize("landlord"), "Rent");
}

#[test]
fn test_categorize_case_and_whitespace_insensitive() {
    let cats = vec![make_category("Food", &["  Coffee Shop "])];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("COFFEE SHOP"), "Food");
    assert_eq!(cat.categorize("  coffee shop\t"), "Food");
}

#[test]
fn test_categorize_is_not_substring_match() {
    let cats = vec![make_category("Food", &["coffee"])];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("Coffee Shop"), DEFAULT_CATEGORY);
    assert_eq!(cat.categorize("cof"), DEFAULT_CATEGORY);
}

#[test]
fn test_categorize_no_match_is_default() {
    let cats = vec![make_category("Food", &["coffee shop"])];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("GROCERY STORE"), DEFAULT_CATEGORY);
}

#[test]
fn test_categorize_last_match_wins() {
    let cats = vec![
        make_category("Food", &["coffee shop"]),
        make_category("Treats", &["Coffee Shop"]),
    ];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("coffee shop"), "Treats");

    let reversed = vec![
        make_category("Treats", &["coffee shop"]),
        make_category("Food", &["coffee shop"]),
    ];
    assert_eq!(Categorizer::new(&reversed).categorize("coffee shop"), "Food");
}

#[test]
fn test_default_category_keywords_ignored() {
    let cats = vec![
        make_category(DEFAULT_CATEGORY, &["coffee shop"]),
        make_category("Food", &[]),
    ];
    let cat = Categorizer::new(&cats);
    assert_eq!(cat.categorize("coffee shop"), DEFAULT_CATEGORY);
    assert!(cat.rules.is_empty());
}

#[test]
fn test_default_keywords_do_not_override_earlier_match() {
    let cats = vec![
        make_category("Food", &["coffee shop"]),
        make_category(DEFAULT_CATEGORY, &["coffee shop"]),
    ];
    assert_eq!(Categorizer::new(&cats).categorize("coffee shop"), "Food");
}

#[test]
fn test_categorize_empty_store() {
    let cat = Categorizer::new(&[]);
    assert_eq!(cat.categorize("anything"), DEFAULT_CATEGORY);
    assert_eq!(cat.categorize(""), DEFAULT_CATEGORY);
}

// ── Batch categorization ──────────────────────────────────────

#[test]
fn test_categorize_batch() {
    let cats = vec![
        make_category("Food", &["coffee shop"]),
        make_category("Groceries", &["grocery store"]),
    ];
    let cat = Categorizer::new(&cats);
    let mut txns = vec![
        make_txn("Coffee Shop"),
        make_txn("GROCERY STORE"),
        make_txn("UNKNOWN MERCHANT"),
    ];
    cat.categorize_batch(&mut txns);
    assert_eq!(txns[0].category, "Food");
    assert_eq!(txns[1].category, "Groceries");
    assert_eq!(txns[2].category, DEFAULT_CATEGORY);
}

#[test]
fn test_categorize_batch_resets_previous_assignment() {
    let cats = vec![make_category("Food", &["coffee shop"])];
    let cat = Categorizer::new(&cats);
    let mut txns = vec![make_txn("Bookstore")];
    txns[0].category = "Books".into();
    cat.categorize_batch(&mut txns);
    assert_eq!(txns[0].category, DEFAULT_CATEGORY);
}

#[test]
fn test_categorize_batch_empty() {
    let cat = Categorizer::new(&[make_category("Food", &["coffee"])]);
    let mut txns: Vec<Transaction> = vec![];
    cat.categorize_batch(&mut txns);
    assert!(txns.is_empty());
}

#[test]
fn test_categorize_batch_keeps_details_verbatim() {
    let cat = Categorizer::new(&[make_category("Food", &["coffee shop"])]);
    let mut txns = vec![make_txn("  Coffee Shop ")];
    cat.categorize_batch(&mut txns);
    assert_eq!(txns[0].details, "  Coffee Shop ");
    assert_eq!(txns[0].category, "Food");
}
