#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{Category, DEFAULT_CATEGORY};
use rust_decimal_macros::dec;

const HEADER: &str = "Date,Details,Amount,Debit/Credit\n";

fn food_categorizer() -> Categorizer {
    Categorizer::new(&[Category::with_keywords(
        "Food".into(),
        vec!["coffee shop".into()],
    )])
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_basic() {
    assert_eq!(parse_amount("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_amount("42").unwrap(), dec!(42));
}

#[test]
fn test_parse_amount_strips_thousands_commas() {
    assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_amount("1,234,567.89").unwrap(), dec!(1234567.89));
    assert_eq!(parse_amount(" 12.00 ").unwrap(), dec!(12.00));
}

#[test]
fn test_parse_amount_invalid() {
    assert!(parse_amount("abc").is_err());
    assert!(parse_amount("").is_err());
    assert!(parse_amount("$12.00").is_err());
}

#[test]
fn test_parse_amount_range() {
    assert_eq!(
        parse_amount("1,000,000,000,000,000").unwrap(),
        dec!(1000000000000000)
    );
    assert_eq!(parse_amount("-999,999.99").unwrap(), dec!(-999999.99));
    assert!(parse_amount("1,000,000,000,000,000.01").is_err());
    assert!(parse_amount("-10000000000000000").is_err());
    let err = parse_amount("1,000,000,000,000,000,000,000,000,000").unwrap_err();
    assert!(format!("{err:#}").contains("out of range"));
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_bank_format() {
    assert_eq!(parse_date("28-Feb-25").unwrap(), ymd(2025, 2, 28));
    assert_eq!(parse_date("01-Jan-24").unwrap(), ymd(2024, 1, 1));
}

#[test]
fn test_parse_date_rejects_other_formats() {
    assert!(parse_date("2025-02-28").is_err());
    assert!(parse_date("02/28/2025").is_err());
    assert!(parse_date("28 Feb 2025").is_err());
    assert!(parse_date("31-Feb-25").is_err());
    assert!(parse_date("").is_err());
}

// ── decode ────────────────────────────────────────────────────

#[test]
fn test_decode_utf8() {
    assert_eq!(decode("Café".as_bytes()), "Café");
}

#[test]
fn test_decode_strips_bom() {
    assert_eq!(decode(b"\xEF\xBB\xBFDate"), "Date");
}

#[test]
fn test_decode_latin1_fallback() {
    // 0xE9 is 'é' in ISO-8859-1 and invalid as a lone UTF-8 byte.
    assert_eq!(decode(b"Caf\xE9"), "Café");
}

// ── ColumnMap ─────────────────────────────────────────────────

#[test]
fn test_column_map_trims_headers_and_ignores_extras() {
    let headers = csv::StringRecord::from(vec![
        " Reference ",
        " Date",
        "Details ",
        "  Amount  ",
        "Balance",
        "Debit/Credit ",
    ]);
    let map = ColumnMap::from_headers(&headers).unwrap();
    assert_eq!(
        map,
        ColumnMap {
            date: 1,
            details: 2,
            amount: 3,
            entry_type: 5,
        }
    );
}

#[test]
fn test_column_map_missing_column() {
    let headers = csv::StringRecord::from(vec!["Date", "Details", "Amount"]);
    let err = ColumnMap::from_headers(&headers).unwrap_err();
    assert!(err.to_string().contains("Debit/Credit"));
}

// ── CsvImporter::load ─────────────────────────────────────────

#[test]
fn test_load_categorizes_rows() {
    let csv = format!("{HEADER}28-Feb-25,Coffee Shop,\"1,234.56\",Debit\n");
    let txns = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap();

    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, dec!(1234.56));
    assert_eq!(txns[0].date, ymd(2025, 2, 28));
    assert_eq!(txns[0].category, "Food");
    assert_eq!(txns[0].entry_type, EntryType::Debit);
}

#[test]
fn test_load_mixed_debits_and_credits() {
    let csv = format!(
        "{HEADER}\
         01-Mar-25,Coffee Shop,4.50,Debit\n\
         02-Mar-25,Salary,\"2,500.00\",Credit\n\
         03-Mar-25,Hardware Store,19.99,Debit\n"
    );
    let txns = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap();

    assert_eq!(txns.len(), 3);
    assert!(txns[1].is_credit());
    assert_eq!(txns[1].amount, dec!(2500.00));
    assert_eq!(txns[1].category, DEFAULT_CATEGORY);
    assert_eq!(txns[2].category, DEFAULT_CATEGORY);
}

#[test]
fn test_load_invalid_amount_fails_whole_file() {
    let csv = format!(
        "{HEADER}\
         01-Mar-25,Coffee Shop,4.50,Debit\n\
         02-Mar-25,Bakery,abc,Debit\n"
    );
    let err = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("Row 2"), "{msg}");
    assert!(msg.contains("abc"), "{msg}");
}

#[test]
fn test_load_out_of_range_amount_fails_whole_file() {
    let csv = format!(
        "{HEADER}\
         01-Mar-25,Coffee Shop,4.50,Debit\n\
         02-Mar-25,Yacht,\"1,000,000,000,000,000,000,000,000,000\",Debit\n"
    );
    let err = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("Row 2"), "{msg}");
    assert!(msg.contains("out of range"), "{msg}");
}

#[test]
fn test_load_invalid_date_fails() {
    let csv = format!("{HEADER}2025-03-01,Coffee Shop,4.50,Debit\n");
    assert!(CsvImporter::load(csv.as_bytes(), &food_categorizer()).is_err());
}

#[test]
fn test_load_invalid_entry_type_fails() {
    let csv = format!("{HEADER}01-Mar-25,Coffee Shop,4.50,Refund\n");
    let err = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap_err();
    assert!(format!("{err:#}").contains("Refund"));
}

#[test]
fn test_load_short_row_fails() {
    let csv = format!("{HEADER}01-Mar-25,Coffee Shop\n");
    assert!(CsvImporter::load(csv.as_bytes(), &food_categorizer()).is_err());
}

#[test]
fn test_load_missing_column_fails() {
    let csv = "Date,Details,Amount\n01-Mar-25,Coffee Shop,4.50\n";
    assert!(CsvImporter::load(csv.as_bytes(), &food_categorizer()).is_err());
}

#[test]
fn test_load_empty_file_fails() {
    assert!(CsvImporter::load(b"", &food_categorizer()).is_err());
    assert!(CsvImporter::load(b"  \n", &food_categorizer()).is_err());
}

#[test]
fn test_load_header_only_is_empty_table() {
    let txns = CsvImporter::load(HEADER.as_bytes(), &food_categorizer()).unwrap();
    assert!(txns.is_empty());
}

#[test]
fn test_load_latin1_file() {
    let mut bytes = HEADER.as_bytes().to_vec();
    bytes.extend_from_slice(b"01-Mar-25,Caf\xE9 Bleu,3.00,Debit\n");
    let cats = [Category::with_keywords(
        "Food".into(),
        vec!["café bleu".into()],
    )];
    let txns = CsvImporter::load(&bytes, &Categorizer::new(&cats)).unwrap();
    assert_eq!(txns[0].details, "Café Bleu");
    assert_eq!(txns[0].category, "Food");
}

#[test]
fn test_load_whitespace_headers() {
    let csv = " Date , Details , Amount , Debit/Credit \n01-Mar-25,Coffee Shop,4.50,Debit\n";
    let txns = CsvImporter::load(csv.as_bytes(), &food_categorizer()).unwrap();
    assert_eq!(txns[0].category, "Food");
}
