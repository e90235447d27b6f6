use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;

use crate::categorize::Categorizer;
use crate::models::{EntryType, Transaction};

/// Bank export date format, e.g. `28-Feb-25`.
pub(crate) const DATE_FORMAT: &str = "%d-%b-%y";

/// Largest accepted absolute amount (10^15).
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

const DATE_COLUMN: &str = "Date";
const DETAILS_COLUMN: &str = "Details";
const AMOUNT_COLUMN: &str = "Amount";
const ENTRY_TYPE_COLUMN: &str = "Debit/Credit";

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub(crate) date: usize,
    pub(crate) details: usize,
    pub(crate) amount: usize,
    pub(crate) entry_type: usize,
}

impl ColumnMap {
    /// Header names are compared after trimming; extra columns are ignored.
    pub(crate) fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| anyhow::anyhow!("Missing required column '{name}'"))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            details: find(DETAILS_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
            entry_type: find(ENTRY_TYPE_COLUMN)?,
        })
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Decode, parse and categorize an uploaded file in one step.
    /// Any failure rejects the whole file.
    pub(crate) fn load(bytes: &[u8], categorizer: &Categorizer) -> Result<Vec<Transaction>> {
        let text = decode(bytes);
        let mut transactions = Self::parse(&text)?;
        categorizer.categorize_batch(&mut transactions);
        tracing::info!(rows = transactions.len(), "loaded transactions");
        Ok(transactions)
    }

    /// Parse decoded CSV text into uncategorized transactions.
    pub(crate) fn parse(text: &str) -> Result<Vec<Transaction>> {
        if text.trim().is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = rdr.headers().context("Failed to read CSV header")?.clone();
        let columns = ColumnMap::from_headers(&headers)?;

        let mut transactions = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.with_context(|| format!("Row {row}: failed to read CSV record"))?;
            let txn = parse_record(&record, &columns).with_context(|| format!("Row {row}"))?;
            transactions.push(txn);
        }

        Ok(transactions)
    }
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> Result<Transaction> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| anyhow::anyhow!("missing value for column '{name}'"))
    };

    let date = parse_date(field(columns.date, DATE_COLUMN)?)?;
    let details = field(columns.details, DETAILS_COLUMN)?.to_string();
    let amount = parse_amount(field(columns.amount, AMOUNT_COLUMN)?)?;
    let raw_type = field(columns.entry_type, ENTRY_TYPE_COLUMN)?;
    let entry_type = EntryType::parse(raw_type)
        .ok_or_else(|| anyhow::anyhow!("expected 'Debit' or 'Credit', got '{raw_type}'"))?;

    Ok(Transaction::new(date, details, amount, entry_type))
}

/// UTF-8 first, falling back to ISO-8859-1. Latin-1 maps every byte to a
/// code point, so the fallback always succeeds.
pub(crate) fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(e) => {
            tracing::debug!(error = %e, "input is not UTF-8, decoding as ISO-8859-1");
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("Could not parse date '{s}' (expected DD-Mon-YY)"))
}

/// Thousands separators are stripped; nothing else is tolerated.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(',', "");
    let amount = Decimal::from_str(cleaned.trim())
        .with_context(|| format!("Failed to parse '{s}' as amount"))?;
    if amount.abs() > MAX_AMOUNT {
        anyhow::bail!("Amount out of range: '{s}'");
    }
    Ok(amount)
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
