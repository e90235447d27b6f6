use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::category::DEFAULT_CATEGORY;

/// Debit/Credit indicator carried next to the (unsigned) amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }

    /// Parse the literal column value. Only `Debit` and `Credit` are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Debit" => Some(Self::Debit),
            "Credit" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub details: String,
    pub amount: Decimal,
    pub entry_type: EntryType,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, details: String, amount: Decimal, entry_type: EntryType) -> Self {
        Self {
            date,
            details,
            amount,
            entry_type,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    pub fn is_debit(&self) -> bool {
        self.entry_type == EntryType::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.entry_type == EntryType::Credit
    }
}
