use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::Transaction;

/// Expense total for one category, with its share of all expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) amount: Decimal,
    /// Percentage of the expense total, rounded to two places.
    pub(crate) share: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) category_totals: Vec<CategoryTotal>,
    pub(crate) total_expenses: Decimal,
    pub(crate) total_payments: Decimal,
    pub(crate) expense_count: usize,
    pub(crate) payment_count: usize,
}

impl Summary {
    pub(crate) fn build(expenses: &[Transaction], payments: &[Transaction]) -> Result<Self> {
        Ok(Self {
            category_totals: category_totals(expenses)?,
            total_expenses: total(expenses)?,
            total_payments: total(payments)?,
            expense_count: expenses.len(),
            payment_count: payments.len(),
        })
    }
}

/// Split into (debits, credits), keeping file order within each side.
pub(crate) fn split_by_entry_type(
    transactions: Vec<Transaction>,
) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions.into_iter().partition(Transaction::is_debit)
}

pub(crate) fn total(transactions: &[Transaction]) -> Result<Decimal> {
    checked_sum(transactions.iter().map(|t| t.amount))
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Amount total out of range"))
    })
}

/// Sum amounts per category, largest first (ties broken by name).
///
/// Shares are relative to the net total, so negative amounts can push a
/// share past 100%.
pub(crate) fn category_totals(expenses: &[Transaction]) -> Result<Vec<CategoryTotal>> {
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for txn in expenses {
        let sum = sums.entry(txn.category.as_str()).or_insert(Decimal::ZERO);
        *sum = sum.checked_add(txn.amount).ok_or_else(|| {
            anyhow::anyhow!("Amount total out of range for category '{}'", txn.category)
        })?;
    }

    let grand_total = checked_sum(sums.values().copied())?;

    let mut totals = sums
        .into_iter()
        .map(|(category, amount)| {
            Ok(CategoryTotal {
                category: category.to_string(),
                amount,
                share: share_of(amount, grand_total)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    totals.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(totals)
}

fn share_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .map(|share| share.round_dp(2))
        .ok_or_else(|| anyhow::anyhow!("Category share out of range"))
}
