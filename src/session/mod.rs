use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::categorize::Categorizer;
use crate::import::CsvImporter;
use crate::models::Transaction;
use crate::report::{self, Summary};
use crate::store::CategoryStore;

/// One interactive session: the category store plus whatever file is loaded.
///
/// Every user action is a method here, so the CLI and the TUI drive the same
/// state machine.
pub(crate) struct Session {
    store: CategoryStore,
    expenses: Vec<Transaction>,
    payments: Vec<Transaction>,
    /// Expense row index -> staged category name.
    staged: BTreeMap<usize, String>,
    source: Option<String>,
    last_error: Option<String>,
}

impl Session {
    pub(crate) fn new(store: CategoryStore) -> Self {
        Self {
            store,
            expenses: Vec::new(),
            payments: Vec::new(),
            staged: BTreeMap::new(),
            source: None,
            last_error: None,
        }
    }

    // ── Upload ────────────────────────────────────────────────

    /// Read and load a transaction file. See [`Session::upload_bytes`].
    pub(crate) fn upload(&mut self, path: &Path) -> Option<usize> {
        let bytes = match std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))
        {
            Ok(bytes) => bytes,
            Err(e) => {
                self.fail_load(&e);
                return None;
            }
        };
        let loaded = self.upload_bytes(&bytes)?;
        self.source = Some(path.display().to_string());
        Some(loaded)
    }

    /// Parse and categorize an uploaded file, replacing the current table.
    ///
    /// Returns the number of rows loaded, or `None` when the file was
    /// rejected; the reason is then available from [`Session::last_error`]
    /// and the previous table is cleared.
    pub(crate) fn upload_bytes(&mut self, bytes: &[u8]) -> Option<usize> {
        let categorizer = Categorizer::new(self.store.categories());
        match CsvImporter::load(bytes, &categorizer) {
            Ok(transactions) => {
                let count = transactions.len();
                let (expenses, payments) = report::split_by_entry_type(transactions);
                if let Err(e) = Summary::build(&expenses, &payments) {
                    self.fail_load(&e);
                    return None;
                }
                self.expenses = expenses;
                self.payments = payments;
                self.staged.clear();
                self.source = None;
                self.last_error = None;
                Some(count)
            }
            Err(e) => {
                self.fail_load(&e);
                None
            }
        }
    }

    fn fail_load(&mut self, err: &anyhow::Error) {
        tracing::error!(error = %format!("{err:#}"), "failed to load transactions");
        self.expenses.clear();
        self.payments.clear();
        self.staged.clear();
        self.source = None;
        self.last_error = Some(format!("Error processing file: {err:#}"));
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn add_category(&mut self, name: &str) -> Result<bool> {
        self.store.add_category(name)
    }

    pub(crate) fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        self.store.add_keyword(category, keyword)
    }

    /// Transactions already tagged with `name` keep it for this session.
    pub(crate) fn remove_category(&mut self, name: &str) -> Result<bool> {
        let removed = self.store.remove_category(name)?;
        if removed {
            let name = name.trim();
            self.staged.retain(|_, staged| staged != name);
        }
        Ok(removed)
    }

    // ── Edits ─────────────────────────────────────────────────

    /// Stage a new category for expense row `row`. Nothing is persisted
    /// until [`Session::apply_edits`].
    pub(crate) fn stage_edit(&mut self, row: usize, category: &str) -> Result<()> {
        if row >= self.expenses.len() {
            anyhow::bail!("No expense row {}", row + 1);
        }
        if !self.store.contains(category) {
            anyhow::bail!("Unknown category: {category}");
        }
        if self.expenses[row].category == category {
            self.staged.remove(&row);
        } else {
            self.staged.insert(row, category.to_string());
        }
        Ok(())
    }

    pub(crate) fn discard_edits(&mut self) -> usize {
        let count = self.staged.len();
        self.staged.clear();
        count
    }

    /// Apply staged edits in row order. Each changed row's details become a
    /// keyword of the new category only, so the choice survives a reload.
    /// Returns the number of rows changed.
    ///
    /// A row is relabelled only after its keyword is saved. On a save error
    /// the failed edit and every later one stay staged.
    pub(crate) fn apply_edits(&mut self) -> Result<usize> {
        let mut staged = std::mem::take(&mut self.staged).into_iter();
        let mut changed = 0;

        while let Some((row, new_category)) = staged.next() {
            let Some(txn) = self.expenses.get(row) else {
                continue;
            };
            if txn.category == new_category {
                continue;
            }
            let details = txn.details.clone();

            if let Err(e) = self.store.reassign_keyword(&details, &new_category) {
                self.staged.insert(row, new_category);
                self.staged.extend(staged);
                return Err(e.context(format!("Failed to apply change to row {}", row + 1)));
            }

            let old_category = std::mem::replace(
                &mut self.expenses[row].category,
                new_category.clone(),
            );
            tracing::info!(
                details = %details,
                from = %old_category,
                to = %new_category,
                "recategorized transaction"
            );
            changed += 1;
        }

        Ok(changed)
    }

    // ── Views ─────────────────────────────────────────────────

    pub(crate) fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub(crate) fn expenses(&self) -> &[Transaction] {
        &self.expenses
    }

    pub(crate) fn payments(&self) -> &[Transaction] {
        &self.payments
    }

    pub(crate) fn staged(&self) -> &BTreeMap<usize, String> {
        &self.staged
    }

    /// Category shown for an expense row: the staged one if any.
    pub(crate) fn display_category(&self, row: usize) -> Option<&str> {
        self.staged
            .get(&row)
            .map(String::as_str)
            .or_else(|| self.expenses.get(row).map(|t| t.category.as_str()))
    }

    pub(crate) fn has_data(&self) -> bool {
        !self.expenses.is_empty() || !self.payments.is_empty()
    }

    pub(crate) fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn summary(&self) -> Result<Summary> {
        Summary::build(&self.expenses, &self.payments)
    }
}
