use anyhow::Result;
use std::path::Path;

use crate::session::Session;
use crate::ui::util::{cycle, scroll_to_top};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tab {
    Expenses,
    Payments,
}

impl Tab {
    pub(crate) fn all() -> &'static [Tab] {
        &[Self::Expenses, Self::Payments]
    }

    pub(crate) fn next(self) -> Self {
        match self {
            Self::Expenses => Self::Payments,
            Self::Payments => Self::Expenses,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses (Debits)"),
            Self::Payments => write!(f, "Payments (Credits)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    ApplyEdits,
    DiscardEdits,
    DeleteCategory { name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) tab: Tab,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) status_is_error: bool,
    pub(crate) show_help: bool,

    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) payment_index: usize,
    pub(crate) payment_scroll: usize,

    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            tab: Tab::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            status_is_error: false,
            show_help: false,

            expense_index: 0,
            expense_scroll: 0,
            payment_index: 0,
            payment_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = false;
    }

    pub(crate) fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = true;
    }

    pub(crate) fn clear_status(&mut self) {
        self.status_message.clear();
        self.status_is_error = false;
    }

    /// Load a file into the session and reset the views.
    pub(crate) fn open_file(&mut self, path: &Path, session: &mut Session) {
        scroll_to_top(&mut self.expense_index, &mut self.expense_scroll);
        scroll_to_top(&mut self.payment_index, &mut self.payment_scroll);

        match session.upload(path) {
            Some(count) => self.set_status(format!(
                "Loaded {count} transactions from {} ({} expenses, {} payments)",
                path.display(),
                session.expenses().len(),
                session.payments().len()
            )),
            None => {
                let msg = session
                    .last_error()
                    .unwrap_or("Error processing file")
                    .to_string();
                self.set_error(msg);
            }
        }
    }

    /// Stage the next (or previous) category for the selected expense row.
    pub(crate) fn cycle_category(&mut self, session: &mut Session, delta: isize) -> Result<()> {
        let row = self.expense_index;
        let Some(current) = session.display_category(row).map(str::to_string) else {
            self.set_status("No expense selected");
            return Ok(());
        };

        let next = {
            let names = session.store().names();
            cycle(&names, &current, delta).map(str::to_string)
        };

        if let Some(next) = next {
            session.stage_edit(row, &next)?;
            self.set_status(format!(
                "Row {}: {next} ({} pending, :apply to save)",
                row + 1,
                session.staged().len()
            ));
        }
        Ok(())
    }

    /// Rows that fit in the expense table (borders and header excluded).
    pub(crate) fn expense_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    /// The payment table sits below the five-line summary card.
    pub(crate) fn payment_page(&self) -> usize {
        self.visible_rows.saturating_sub(8).max(1)
    }

    /// Keep cursors inside the current tables.
    pub(crate) fn clamp_cursors(&mut self, session: &Session) {
        let last_expense = session.expenses().len().saturating_sub(1);
        self.expense_index = self.expense_index.min(last_expense);
        self.expense_scroll = self.expense_scroll.min(self.expense_index);

        let last_payment = session.payments().len().saturating_sub(1);
        self.payment_index = self.payment_index.min(last_payment);
        self.payment_scroll = self.payment_scroll.min(self.payment_index);
    }
}
