use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Tab};
use crate::run::shellexpand;
use crate::session::Session;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Session) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit finview", cmd_quit, r);
    register_command!("quit", "Quit finview", cmd_quit, r);
    register_command!("o", "Open a CSV file (e.g. :o ~/bank.csv)", cmd_open, r);
    register_command!(
        "open",
        "Open a CSV file (e.g. :open ~/bank.csv)",
        cmd_open,
        r
    );
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("p", "Go to Payments", cmd_payments, r);
    register_command!("payments", "Go to Payments", cmd_payments, r);
    register_command!(
        "category",
        "Create category (e.g. :category Subscriptions)",
        cmd_category,
        r
    );
    register_command!(
        "delete-category",
        "Delete a category (e.g. :delete-category Travel)",
        cmd_delete_category,
        r
    );
    register_command!(
        "recat",
        "Stage a category for the selected expense (e.g. :recat Food)",
        cmd_recat,
        r
    );
    register_command!("r", "Stage a category for the selected expense", cmd_recat, r);
    register_command!("apply", "Apply staged category changes", cmd_apply, r);
    register_command!("w", "Apply staged category changes", cmd_apply, r);
    register_command!("discard", "Discard staged category changes", cmd_discard, r);
    register_command!(
        "categories",
        "List categories in the status bar",
        cmd_categories,
        r
    );
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, session)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_error(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Commands ──────────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if !session.staged().is_empty() {
        app.set_status(format!(
            "{} staged changes not applied. :apply or :discard first",
            session.staged().len()
        ));
        return Ok(());
    }
    app.running = false;
    Ok(())
}

fn cmd_open(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :open <file.csv>");
        return Ok(());
    }
    let path = shellexpand(args);
    app.open_file(Path::new(&path), session);
    app.tab = Tab::Expenses;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.tab = Tab::Expenses;
    Ok(())
}

fn cmd_payments(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.tab = Tab::Payments;
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name>");
        return Ok(());
    }

    if session.add_category(args)? {
        app.set_status(format!("Created category: {args}"));
    } else {
        app.set_status(format!("Category '{args}' already exists"));
    }
    Ok(())
}

fn cmd_delete_category(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :delete-category <name>");
        return Ok(());
    }
    if !session.store().contains(args) {
        app.set_error(format!("Category '{args}' not found"));
        return Ok(());
    }

    app.confirm_message = format!("Delete category '{args}' and its keywords?");
    app.pending_action = Some(PendingAction::DeleteCategory {
        name: args.to_string(),
    });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if app.tab != Tab::Expenses || session.expenses().is_empty() {
        app.set_status("Go to Expenses and select a row first");
        return Ok(());
    }
    if args.is_empty() {
        app.set_status("Usage: :recat <category>");
        return Ok(());
    }
    if !session.store().contains(args) {
        app.set_error(format!("Category '{args}' not found"));
        return Ok(());
    }

    session.stage_edit(app.expense_index, args)?;
    app.set_status(format!(
        "Row {}: {args} ({} pending, :apply to save)",
        app.expense_index + 1,
        session.staged().len()
    ));
    Ok(())
}

fn cmd_apply(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if session.staged().is_empty() {
        app.set_status("No staged changes");
        return Ok(());
    }
    app.confirm_message = format!("Apply {} category changes?", session.staged().len());
    app.pending_action = Some(PendingAction::ApplyEdits);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_discard(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if session.staged().is_empty() {
        app.set_status("No staged changes");
        return Ok(());
    }
    app.confirm_message = format!("Discard {} staged changes?", session.staged().len());
    app.pending_action = Some(PendingAction::DiscardEdits);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let listing = session
        .store()
        .categories()
        .iter()
        .map(|c| format!("{} ({})", c.name, c.keywords.len()))
        .collect::<Vec<_>>()
        .join(", ");
    app.set_status(listing);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// Run the confirmed pending action.
pub(crate) fn confirm_pending(app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let Some(action) = app.pending_action.take() else {
        return Ok(());
    };
    match action {
        PendingAction::ApplyEdits => {
            let changed = session.apply_edits()?;
            app.set_status(format!("Applied {changed} category changes"));
        }
        PendingAction::DiscardEdits => {
            let dropped = session.discard_edits();
            app.set_status(format!("Discarded {dropped} staged changes"));
        }
        PendingAction::DeleteCategory { name } => {
            if session.remove_category(&name)? {
                app.set_status(format!("Deleted category: {name}"));
            } else {
                app.set_status(format!("Category '{name}' cannot be deleted"));
            }
        }
    }
    Ok(())
}
