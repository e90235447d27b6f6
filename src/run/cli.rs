use anyhow::Result;
use std::path::Path;

use crate::models::Transaction;
use crate::report::Summary;
use crate::session::Session;
use crate::ui::util::{format_amount, format_share, truncate};

pub(crate) fn as_cli(args: &[String], session: &mut Session) -> Result<()> {
    match args[1].as_str() {
        "show" => cli_show(&args[2..], session),
        "summary" | "s" => cli_summary(&args[2..], session),
        "categories" | "c" => cli_categories(session),
        "add-category" => cli_add_category(&args[2..], session),
        "remove-category" => cli_remove_category(&args[2..], session),
        "add-keyword" => cli_add_keyword(&args[2..], session),
        "recat" => cli_recat(&args[2..], session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finview {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("finview - categorize bank CSV exports by keyword");
    println!();
    println!("Usage: finview [--categories <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none) [file.csv]                   Launch interactive TUI");
    println!("  show <file.csv>                     Print expenses, summary and payments");
    println!("  summary <file.csv>                  Print expense summary and payment total");
    println!("  categories                          List categories and keywords");
    println!("  add-category <name>                 Create a category");
    println!("  remove-category <name>              Delete a category and its keywords");
    println!("  add-keyword <category> <keyword>    Add a matching keyword to a category");
    println!("  recat <file.csv> <row> <category>   Re-categorize expense row and remember it");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Options:");
    println!("  --categories <path>   Category file (env: FINVIEW_CATEGORIES)");
}

/// Load `file` into the session, turning a rejected file into an error.
fn load(session: &mut Session, file: &str) -> Result<()> {
    let path = shellexpand(file);
    match session.upload(Path::new(&path)) {
        Some(_) => Ok(()),
        None => anyhow::bail!(
            "{}",
            session.last_error().unwrap_or("Error processing file")
        ),
    }
}

fn cli_show(args: &[String], session: &mut Session) -> Result<()> {
    let Some(file) = args.first() else {
        anyhow::bail!("Usage: finview show <file.csv>");
    };
    load(session, file)?;

    println!("Your Expenses");
    println!("{}", "─".repeat(86));
    print_transactions(session.expenses(), true);

    let summary = session.summary()?;
    println!();
    print_expense_summary(&summary);

    println!();
    print_payment_summary(&summary);
    print_transactions(session.payments(), false);
    Ok(())
}

fn cli_summary(args: &[String], session: &mut Session) -> Result<()> {
    let Some(file) = args.first() else {
        anyhow::bail!("Usage: finview summary <file.csv>");
    };
    load(session, file)?;

    let summary = session.summary()?;
    print_expense_summary(&summary);
    println!();
    print_payment_summary(&summary);
    Ok(())
}

fn print_transactions(txns: &[Transaction], numbered: bool) {
    if txns.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "{:>4}  {:<10}  {:<36}  {:>16}  Category",
        "#", "Date", "Details", "Amount"
    );
    for (i, txn) in txns.iter().enumerate() {
        let row = if numbered {
            format!("{}", i + 1)
        } else {
            String::new()
        };
        println!(
            "{:>4}  {:<10}  {:<36}  {:>16}  {}",
            row,
            txn.date.format("%d/%m/%Y"),
            truncate(&txn.details, 36),
            format_amount(txn.amount),
            txn.category,
        );
    }
}

fn print_expense_summary(summary: &Summary) {
    println!("Expense Summary ({} expenses)", summary.expense_count);
    println!("{}", "─".repeat(50));
    for total in &summary.category_totals {
        println!(
            "  {:<24} {:>16} {:>7}",
            truncate(&total.category, 24),
            format_amount(total.amount),
            format_share(total.share),
        );
    }
    println!("  {:<24} {:>16}", "Total", format_amount(summary.total_expenses));
}

fn print_payment_summary(summary: &Summary) {
    println!("Payment Summary ({} payments)", summary.payment_count);
    println!("{}", "─".repeat(50));
    println!("  Total Payments: {}", format_amount(summary.total_payments));
}

fn cli_categories(session: &Session) -> Result<()> {
    let store = session.store();
    println!("Categories ({})", store.path().display());
    println!("{}", "─".repeat(50));
    for cat in store.categories() {
        if cat.keywords.is_empty() {
            println!("  {cat}");
        } else {
            println!("  {cat}: {}", cat.keywords.join(", "));
        }
    }
    Ok(())
}

fn cli_add_category(args: &[String], session: &mut Session) -> Result<()> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        anyhow::bail!("Usage: finview add-category <name>");
    }
    if session.add_category(&name)? {
        println!("Created category: {}", name.trim());
    } else {
        println!("Category '{}' already exists", name.trim());
    }
    Ok(())
}

fn cli_remove_category(args: &[String], session: &mut Session) -> Result<()> {
    let joined = args.join(" ");
    let name = joined.trim();
    if name.is_empty() {
        anyhow::bail!("Usage: finview remove-category <name>");
    }
    if session.remove_category(name)? {
        println!("Removed category: {name}");
    } else {
        println!("Category '{name}' not removed (missing or default)");
    }
    Ok(())
}

fn cli_add_keyword(args: &[String], session: &mut Session) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: finview add-keyword <category> <keyword>");
    }
    let category = &args[0];
    let keyword = args[1..].join(" ");

    if session.add_keyword(category, &keyword)? {
        println!("Added keyword '{}' to {category}", keyword.trim());
    } else {
        println!("Keyword not added (empty or already listed under {category})");
    }
    Ok(())
}

fn cli_recat(args: &[String], session: &mut Session) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: finview recat <file.csv> <row> <category>");
    }
    let row: usize = args[1]
        .parse()
        .ok()
        .filter(|r| *r > 0)
        .ok_or_else(|| anyhow::anyhow!("Row must be a positive number, got '{}'", args[1]))?;
    let category = args[2..].join(" ");

    load(session, &args[0])?;
    session.stage_edit(row - 1, &category)?;
    let details = session.expenses()[row - 1].details.clone();
    let changed = session.apply_edits()?;

    if changed == 0 {
        println!("Row {row} is already in {category}");
    } else {
        println!("Row {row} ('{details}') is now {category}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
