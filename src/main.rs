mod categorize;
mod config;
mod import;
mod models;
mod report;
mod run;
mod session;
mod store;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "finview=warn";
const LOG_FILE: &str = "finview.log";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let (config, args) = config::Config::from_args(&args)?;

    // The TUI owns the terminal, so its logs go to a file beside the
    // category document instead of stderr.
    let tui_file = match args.len() {
        1 => Some(None),
        2 if is_csv_file(&args[1]) => Some(Some(PathBuf::from(run::shellexpand(&args[1])))),
        _ => None,
    };
    let log_file = tui_file
        .is_some()
        .then(|| config.categories_path.with_file_name(LOG_FILE));
    init_tracing(log_file.as_deref())?;

    let store = store::CategoryStore::load(&config.categories_path)?;
    let mut session = session::Session::new(store);

    match tui_file {
        Some(file) => run::as_tui(&mut session, file.as_deref()),
        None => run::as_cli(&args, &mut session),
    }
}

fn is_csv_file(arg: &str) -> bool {
    let path = run::shellexpand(arg);
    let path = Path::new(&path);
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
