use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment override for the category document location.
pub(crate) const CATEGORIES_ENV: &str = "FINVIEW_CATEGORIES";
const CATEGORIES_FLAG: &str = "--categories";
const CATEGORIES_FILE: &str = "categories.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) categories_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the command line and environment.
    /// Returns the remaining arguments with the config flags removed.
    ///
    /// Precedence: `--categories <path>`, then `FINVIEW_CATEGORIES`, then the
    /// platform data directory.
    pub(crate) fn from_args(args: &[String]) -> Result<(Self, Vec<String>)> {
        let (flag, rest) = take_flag(args, CATEGORIES_FLAG)?;
        let env = std::env::var_os(CATEGORIES_ENV).map(PathBuf::from);

        let categories_path = match flag.map(PathBuf::from).or(env) {
            Some(path) => path,
            None => default_categories_path()?,
        };

        Ok((Self { categories_path }, rest))
    }
}

/// Remove `name <value>` (or `name=<value>`) from `args`, returning the value.
fn take_flag(args: &[String], name: &str) -> Result<(Option<String>, Vec<String>)> {
    let mut value = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    let prefix = format!("{name}=");

    while let Some(arg) = iter.next() {
        if arg == name {
            let v = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("{name} requires a path"))?;
            value = Some(v.clone());
        } else if let Some(v) = arg.strip_prefix(&prefix) {
            value = Some(v.to_string());
        } else {
            rest.push(arg.clone());
        }
    }

    Ok((value, rest))
}

fn default_categories_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "finview", "Finview")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(CATEGORIES_FILE))
}
